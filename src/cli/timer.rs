use std::future;

use anyhow::{Result, anyhow};
use chrono::{DateTime, Local};
use clap::Parser;
use futures::TryStreamExt;
use tracing::info;

use crate::{
    storage::{entities::SessionEntity, session_storage::SessionStorage},
    utils::clock::Clock,
};

use super::{
    dates::{DATE_HELP, DateStyle, parse_date_or_now, validation_error},
    output::{ExtractConfig, extract_between},
};

#[derive(Debug, Parser)]
pub struct LogCommand {
    #[arg(long, short, help = format!("Start of the session. Defaults to now. {DATE_HELP}"))]
    start: Option<String>,
    #[arg(
        long,
        short,
        help = format!("End of the session. Without it the session keeps running until stopped. {DATE_HELP}")
    )]
    end: Option<String>,
    #[arg(long, short, help = "Note of the session. First line is shown on the timeline")]
    note: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

#[derive(Debug, Parser)]
pub struct StopCommand {
    #[arg(long, help = format!("Moment the session ended. Defaults to now. {DATE_HELP}"))]
    at: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `log` command. Records a finished session or starts a running one.
pub async fn process_log_command(
    LogCommand {
        start,
        end,
        note,
        date_style,
    }: LogCommand,
    storage: &impl SessionStorage,
    clock: &impl Clock,
) -> Result<SessionEntity> {
    let now = clock.time();
    let start = parse_date_or_now(start.as_deref(), now, date_style, "start")?;
    let end = match end {
        Some(end) => Some(parse_date_or_now(Some(&end), now, date_style, "end")?),
        None => None,
    };

    match end {
        Some(end) if end < start => {
            return Err(validation_error(format!(
                "Session can't end at {end} before it starts at {start}"
            )));
        }
        Some(_) => {}
        None => {
            if let Some(running) = find_running(storage, now).await? {
                return Err(validation_error(format!(
                    "Session \"{}\" is already running since {}. Stop it first",
                    running.label(),
                    running.start.with_timezone(&Local)
                )));
            }
        }
    }

    let session = SessionEntity::new(
        start.to_utc(),
        end.map(|v| v.to_utc()),
        note.map(Into::into),
    );
    storage
        .append(session.record_date(&Local), vec![session.clone()])
        .await?;
    info!("Logged session {}", session.id);
    Ok(session)
}

/// Command to process `stop` command. Closes the running session.
pub async fn process_stop_command(
    StopCommand { at, date_style }: StopCommand,
    storage: &impl SessionStorage,
    clock: &impl Clock,
) -> Result<SessionEntity> {
    let now = clock.time();
    let Some(running) = find_running(storage, now).await? else {
        return Err(validation_error("No session is running".into()));
    };

    let end = parse_date_or_now(at.as_deref(), now, date_style, "end")?.to_utc();
    if end < running.start {
        return Err(validation_error(format!(
            "Session can't end at {} before it starts at {}",
            end.with_timezone(&Local),
            running.start.with_timezone(&Local)
        )));
    }

    let date = running.record_date(&Local);
    let stopped = running.with_end(end);
    storage.append(date, vec![stopped.clone()]).await?;
    info!("Stopped session {}", stopped.id);
    Ok(stopped)
}

/// Returns the latest running session. Sessions logged with a start up to tomorrow are searched,
/// going back as far as the day view does.
async fn find_running(
    storage: &impl SessionStorage,
    now: DateTime<Local>,
) -> Result<Option<SessionEntity>> {
    let today = now.date_naive();
    let tomorrow = today
        .succ_opt()
        .ok_or_else(|| anyhow!("Day after {today} doesn't exist"))?;
    let config = ExtractConfig::between_days(today, tomorrow, &Local, now.to_utc())?;

    extract_between(storage, config)
        .try_filter(|session| future::ready(session.is_running()))
        .try_fold(None::<SessionEntity>, |latest, session| async move {
            Ok(match latest {
                Some(latest) if latest.start > session.start => Some(latest),
                _ => Some(session),
            })
        })
        .await
}
