use anyhow::Result;
use chrono::Local;
use clap::Parser;

use crate::{
    layout::{
        DayWindow, LayoutConfig, Packing, layout,
        config::{DEFAULT_HOUR_HEIGHT, DEFAULT_MIN_DURATION, DEFAULT_MIN_HEIGHT_PX},
    },
    storage::session_storage::SessionStorage,
    utils::clock::Clock,
};

use super::{
    dates::{DATE_HELP, DateStyle, parse_date_or_now, validation_error},
    output::{
        day_sessions,
        render::{OutputFormat, render_events, render_summary},
        summary::summarize_day,
    },
};

#[derive(Debug, Clone, Copy, clap::Args)]
pub struct LayoutArgs {
    #[arg(long, default_value_t = DEFAULT_HOUR_HEIGHT, help = "Height of one hour in pixels")]
    hour_height: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_MIN_HEIGHT_PX,
        help = "Minimal height of an event in pixels"
    )]
    min_height: f64,
    #[arg(
        long,
        default_value_t = DEFAULT_MIN_DURATION,
        help = "Minimal duration of an event in minutes. Shorter sessions are extended to it"
    )]
    min_duration: i64,
    #[arg(
        long,
        default_value_t = Packing::Local,
        help = "How overlapping events share width. \"local\" sizes an event by events it overlaps, \"cluster\" gives all connected events one grid"
    )]
    packing: Packing,
}

impl LayoutArgs {
    fn to_config(self) -> Result<LayoutConfig> {
        LayoutConfig::new_opt(
            self.hour_height,
            self.min_height,
            self.min_duration,
            self.packing,
        )
        .ok_or_else(|| {
            validation_error(format!(
                "Can't lay out a day with hour height {}, minimal height {} and minimal duration {}",
                self.hour_height, self.min_height, self.min_duration
            ))
        })
    }
}

#[derive(Debug, Parser)]
pub struct DayCommand {
    #[arg(long, short, help = format!("Day to display. Defaults to today. {DATE_HELP}"))]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
    #[arg(
        long,
        help = "Moment running sessions are extended to. Defaults to current time"
    )]
    now: Option<String>,
    #[arg(long, short, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
    #[command(flatten)]
    layout: LayoutArgs,
}

#[derive(Debug, Parser)]
pub struct SummaryCommand {
    #[arg(long, short, help = format!("Day to summarize. Defaults to today. {DATE_HELP}"))]
    date: Option<String>,
    #[arg(long, default_value_t = DateStyle::Uk, help = "Style of dates used during parsing. For Uk it's day/month/year. For Us it's month/day/year")]
    date_style: DateStyle,
}

/// Command to process `day` command. Prints every session of a day with its place on the day
/// canvas.
pub async fn process_day_command(
    command: DayCommand,
    storage: impl SessionStorage,
    clock: &impl Clock,
) -> Result<()> {
    print!("{}", render_day(command, storage, clock).await?);
    Ok(())
}

async fn render_day(
    DayCommand {
        date,
        date_style,
        now,
        format,
        layout: layout_args,
    }: DayCommand,
    storage: impl SessionStorage,
    clock: &impl Clock,
) -> Result<String> {
    let config = layout_args.to_config()?;
    let now = parse_date_or_now(now.as_deref(), clock.time(), date_style, "now")?;
    let day = parse_date_or_now(date.as_deref(), now, date_style, "date")?.date_naive();

    let sessions = day_sessions(storage, day, &Local, now.to_utc()).await?;
    let events = layout(&sessions, DayWindow::new(day, now.naive_local()), &config);
    render_events(&events, format)
}

/// Command to process `summary` command. Prints how much time was tracked during a day.
pub async fn process_summary_command(
    command: SummaryCommand,
    storage: impl SessionStorage,
    clock: &impl Clock,
) -> Result<()> {
    print!("{}", summarize(command, storage, clock).await?);
    Ok(())
}

async fn summarize(
    SummaryCommand { date, date_style }: SummaryCommand,
    storage: impl SessionStorage,
    clock: &impl Clock,
) -> Result<String> {
    let now = clock.time();
    let day = parse_date_or_now(date.as_deref(), now, date_style, "date")?.date_naive();

    let sessions = day_sessions(storage, day, &Local, now.to_utc()).await?;
    let summary = summarize_day(&sessions, DayWindow::new(day, now.naive_local()));
    Ok(render_summary(&summary))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{DateTime, Local, TimeZone};
    use clap::Parser;
    use tempfile::tempdir;

    use crate::{
        storage::{
            entities::SessionEntity,
            session_storage::{SessionStorage, SessionStorageImpl},
        },
        utils::{clock::MockClock, logging::TEST_LOGGING},
    };

    use super::{DayCommand, SummaryCommand, render_day, summarize};

    fn local(hour: u32, minute: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2025, 3, 15, hour, minute, 0)
            .unwrap()
    }

    fn clock() -> MockClock {
        let mut clock = MockClock::new();
        clock.expect_time().returning(|| local(18, 0));
        clock
    }

    async fn storage_with_sessions(storage: &SessionStorageImpl) -> Result<()> {
        let sessions = vec![
            SessionEntity::new(
                local(9, 0).to_utc(),
                Some(local(10, 0).to_utc()),
                Some("Write report\ndraft".into()),
            ),
            SessionEntity::new(
                local(9, 30).to_utc(),
                Some(local(10, 30).to_utc()),
                Some("Call".into()),
            ),
            SessionEntity::new(local(17, 0).to_utc(), None, None),
        ];
        let date = sessions[0].record_date(&Local);
        storage.append(date, sessions).await
    }

    #[tokio::test]
    async fn test_day_table() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let storage = SessionStorageImpl::new(dir.path().to_path_buf())?;
        storage_with_sessions(&storage).await?;

        let command = DayCommand::try_parse_from(["day"])?;
        let output = render_day(command, &storage, &clock()).await?;
        let lines = output.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "09:00-10:00\t1h0m\t540px+60px\t0.00% 50.00%\tWrite report",
                "09:30-10:30\t1h0m\t570px+60px\t50.00% 50.00%\tCall",
                "17:00-18:00\t1h0m\t1020px+60px\t0.00% 100.00%\tUntitled",
            ]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_day_json_with_layout_flags() -> Result<()> {
        let dir = tempdir()?;
        let storage = SessionStorageImpl::new(dir.path().to_path_buf())?;
        storage_with_sessions(&storage).await?;

        let command = DayCommand::try_parse_from([
            "day",
            "--format",
            "json",
            "--hour-height",
            "120",
            "--packing",
            "cluster",
        ])?;
        let output = render_day(command, &storage, &clock()).await?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(value.as_array().map(Vec::len), Some(3));
        assert_eq!(value[0]["top"], 1080.);
        assert_eq!(value[0]["height"], 120.);
        assert_eq!(value[1]["leftPercent"], 50.);
        assert_eq!(value[2]["label"], "Untitled");
        Ok(())
    }

    #[tokio::test]
    async fn test_day_rejects_invalid_layout() -> Result<()> {
        let dir = tempdir()?;
        let storage = SessionStorageImpl::new(dir.path().to_path_buf())?;

        let command = DayCommand::try_parse_from(["day", "--hour-height", "0"])?;
        assert!(render_day(command, &storage, &clock()).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_day() -> Result<()> {
        let dir = tempdir()?;
        let storage = SessionStorageImpl::new(dir.path().to_path_buf())?;

        let command = DayCommand::try_parse_from(["day"])?;
        assert_eq!(render_day(command, &storage, &clock()).await?, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_summary() -> Result<()> {
        let dir = tempdir()?;
        let storage = SessionStorageImpl::new(dir.path().to_path_buf())?;
        storage_with_sessions(&storage).await?;

        let command = SummaryCommand::try_parse_from(["summary"])?;
        let output = summarize(command, &storage, &clock()).await?;
        assert!(output.contains("3h 0m\t3 sessions"));
        assert!(output.contains("Running\tUntitled"));
        assert!(output.contains("Longest\t1h 0m\tWrite report"));
        assert!(output.contains("1h 0m\tCall"));
        Ok(())
    }
}
