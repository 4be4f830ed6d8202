pub mod render;
pub mod summary;

use std::{future, sync::Arc};

use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use futures::{Stream, StreamExt, TryStreamExt, stream};
use tracing::{error, instrument};

use crate::{
    layout::RawSession,
    storage::{entities::SessionEntity, session_storage::SessionStorage},
    utils::time::day_start_in,
};

/// Sessions that started at most this many days before a window are still looked at. Anything
/// running longer than that is considered abandoned. Both rendering and the running timer lookup
/// go through it, so they agree on what is still running.
pub const LOOKBACK_DAYS: u64 = 7;

pub struct ExtractConfig {
    /// First file that gets read.
    pub first_day: NaiveDate,
    /// Last file that gets read.
    pub last_day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Moment running sessions are extended to.
    pub now: DateTime<Utc>,
}

impl ExtractConfig {
    /// Covers local days from `first` to `last` inclusive in `tz`.
    pub fn between_days<Tz: TimeZone>(
        first: NaiveDate,
        last: NaiveDate,
        tz: &Tz,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let next = last
            .succ_opt()
            .ok_or_else(|| anyhow!("Day after {last} doesn't exist"))?;
        let start =
            day_start_in(first, tz).ok_or_else(|| anyhow!("{first} has no valid local time"))?;
        let end =
            day_start_in(next, tz).ok_or_else(|| anyhow!("{next} has no valid local time"))?;
        Ok(Self {
            first_day: first
                .checked_sub_days(chrono::Days::new(LOOKBACK_DAYS))
                .unwrap_or(first),
            last_day: last,
            start: start.to_utc(),
            end: end.to_utc(),
            now,
        })
    }

    fn filter(&self, entity: SessionEntity) -> Option<SessionEntity> {
        entity
            .intersects(self.start, self.end, self.now)
            .then_some(entity)
    }
}

/// Extracts [SessionEntity] touching the configured window. Day files are read concurrently
/// through a stream.
pub fn extract_between(
    storage: impl SessionStorage,
    config: ExtractConfig,
) -> impl Stream<Item = Result<SessionEntity>> {
    let storage = Arc::new(storage);

    let date_iteration = date_range(config.first_day, config.last_day);

    let files = date_iteration
        .map(move |day| {
            let storage = storage.clone();
            async move { (day, storage.get_data_for(day).await) }
        })
        .buffered(4);

    files
        .flat_map(|(day, data)| match data {
            Ok(data) => stream::iter(data).map(Ok).boxed(),
            Err(e) => {
                error!("Failed to process file {day} {e}");
                stream::once(future::ready(Err(e))).boxed()
            }
        })
        .filter_map(move |v| future::ready(v.map(|v| config.filter(v)).transpose()))
}

/// Loads sessions of a local day in wall-clock time of `tz`, ready to be laid out.
#[instrument(skip(storage, tz))]
pub async fn day_sessions<Tz: TimeZone>(
    storage: impl SessionStorage,
    day: NaiveDate,
    tz: &Tz,
    now: DateTime<Utc>,
) -> Result<Vec<RawSession>> {
    let config = ExtractConfig::between_days(day, day, tz, now)?;
    extract_between(storage, config)
        .map_ok(|v| v.to_raw(tz))
        .try_collect()
        .await
}

/// Returns a stream of dates between start (inclusive) and end (inclusive).
fn date_range(start: NaiveDate, end: NaiveDate) -> impl Stream<Item = NaiveDate> {
    stream::unfold((Some(start), end), |(current, end)| {
        future::ready(match current {
            Some(current) if current <= end => Some((current, (current.succ_opt(), end))),
            _ => None,
        })
    })
}
