use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use super::session::RawSession;

/// Session converted into minutes relative to the midnight of the rendered day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    pub id: Arc<str>,
    pub label: Arc<str>,
    pub start_minute: i64,
    /// Can go past 1439 for sessions that run over midnight.
    pub end_minute: i64,
    pub duration_minutes: i64,
}

impl NormalizedEvent {
    pub fn overlaps(&self, other: &NormalizedEvent) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }
}

/// Session that started before the rendered day is cut at midnight. Broken intervals
/// (end <= start) are treated as zero length, after which every duration is raised to
/// `min_duration`.
pub fn normalize(
    session: &RawSession,
    day_start: NaiveDateTime,
    now: NaiveDateTime,
    min_duration: i64,
) -> NormalizedEvent {
    let start = session.start().max(day_start);
    let end = session.span.resolve_end(now);

    let raw_duration = (end - start).num_minutes();
    if end <= session.start() {
        debug!(
            "Session {} has an empty interval {} - {}",
            session.id,
            session.start(),
            end
        );
    }

    let start_minute = (start - day_start).num_minutes();
    let duration_minutes = raw_duration.max(0).max(min_duration);

    NormalizedEvent {
        id: session.id.clone(),
        label: session.label.clone(),
        start_minute,
        end_minute: start_minute + duration_minutes,
        duration_minutes,
    }
}
