use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layout::RawSession;

pub const UNTITLED_LABEL: &str = "Untitled";

/// A single line of the session log. Sessions are never edited in place, a newer line with the
/// same id replaces the older one.
#[derive(PartialEq, Eq, Debug, Serialize, Deserialize, Clone)]
pub struct SessionEntity {
    pub id: Arc<str>,
    #[serde(with = "chrono::serde::ts_seconds")]
    pub start: DateTime<Utc>,
    /// Missing end means the session is still being tracked.
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub end: Option<DateTime<Utc>>,
    #[serde(default)]
    pub note: Option<Arc<str>>,
}

impl SessionEntity {
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>, note: Option<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4().to_string().into(),
            start,
            end,
            note,
        }
    }

    pub fn with_end(self, end: DateTime<Utc>) -> Self {
        Self {
            end: Some(end),
            ..self
        }
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none()
    }

    pub fn end_or(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        self.end.unwrap_or(now)
    }

    /// First line of the note, which is what gets displayed on the timeline.
    pub fn label(&self) -> Arc<str> {
        self.note
            .as_deref()
            .and_then(|note| note.lines().next())
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Arc::from)
            .unwrap_or_else(|| UNTITLED_LABEL.into())
    }

    /// Date of the file this session is stored in.
    pub fn record_date<Tz: TimeZone>(&self, tz: &Tz) -> NaiveDate {
        self.start.with_timezone(tz).date_naive()
    }

    /// Checks if the session touches `[from, to)`. Sessions with broken ends are matched by their
    /// start.
    pub fn intersects(&self, from: DateTime<Utc>, to: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        self.start < to && (self.start >= from || self.end_or(now) > from)
    }

    /// Converts the session into local wall-clock time of `tz`.
    pub fn to_raw<Tz: TimeZone>(&self, tz: &Tz) -> RawSession {
        let start = self.start.with_timezone(tz).naive_local();
        match self.end {
            Some(end) => RawSession::bounded(
                self.id.clone(),
                self.label(),
                start,
                end.with_timezone(tz).naive_local(),
            ),
            None => RawSession::ongoing(self.id.clone(), self.label(), start),
        }
    }
}
