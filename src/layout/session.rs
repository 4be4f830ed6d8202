use std::sync::Arc;

use chrono::NaiveDateTime;

/// Time span of a session in local wall-clock time. A session that is still being tracked has no
/// end yet, it gets resolved against the current instant during layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSpan {
    Bounded {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Ongoing {
        start: NaiveDateTime,
    },
}

impl SessionSpan {
    pub fn start(&self) -> NaiveDateTime {
        match self {
            SessionSpan::Bounded { start, .. } | SessionSpan::Ongoing { start } => *start,
        }
    }

    /// Returns end of the session, treating a running session as ending at `now`.
    pub fn resolve_end(&self, now: NaiveDateTime) -> NaiveDateTime {
        match self {
            SessionSpan::Bounded { end, .. } => *end,
            SessionSpan::Ongoing { .. } => now,
        }
    }

    pub fn is_ongoing(&self) -> bool {
        matches!(self, SessionSpan::Ongoing { .. })
    }
}

/// A session as handed over by the repository. Start is always present, end might be before the
/// start for broken records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSession {
    pub id: Arc<str>,
    pub label: Arc<str>,
    pub span: SessionSpan,
}

impl RawSession {
    pub fn bounded(
        id: impl Into<Arc<str>>,
        label: impl Into<Arc<str>>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            span: SessionSpan::Bounded { start, end },
        }
    }

    pub fn ongoing(
        id: impl Into<Arc<str>>,
        label: impl Into<Arc<str>>,
        start: NaiveDateTime,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            span: SessionSpan::Ongoing { start },
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.span.start()
    }
}
