//! Day view layout. Turns sessions of a single day into rectangles for a calendar-like canvas.
//!
//! The pass is done in 3 steps:
//!  - [normalize::normalize] converts sessions into minutes from midnight.
//!  - [columns::assign_lanes] packs overlapping events into lanes.
//!  - [width] decides how wide every event is based on [Packing].
//!
//! Everything here is a pure computation. Current time is passed through [DayWindow] so that a
//! running session is laid out the same way for the same input.

pub mod columns;
pub mod config;
pub mod normalize;
pub mod session;
pub mod width;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use tracing::{debug, instrument};

pub use config::{LayoutConfig, Packing};
pub use normalize::NormalizedEvent;
pub use session::{RawSession, SessionSpan};

use crate::utils::percentage::Percentage;

use self::{
    columns::assign_lanes,
    normalize::normalize,
    width::{cluster_shares, local_shares},
};

/// Day that is being rendered and the moment running sessions are extended to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub day: NaiveDate,
    pub now: NaiveDateTime,
}

impl DayWindow {
    pub fn new(day: NaiveDate, now: NaiveDateTime) -> Self {
        Self { day, now }
    }

    pub fn day_start(&self) -> NaiveDateTime {
        self.day.and_time(NaiveTime::MIN)
    }
}

/// An event with its place on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedEvent {
    #[serde(flatten)]
    pub event: NormalizedEvent,
    pub top: f64,
    pub height: f64,
    /// Lane picked during packing. Overlapping events never share it.
    pub lane: usize,
    pub column_index: usize,
    pub column_count: usize,
    pub left_percent: Percentage,
    pub width_percent: Percentage,
}

/// Lays out sessions of `window.day`. Returns one event per session ordered by start.
#[instrument(skip(sessions, config), fields(sessions = sessions.len()))]
pub fn layout(
    sessions: &[RawSession],
    window: DayWindow,
    config: &LayoutConfig,
) -> Vec<PositionedEvent> {
    // Stable, so sessions starting at the same time keep the order they came in.
    let mut sorted = sessions.iter().collect::<Vec<_>>();
    sorted.sort_by_key(|v| v.start());

    let events = sorted
        .into_iter()
        .map(|v| normalize(v, window.day_start(), window.now, config.min_duration()))
        .collect::<Vec<_>>();

    let assignment = assign_lanes(&events);
    debug!(
        "Packed {} events into {} clusters",
        events.len(),
        assignment.cluster_lanes.len()
    );

    let shares = match config.packing() {
        Packing::Local => local_shares(&events, &assignment),
        Packing::Cluster => cluster_shares(&assignment),
    };

    events
        .into_iter()
        .zip(assignment.placements)
        .zip(shares)
        .map(|((event, placement), share)| PositionedEvent {
            top: config.minutes_to_px(event.start_minute),
            height: config
                .minutes_to_px(event.duration_minutes)
                .max(config.min_height_px()),
            lane: placement.lane,
            column_index: share.column_index,
            column_count: share.column_count,
            left_percent: Percentage::slot_offset(share.column_index, share.column_count),
            width_percent: Percentage::slot_width(share.column_count),
            event,
        })
        .collect()
}
