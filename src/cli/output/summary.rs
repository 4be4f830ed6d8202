use std::{collections::HashMap, sync::Arc};

use chrono::{Duration, NaiveDateTime};

use crate::layout::{DayWindow, RawSession};

#[derive(Debug, PartialEq, Eq)]
pub struct LabelUsage {
    pub label: Arc<str>,
    pub duration: Duration,
}

impl LabelUsage {
    fn new(label: Arc<str>) -> Self {
        Self {
            label,
            duration: Duration::zero(),
        }
    }
}

/// Totals of a single day.
#[derive(Debug, PartialEq, Eq)]
pub struct DaySummary {
    pub tracked: Duration,
    pub session_count: usize,
    /// Label of the session that is still being tracked.
    pub running: Option<Arc<str>>,
    /// Single session with the most time inside the day. The earliest one wins a tie.
    pub longest: Option<LabelUsage>,
    /// Time per label, longest first.
    pub labels: Vec<LabelUsage>,
}

/// Sums up real time spent in sessions on `window.day`. Unlike layout, nothing is rounded up to a
/// minimal duration and time outside of the day is not counted.
pub fn summarize_day(sessions: &[RawSession], window: DayWindow) -> DaySummary {
    let day_start = window.day_start();
    let day_end = day_start + Duration::days(1);

    let mut map = HashMap::<Arc<str>, LabelUsage>::new();
    let mut tracked = Duration::zero();
    let mut running = None;
    let mut longest: Option<LabelUsage> = None;

    for session in sessions {
        let duration = clipped_duration(
            session.start(),
            session.span.resolve_end(window.now),
            day_start,
            day_end,
        );
        tracked += duration;
        if session.span.is_ongoing() {
            running = Some(session.label.clone());
        }
        if longest.as_ref().map_or(true, |v| duration > v.duration) {
            longest = Some(LabelUsage {
                label: session.label.clone(),
                duration,
            });
        }
        let usage = map
            .entry(session.label.clone())
            .or_insert_with(|| LabelUsage::new(session.label.clone()));
        usage.duration += duration;
    }

    let mut labels = map.into_values().collect::<Vec<_>>();
    labels.sort_by(|a, b| b.duration.cmp(&a.duration).then_with(|| a.label.cmp(&b.label)));

    DaySummary {
        tracked,
        session_count: sessions.len(),
        running,
        longest,
        labels,
    }
}

fn clipped_duration(
    start: NaiveDateTime,
    end: NaiveDateTime,
    day_start: NaiveDateTime,
    day_end: NaiveDateTime,
) -> Duration {
    let start = start.max(day_start);
    let end = end.min(day_end);
    if end > start {
        end - start
    } else {
        Duration::zero()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime};

    use crate::layout::{DayWindow, RawSession};

    use super::{LabelUsage, summarize_day};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();

    fn at(hour: u32, minute: u32) -> NaiveDateTime {
        TEST_DATE.and_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn test_empty_day() {
        let summary = summarize_day(&[], DayWindow::new(TEST_DATE, at(12, 0)));
        assert_eq!(summary.tracked, Duration::zero());
        assert_eq!(summary.session_count, 0);
        assert!(summary.labels.is_empty());
        assert_eq!(summary.running, None);
        assert_eq!(summary.longest, None);
    }

    #[test]
    fn test_totals() {
        let yesterday = TEST_DATE.pred_opt().unwrap().and_hms_opt(23, 0, 0).unwrap();
        let sessions = [
            RawSession::bounded("a", "Work", at(9, 0), at(10, 30)),
            RawSession::bounded("b", "Reading", at(11, 0), at(11, 5)),
            RawSession::bounded("c", "Work", yesterday, at(0, 30)),
            RawSession::bounded("d", "Broken", at(13, 0), at(12, 0)),
            RawSession::ongoing("e", "Gym", at(17, 0)),
        ];
        let summary = summarize_day(&sessions, DayWindow::new(TEST_DATE, at(18, 0)));

        assert_eq!(summary.tracked, Duration::minutes(90 + 5 + 30 + 60));
        assert_eq!(summary.session_count, 5);
        assert_eq!(summary.running.as_deref(), Some("Gym"));
        // Per session, not per label.
        assert_eq!(
            summary.longest,
            Some(LabelUsage {
                label: "Work".into(),
                duration: Duration::minutes(90),
            })
        );
        let labels = summary
            .labels
            .iter()
            .map(|v| (&*v.label, v.duration.num_minutes()))
            .collect::<Vec<_>>();
        assert_eq!(
            labels,
            vec![("Work", 120), ("Gym", 60), ("Reading", 5), ("Broken", 0)]
        );
    }

    #[test]
    fn test_longest_prefers_earliest_on_tie() {
        let sessions = [
            RawSession::bounded("a", "Write", at(9, 0), at(10, 0)),
            RawSession::bounded("b", "Call", at(11, 0), at(12, 0)),
            RawSession::bounded("c", "Gap", at(12, 0), at(12, 10)),
        ];
        let summary = summarize_day(&sessions, DayWindow::new(TEST_DATE, at(18, 0)));
        let longest = summary.longest.unwrap();
        assert_eq!(&*longest.label, "Write");
        assert_eq!(longest.duration, Duration::hours(1));
    }
}
