use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone};

/// This is the standard way of converting a date to a string in dayview.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Returns the first moment of `date` in `tz`. Usually it's midnight, but when a DST transition
/// skips midnight the day starts at the first local time that exists, e.g. 01:00.
pub fn day_start_in<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    let midnight = date.and_time(NaiveTime::MIN);
    (0..24 * 60).find_map(|minute| {
        tz.from_local_datetime(&(midnight + Duration::minutes(minute)))
            .earliest()
    })
}

/// Formats duration the way it's shown in summaries, e.g. `3h 5m`.
pub fn format_hours_minutes(v: Duration) -> String {
    format!("{}h {}m", v.num_hours(), v.num_minutes() % 60)
}

/// Formats duration with the largest unit that is present, e.g. `1h5m` or `45m`.
pub fn format_duration(v: Duration) -> String {
    if v.num_hours() > 0 {
        format!("{}h{}m", v.num_hours(), v.num_minutes() % 60)
    } else {
        format!("{}m", v.num_minutes())
    }
}

/// Formats minutes since midnight as a wall-clock time. Values past midnight wrap around.
pub fn format_minute_of_day(minute: i64) -> String {
    let minute = minute.rem_euclid(24 * 60);
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

#[cfg(test)]
mod tests {
    use chrono::{
        Duration, FixedOffset, MappedLocalTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
    };

    use super::{day_start_in, format_duration, format_hours_minutes, format_minute_of_day};

    #[test]
    fn test_formatting() {
        assert_eq!(format_hours_minutes(Duration::minutes(185)), "3h 5m");
        assert_eq!(format_hours_minutes(Duration::seconds(59)), "0h 0m");
        assert_eq!(format_duration(Duration::minutes(65)), "1h5m");
        assert_eq!(format_duration(Duration::minutes(45)), "45m");
        assert_eq!(format_minute_of_day(570), "09:30");
        assert_eq!(format_minute_of_day(1500), "01:00");
    }

    #[test]
    fn test_day_start() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        let start = day_start_in(date, &Utc).unwrap();
        assert_eq!(start.naive_utc(), date.and_hms_opt(0, 0, 0).unwrap());
    }

    const GAP_DATE: NaiveDate = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
    const GAP_START: NaiveDateTime = NaiveDateTime::new(GAP_DATE, NaiveTime::MIN);

    /// Zone that moves from UTC to UTC+1 at midnight of [GAP_DATE], so 00:00..01:00 never happens.
    #[derive(Debug, Clone, Copy)]
    struct MidnightGap;

    impl MidnightGap {
        fn before() -> FixedOffset {
            FixedOffset::east_opt(0).unwrap()
        }

        fn after() -> FixedOffset {
            FixedOffset::east_opt(3600).unwrap()
        }
    }

    impl TimeZone for MidnightGap {
        type Offset = FixedOffset;

        fn from_offset(_: &FixedOffset) -> Self {
            MidnightGap
        }

        fn offset_from_local_date(&self, local: &NaiveDate) -> MappedLocalTime<FixedOffset> {
            self.offset_from_local_datetime(&local.and_time(NaiveTime::MIN))
        }

        fn offset_from_local_datetime(&self, local: &NaiveDateTime) -> MappedLocalTime<FixedOffset> {
            if *local < GAP_START {
                MappedLocalTime::Single(Self::before())
            } else if *local < GAP_START + Duration::hours(1) {
                MappedLocalTime::None
            } else {
                MappedLocalTime::Single(Self::after())
            }
        }

        fn offset_from_utc_date(&self, utc: &NaiveDate) -> FixedOffset {
            self.offset_from_utc_datetime(&utc.and_time(NaiveTime::MIN))
        }

        fn offset_from_utc_datetime(&self, utc: &NaiveDateTime) -> FixedOffset {
            if *utc < GAP_START {
                Self::before()
            } else {
                Self::after()
            }
        }
    }

    #[test]
    fn test_day_start_skipped_midnight() {
        let start = day_start_in(GAP_DATE, &MidnightGap).unwrap();
        assert_eq!(start.naive_local(), GAP_DATE.and_hms_opt(1, 0, 0).unwrap());
        assert_eq!(start.naive_utc(), GAP_START);

        let next = GAP_DATE.succ_opt().unwrap();
        let start = day_start_in(next, &MidnightGap).unwrap();
        assert_eq!(start.naive_local(), next.and_hms_opt(0, 0, 0).unwrap());
    }
}
