//! Wall-clock access and calendar-day bucketing.
//!
//! All statistics group by the local calendar day (`YYYY-MM-DD`, boundary
//! at local midnight). Day keys are `chrono::NaiveDate`, which serializes
//! to the key format and orders the same way the strings do.
//!
//! The clock itself is an injected dependency so the timer and CLI never
//! reach for ambient time: production code uses [`SystemClock`], tests
//! pin a [`FixedClock`].

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

/// Source of "now". One method on purpose; everything else derives.
pub trait Clock {
    fn now(&self) -> DateTime<Local>;
}

/// The real wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock pinned to one instant. Intended for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

/// Calendar-day key for an arbitrary local instant.
pub fn day_key(at: DateTime<Local>) -> NaiveDate {
    at.date_naive()
}

/// Today's calendar-day key.
pub fn today(clock: &impl Clock) -> NaiveDate {
    day_key(clock.now())
}

/// `HH:mm` 24-hour local time-of-day label, used for intraday bucketing.
pub fn time_label(at: DateTime<Local>) -> String {
    at.format("%H:%M").to_string()
}

/// Monday-anchored ISO week start. A Sunday maps back six days.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Lazy, restartable sequence of day keys, inclusive on both ends.
/// Empty when `start > end`.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> + Clone {
    start.iter_days().take_while(move |d| *d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn day_key_uses_local_date() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 23, 59, 59).unwrap();
        assert_eq!(day_key(at), date(2024, 3, 5));
    }

    #[test]
    fn time_label_is_24_hour() {
        let at = Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 0).unwrap();
        assert_eq!(time_label(at), "14:07");
        let morning = Local.with_ymd_and_hms(2024, 3, 5, 8, 0, 0).unwrap();
        assert_eq!(time_label(morning), "08:00");
    }

    #[test]
    fn week_starts_on_monday() {
        // 2024-01-03 is a Wednesday.
        assert_eq!(start_of_week(date(2024, 1, 3)), date(2024, 1, 1));
        // A Monday maps to itself.
        assert_eq!(start_of_week(date(2024, 1, 1)), date(2024, 1, 1));
        // A Sunday maps back six days.
        assert_eq!(start_of_week(date(2024, 1, 7)), date(2024, 1, 1));
    }

    #[test]
    fn days_in_range_is_inclusive_and_ordered() {
        let days: Vec<_> = days_in_range(date(2024, 1, 30), date(2024, 2, 2)).collect();
        assert_eq!(
            days,
            vec![
                date(2024, 1, 30),
                date(2024, 1, 31),
                date(2024, 2, 1),
                date(2024, 2, 2),
            ]
        );
    }

    #[test]
    fn days_in_range_empty_when_reversed() {
        assert_eq!(days_in_range(date(2024, 2, 2), date(2024, 1, 1)).count(), 0);
    }

    #[test]
    fn fixed_clock_pins_today() {
        let at = Local.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap();
        assert_eq!(today(&FixedClock(at)), date(2024, 6, 1));
    }
}
