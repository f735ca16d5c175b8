//! Statistics over the focus history.
//!
//! Counts, trend series, intraday energy buckets, streaks, calendar-day
//! summaries, and achievement badges. Everything is a pure function of
//! the session/task snapshots passed in.

mod aggregate;
mod badges;

pub use aggregate::{
    average_energy, count_and_minutes, daily_series, day_summary, filter_by_date,
    filter_by_range, intraday_energy, range_rollup, streak, weekly_energy_trend, BucketEnergy,
    DayEnergy, DayMinutes, DaySummary, RangeRollup, StatsRange, INTRADAY_HOURS,
};
pub use badges::{all_badges, badge_progress, Badge, BadgeProgress, FocusTotals};
