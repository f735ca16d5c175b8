//! Pure aggregation over the session history.
//!
//! Everything here is a stateless function of the slices it is given;
//! the caller decides where the snapshot comes from (in-memory history
//! or a database load) and which subset to pass. Day keys compare as
//! calendar dates, so range filters are simple ordered comparisons.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::clock::days_in_range;
use crate::session::FocusSession;
use crate::tasks::Task;

/// Session count plus summed planned minutes: the basic fold every
/// other statistic builds on.
pub fn count_and_minutes(sessions: &[FocusSession]) -> (usize, u64) {
    let minutes = sessions
        .iter()
        .map(|s| u64::from(s.duration_minutes))
        .sum();
    (sessions.len(), minutes)
}

pub fn filter_by_date(sessions: &[FocusSession], date: NaiveDate) -> Vec<FocusSession> {
    sessions.iter().filter(|s| s.date == date).cloned().collect()
}

/// Sessions attributed to a day in `start..=end`.
pub fn filter_by_range(
    sessions: &[FocusSession],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<FocusSession> {
    sessions
        .iter()
        .filter(|s| s.date >= start && s.date <= end)
        .cloned()
        .collect()
}

/// One point of a per-day trend chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayMinutes {
    pub date: NaiveDate,
    pub minutes: u64,
}

/// Summed minutes for each supplied day, in input order, with explicit
/// zeros for days without sessions. Charts rely on one entry per input
/// day with no gaps.
pub fn daily_series(
    sessions: &[FocusSession],
    days: impl IntoIterator<Item = NaiveDate>,
) -> Vec<DayMinutes> {
    days.into_iter()
        .map(|date| {
            let minutes = sessions
                .iter()
                .filter(|s| s.date == date)
                .map(|s| u64::from(s.duration_minutes))
                .sum();
            DayMinutes { date, minutes }
        })
        .collect()
}

/// The two-hour bucket labels of the intraday energy chart.
pub const INTRADAY_HOURS: [u32; 8] = [8, 10, 12, 14, 16, 18, 20, 22];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketEnergy {
    /// `"08:00"` .. `"22:00"`.
    pub label: String,
    /// Energy score of the representative sample, 0 when the bucket is
    /// empty.
    pub energy: u8,
}

/// Energy per two-hour bucket. The representative sample is the *first*
/// session whose time label starts with the bucket's hour prefix; later
/// matches are ignored. Deliberately not an average.
pub fn intraday_energy(sessions: &[FocusSession]) -> Vec<BucketEnergy> {
    INTRADAY_HOURS
        .iter()
        .map(|hour| {
            let prefix = format!("{hour:02}");
            let energy = sessions
                .iter()
                .find(|s| s.time_label.starts_with(&prefix))
                .map(|s| s.energy_score)
                .unwrap_or(0);
            BucketEnergy {
                label: format!("{hour:02}:00"),
                energy,
            }
        })
        .collect()
}

/// Arithmetic mean of the energy scores, `None` when there is no data.
/// Display rounds to one decimal place.
pub fn average_energy(sessions: &[FocusSession]) -> Option<f64> {
    if sessions.is_empty() {
        return None;
    }
    let total: u64 = sessions.iter().map(|s| u64::from(s.energy_score)).sum();
    Some(total as f64 / sessions.len() as f64)
}

/// Per-day average energy for the seven days ending at `today`, zeros
/// for days without sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayEnergy {
    pub date: NaiveDate,
    pub energy: f64,
}

pub fn weekly_energy_trend(sessions: &[FocusSession], today: NaiveDate) -> Vec<DayEnergy> {
    days_in_range(today - Duration::days(6), today)
        .map(|date| {
            let day: Vec<_> = sessions.iter().filter(|s| s.date == date).collect();
            let energy = if day.is_empty() {
                0.0
            } else {
                day.iter().map(|s| f64::from(s.energy_score)).sum::<f64>() / day.len() as f64
            };
            DayEnergy { date, energy }
        })
        .collect()
}

/// Consecutive days with at least one session, walking backward from
/// `today` and breaking on the first gap. A `today` without sessions is
/// already a gap, so the streak is 0.
pub fn streak(sessions: &[FocusSession], today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = today;
    while sessions.iter().any(|s| s.date == day) {
        count += 1;
        day -= Duration::days(1);
    }
    count
}

/// Calendar review numbers for one day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub completed_tasks: usize,
    pub session_count: usize,
    pub focus_minutes: u64,
    /// Absent when the day has no sessions; never a division by zero.
    pub average_energy: Option<f64>,
    /// The day's sessions ordered by start time.
    pub sessions: Vec<FocusSession>,
}

pub fn day_summary(sessions: &[FocusSession], tasks: &[Task], date: NaiveDate) -> DaySummary {
    let mut day_sessions = filter_by_date(sessions, date);
    day_sessions.sort_by_key(|s| s.start_time);
    let (session_count, focus_minutes) = count_and_minutes(&day_sessions);
    DaySummary {
        date,
        completed_tasks: tasks
            .iter()
            .filter(|t| t.date == date && t.completed)
            .count(),
        session_count,
        focus_minutes,
        average_energy: average_energy(&day_sessions),
        sessions: day_sessions,
    }
}

/// The three roll-up tabs of the stats screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsRange {
    Today,
    /// Days from `today - 7` onward, the date-granular equivalent of a
    /// last-seven-days timestamp window.
    Week,
    All,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeRollup {
    pub range: StatsRange,
    pub session_count: usize,
    pub focus_minutes: u64,
    pub completed_tasks: usize,
}

pub fn range_rollup(
    sessions: &[FocusSession],
    tasks: &[Task],
    range: StatsRange,
    today: NaiveDate,
) -> RangeRollup {
    let since = match range {
        StatsRange::Today => Some(today),
        StatsRange::Week => Some(today - Duration::days(7)),
        StatsRange::All => None,
    };
    let in_range = |date: NaiveDate| since.map_or(true, |s| date >= s);
    let selected: Vec<_> = sessions.iter().filter(|s| in_range(s.date)).cloned().collect();
    let (session_count, focus_minutes) = count_and_minutes(&selected);
    RangeRollup {
        range,
        session_count,
        focus_minutes,
        completed_tasks: tasks
            .iter()
            .filter(|t| t.completed && in_range(t.date))
            .count(),
    }
}
