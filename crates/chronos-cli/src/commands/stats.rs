use chrono::{Duration, NaiveDate};
use clap::Subcommand;

use chronos_core::clock::{days_in_range, today};
use chronos_core::{stats, Database, FocusTotals, StatsRange, SystemClock};

use super::CliResult;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's roll-up
    Today,
    /// Trailing seven days
    Week,
    /// All-time roll-up
    All,
    /// Calendar review for one day
    Day {
        /// YYYY-MM-DD
        date: NaiveDate,
    },
    /// Per-day focus minutes for the trailing N days
    Trend {
        #[arg(long, default_value = "7")]
        days: u32,
    },
    /// Intraday energy buckets for today, and the weekly energy trend
    Energy,
    /// Achievement badges over the full history
    Badges,
    /// Consecutive days with at least one session
    Streak,
}

pub fn run(action: StatsAction) -> CliResult {
    let db = Database::open()?;
    let sessions = db.sessions_all()?;
    let today = today(&SystemClock);

    match action {
        StatsAction::Today | StatsAction::Week | StatsAction::All => {
            let range = match action {
                StatsAction::Today => StatsRange::Today,
                StatsAction::Week => StatsRange::Week,
                _ => StatsRange::All,
            };
            let tasks = db.tasks_all()?;
            let rollup = stats::range_rollup(&sessions, &tasks, range, today);
            println!("{}", serde_json::to_string_pretty(&rollup)?);
        }
        StatsAction::Day { date } => {
            let tasks = db.tasks_for_date(date)?;
            let summary = stats::day_summary(&sessions, &tasks, date);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        StatsAction::Trend { days } => {
            let days = days.max(1);
            let start = today - Duration::days(i64::from(days) - 1);
            let series = stats::daily_series(&sessions, days_in_range(start, today));
            println!("{}", serde_json::to_string_pretty(&series)?);
        }
        StatsAction::Energy => {
            let today_sessions = stats::filter_by_date(&sessions, today);
            let report = serde_json::json!({
                "intraday": stats::intraday_energy(&today_sessions),
                "weekly": stats::weekly_energy_trend(&sessions, today),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        StatsAction::Badges => {
            let badges = stats::all_badges(FocusTotals::from_sessions(&sessions));
            println!("{}", serde_json::to_string_pretty(&badges)?);
        }
        StatsAction::Streak => {
            println!("{}", stats::streak(&sessions, today));
        }
    }
    Ok(())
}
