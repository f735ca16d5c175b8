//! Completed focus sessions and the append-only record store.
//!
//! A [`FocusSession`] only ever exists with an energy score attached;
//! the timer constructs one at scoring time and hands it to a
//! [`SessionStore`]. From the core's perspective the store is
//! append-only and single-writer; readers work on snapshots.

use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::clock::{day_key, time_label};
use crate::error::CoreError;

/// The fixed duration option list, in minutes. Duration selection only
/// accepts members of this list.
pub const DURATION_OPTIONS: [u32; 13] = [5, 10, 15, 20, 25, 30, 35, 40, 45, 50, 60, 90, 120];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionKind {
    Pomodoro,
    /// Kept for forward compatibility; the timer currently only records
    /// pomodoros.
    ShortBreak,
    LongBreak,
}

/// One completed, scored focus interval. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusSession {
    pub id: String,
    /// Epoch milliseconds. Synthetic: completion instant minus the
    /// planned duration, not the observed start.
    pub start_time: i64,
    pub duration_minutes: u32,
    /// 1-5, user-supplied after completion.
    pub energy_score: u8,
    pub kind: SessionKind,
    /// Attribution day: the local date of the *completion* instant, so a
    /// session spanning midnight belongs to the day it finished.
    pub date: NaiveDate,
    /// `HH:mm` at completion, for intraday bucketing.
    pub time_label: String,
}

impl FocusSession {
    /// Build the record for a pomodoro that completed at `now`.
    pub fn completed_at(target_minutes: u32, energy_score: u8, now: DateTime<Local>) -> Self {
        let start = now - Duration::minutes(i64::from(target_minutes));
        Self {
            id: Uuid::new_v4().to_string(),
            start_time: start.timestamp_millis(),
            duration_minutes: target_minutes,
            energy_score,
            kind: SessionKind::Pomodoro,
            date: day_key(now),
            time_label: time_label(now),
        }
    }
}

/// Sink for completed sessions. The timer's `score` call is the only
/// writer in the core; appends are atomic from the reader's view.
pub trait SessionStore {
    fn append(&mut self, session: FocusSession) -> Result<(), CoreError>;
}

/// In-memory session history. Backs tests and the sync payload; the
/// persistent counterpart is [`crate::storage::Database`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    sessions: Vec<FocusSession>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_sessions(sessions: Vec<FocusSession>) -> Self {
        Self { sessions }
    }

    /// Immutable snapshot for the aggregation functions.
    pub fn snapshot(&self) -> &[FocusSession] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for History {
    fn append(&mut self, session: FocusSession) -> Result<(), CoreError> {
        self.sessions.push(session);
        Ok(())
    }
}
