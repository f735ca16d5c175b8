use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::session::FocusSession;
use crate::timer::TimerPhase;

/// Every accepted timer operation produces an Event. The CLI prints
/// them as JSON; a GUI would subscribe to them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    DurationSelected {
        target_minutes: u32,
        at: DateTime<Local>,
    },
    TimerStarted {
        target_minutes: u32,
        at: DateTime<Local>,
    },
    /// Countdown reached zero; the machine is awaiting a score.
    /// Emitted exactly once per completion.
    TimerCompleted {
        target_minutes: u32,
        at: DateTime<Local>,
    },
    TimerAbandoned {
        target_minutes: u32,
        /// Seconds that were still on the clock. The progress is
        /// discarded; no session is recorded.
        remaining_seconds: u32,
        at: DateTime<Local>,
    },
    /// A scored session was appended to the record store.
    SessionRecorded {
        session: FocusSession,
        at: DateTime<Local>,
    },
    StateSnapshot {
        phase: TimerPhase,
        target_minutes: u32,
        remaining_seconds: u32,
        at: DateTime<Local>,
    },
}
