//! Pomodoro timer state machine.
//!
//! The engine is tick-driven: it holds no thread and no interval handle.
//! The caller delivers one `tick()` per elapsed second while running;
//! the scheduling mechanism (a real 1 Hz timer, or a loop in tests) stays
//! outside. That keeps every transition synchronous and deterministic.
//!
//! ## State transitions
//!
//! ```text
//! Idle -> Running -> AwaitingScore -> Idle   (scored, session recorded)
//!         Running -> Idle                    (abandoned, nothing recorded)
//! ```
//!
//! Reaching zero while running transitions to `AwaitingScore` exactly
//! once; surplus catch-up ticks (e.g. after a suspend/resume burst) are
//! no-ops because the phase has already left `Running`.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::events::Event;
use crate::session::{FocusSession, SessionStore, DURATION_OPTIONS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimerPhase {
    Idle,
    Running,
    AwaitingScore,
}

/// Rejections at the operation boundary. The machine stays in its
/// current valid state whenever one of these is returned.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerError {
    #[error("'{operation}' is not valid in the {phase:?} phase")]
    InvalidTransition {
        phase: TimerPhase,
        operation: &'static str,
    },

    #[error("{0} minutes is not one of the selectable durations")]
    UnsupportedDuration(u32),

    #[error("energy score {0} is outside 1..=5")]
    ScoreOutOfRange(u8),
}

/// The pomodoro countdown machine. One instance is active at a time;
/// serializable so the CLI can park it in the kv store between
/// invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    phase: TimerPhase,
    /// Planned duration in minutes. Mutable only while idle.
    target_minutes: u32,
    /// Invariant: `0 <= remaining_seconds <= target_minutes * 60`.
    remaining_seconds: u32,
}

impl TimerEngine {
    /// Create an idle engine with the given planned duration.
    ///
    /// # Errors
    /// Rejects durations outside the fixed option list.
    pub fn new(target_minutes: u32) -> Result<Self, TimerError> {
        if !DURATION_OPTIONS.contains(&target_minutes) {
            return Err(TimerError::UnsupportedDuration(target_minutes));
        }
        Ok(Self {
            phase: TimerPhase::Idle,
            target_minutes,
            remaining_seconds: target_minutes * 60,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn target_minutes(&self) -> u32 {
        self.target_minutes
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// 0.0 .. 1.0 progress through the planned duration.
    pub fn progress(&self) -> f64 {
        let total = f64::from(self.target_minutes) * 60.0;
        if total == 0.0 {
            return 0.0;
        }
        1.0 - f64::from(self.remaining_seconds) / total
    }

    /// Full state snapshot event.
    pub fn snapshot(&self, now: DateTime<Local>) -> Event {
        Event::StateSnapshot {
            phase: self.phase,
            target_minutes: self.target_minutes,
            remaining_seconds: self.remaining_seconds,
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Change the planned duration. Only meaningful while idle; calls in
    /// any other phase are ignored (`Ok(None)`) so residual UI scroll
    /// events cannot disturb a running countdown.
    ///
    /// # Errors
    /// Rejects durations outside the fixed option list.
    pub fn select_duration(
        &mut self,
        minutes: u32,
        now: DateTime<Local>,
    ) -> Result<Option<Event>, TimerError> {
        if self.phase != TimerPhase::Idle {
            return Ok(None);
        }
        if !DURATION_OPTIONS.contains(&minutes) {
            return Err(TimerError::UnsupportedDuration(minutes));
        }
        self.target_minutes = minutes;
        self.remaining_seconds = minutes * 60;
        Ok(Some(Event::DurationSelected {
            target_minutes: minutes,
            at: now,
        }))
    }

    /// Begin the countdown.
    ///
    /// # Errors
    /// Valid only while idle with a positive target.
    pub fn start(&mut self, now: DateTime<Local>) -> Result<Event, TimerError> {
        if self.phase != TimerPhase::Idle {
            return Err(TimerError::InvalidTransition {
                phase: self.phase,
                operation: "start",
            });
        }
        if self.target_minutes == 0 {
            return Err(TimerError::UnsupportedDuration(0));
        }
        self.phase = TimerPhase::Running;
        self.remaining_seconds = self.target_minutes * 60;
        Ok(Event::TimerStarted {
            target_minutes: self.target_minutes,
            at: now,
        })
    }

    /// One elapsed second. Returns the completion event when the
    /// countdown reaches zero, exactly once; ticks delivered in any
    /// other phase (including duplicates at zero) are no-ops.
    pub fn tick(&mut self, now: DateTime<Local>) -> Option<Event> {
        if self.phase != TimerPhase::Running {
            return None;
        }
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            self.phase = TimerPhase::AwaitingScore;
            return Some(Event::TimerCompleted {
                target_minutes: self.target_minutes,
                at: now,
            });
        }
        None
    }

    /// Discard the running countdown. Returns to idle with the clock
    /// reset; no session is recorded. Confirmation is the UI's problem;
    /// the transition itself is unconditional.
    ///
    /// # Errors
    /// Valid only while running.
    pub fn abandon(&mut self, now: DateTime<Local>) -> Result<Event, TimerError> {
        if self.phase != TimerPhase::Running {
            return Err(TimerError::InvalidTransition {
                phase: self.phase,
                operation: "abandon",
            });
        }
        let remaining = self.remaining_seconds;
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = self.target_minutes * 60;
        Ok(Event::TimerAbandoned {
            target_minutes: self.target_minutes,
            remaining_seconds: remaining,
            at: now,
        })
    }

    /// Attach the energy score to the completed countdown, append the
    /// resulting session to `store`, and return to idle. The completion
    /// instant is `now`: the record's start time is synthesized as
    /// `now - target`, and the session is attributed to `now`'s local day.
    ///
    /// A second call after a single completion is rejected because the
    /// phase has already left `AwaitingScore`.
    ///
    /// # Errors
    /// Rejects calls outside `AwaitingScore`, scores outside 1..=5, and
    /// propagates store failures (the engine stays scoreable in that
    /// case so the session is not lost).
    pub fn score(
        &mut self,
        energy_score: u8,
        now: DateTime<Local>,
        store: &mut dyn SessionStore,
    ) -> Result<Event, crate::error::CoreError> {
        if self.phase != TimerPhase::AwaitingScore {
            return Err(TimerError::InvalidTransition {
                phase: self.phase,
                operation: "score",
            }
            .into());
        }
        if !(1..=5).contains(&energy_score) {
            return Err(TimerError::ScoreOutOfRange(energy_score).into());
        }
        let session = FocusSession::completed_at(self.target_minutes, energy_score, now);
        store.append(session.clone())?;
        self.phase = TimerPhase::Idle;
        self.remaining_seconds = self.target_minutes * 60;
        Ok(Event::SessionRecorded { session, at: now })
    }
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self {
            phase: TimerPhase::Idle,
            target_minutes: 25,
            remaining_seconds: 25 * 60,
        }
    }
}
