//! # Chronos Core Library
//!
//! Core business logic for the Chronos focus tracker: a pomodoro
//! countdown state machine and the aggregation engine over the session
//! history it produces. The CLI binary is a thin layer on top; a GUI
//! would be the same.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a tick-driven state machine; the caller delivers
//!   one `tick()` per elapsed second, and completion is observed exactly
//!   once
//! - **Session Store**: append-only history of completed, scored
//!   sessions (SQLite-backed, with an in-memory variant)
//! - **Stats**: pure aggregation over history snapshots - series,
//!   streaks, intraday energy, badges
//! - **Storage**: SQLite persistence and TOML configuration
//! - **Sync**: best-effort cloud mirror; local data stays authoritative

pub mod clock;
pub mod error;
pub mod events;
pub mod session;
pub mod stats;
pub mod storage;
pub mod sync;
pub mod tasks;
pub mod timer;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, DatabaseError, SyncError};
pub use events::Event;
pub use session::{FocusSession, History, SessionKind, SessionStore, DURATION_OPTIONS};
pub use stats::{Badge, BadgeProgress, FocusTotals, StatsRange};
pub use storage::{Config, Database};
pub use sync::{SyncClient, SyncPayload};
pub use tasks::{assign_slot, Task};
pub use timer::{TimerEngine, TimerError, TimerPhase};
