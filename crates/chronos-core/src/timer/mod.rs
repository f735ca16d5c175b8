mod engine;
mod notify;

pub use engine::{TimerEngine, TimerError, TimerPhase};
pub use notify::{
    announce_completion, CompletionCues, HapticPattern, Notifier, NullNotifier, SoundType,
    TerminalBell,
};
