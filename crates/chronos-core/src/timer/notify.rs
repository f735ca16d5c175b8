//! Completion side effects: sound cue and haptic pulse requests.
//!
//! These are best-effort notifications, not correctness-critical state.
//! A failing backend is logged and swallowed; it can never disturb the
//! timer or the recorded history.

use serde::{Deserialize, Serialize};
use std::io::Write;

/// The three short audio cues a user can pick in settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundType {
    Digital,
    Bell,
    Nature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPattern {
    /// Single short pulse for minor interactions.
    Tap,
    /// Triple pulse for session completion.
    Completion,
}

impl HapticPattern {
    /// Pulse/pause milliseconds, alternating, starting with a pulse.
    pub fn pulses_ms(self) -> &'static [u64] {
        match self {
            HapticPattern::Tap => &[10],
            HapticPattern::Completion => &[150, 80, 150],
        }
    }
}

type NotifyResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Backend for completion cues. Implementations may fail; callers go
/// through [`announce_completion`], which swallows errors.
pub trait Notifier {
    fn play(&self, sound: SoundType) -> NotifyResult;
    fn vibrate(&self, pattern: HapticPattern) -> NotifyResult;
}

/// Discards every request. For tests and headless use.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn play(&self, _sound: SoundType) -> NotifyResult {
        Ok(())
    }

    fn vibrate(&self, _pattern: HapticPattern) -> NotifyResult {
        Ok(())
    }
}

/// Terminal-backed notifier: rings the bell for any cue, has no haptic
/// capability.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalBell;

impl Notifier for TerminalBell {
    fn play(&self, _sound: SoundType) -> NotifyResult {
        let mut out = std::io::stdout();
        out.write_all(b"\x07")?;
        out.flush()?;
        Ok(())
    }

    fn vibrate(&self, _pattern: HapticPattern) -> NotifyResult {
        // No haptics on a terminal. Absence of the capability is not an
        // error.
        Ok(())
    }
}

/// Settings the announcement honors. A subset of the app config so the
/// timer does not depend on the config module.
#[derive(Debug, Clone, Copy)]
pub struct CompletionCues {
    pub sound_enabled: bool,
    pub sound: SoundType,
    pub vibration_enabled: bool,
}

/// Fire the configured completion cues through `notifier`. Failures are
/// logged at warn level and otherwise ignored.
pub fn announce_completion(cues: CompletionCues, notifier: &dyn Notifier) {
    if cues.sound_enabled {
        if let Err(err) = notifier.play(cues.sound) {
            tracing::warn!(error = %err, "completion sound failed");
        }
    }
    if cues.vibration_enabled {
        if let Err(err) = notifier.vibrate(HapticPattern::Completion) {
            tracing::warn!(error = %err, "completion haptic failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Recording {
        played: RefCell<Vec<SoundType>>,
        vibrated: RefCell<Vec<HapticPattern>>,
        fail: bool,
    }

    impl Recording {
        fn new(fail: bool) -> Self {
            Self {
                played: RefCell::new(Vec::new()),
                vibrated: RefCell::new(Vec::new()),
                fail,
            }
        }
    }

    impl Notifier for Recording {
        fn play(&self, sound: SoundType) -> NotifyResult {
            self.played.borrow_mut().push(sound);
            if self.fail {
                return Err("audio backend unavailable".into());
            }
            Ok(())
        }

        fn vibrate(&self, pattern: HapticPattern) -> NotifyResult {
            self.vibrated.borrow_mut().push(pattern);
            Ok(())
        }
    }

    #[test]
    fn announce_honors_settings() {
        let notifier = Recording::new(false);
        announce_completion(
            CompletionCues {
                sound_enabled: true,
                sound: SoundType::Bell,
                vibration_enabled: false,
            },
            &notifier,
        );
        assert_eq!(*notifier.played.borrow(), vec![SoundType::Bell]);
        assert!(notifier.vibrated.borrow().is_empty());
    }

    #[test]
    fn announce_swallows_backend_failure() {
        let notifier = Recording::new(true);
        // Must not panic or propagate; the haptic still fires.
        announce_completion(
            CompletionCues {
                sound_enabled: true,
                sound: SoundType::Digital,
                vibration_enabled: true,
            },
            &notifier,
        );
        assert_eq!(*notifier.vibrated.borrow(), vec![HapticPattern::Completion]);
    }

    #[test]
    fn completion_pattern_is_triple_pulse() {
        assert_eq!(HapticPattern::Completion.pulses_ms(), &[150, 80, 150]);
        assert_eq!(HapticPattern::Tap.pulses_ms(), &[10]);
    }
}
