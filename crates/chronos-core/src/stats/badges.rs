//! Achievement badges over cumulative focus totals.
//!
//! Badges are pure threshold computations, re-evaluated from current
//! totals every time. They are never persisted as "earned" flags, so a
//! re-evaluation is always consistent with the history it was computed
//! from.

use serde::{Deserialize, Serialize};

use crate::session::FocusSession;

/// The fixed, ordered badge list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    StartingPoint,
    DeepFocus,
    Pro,
    Master,
}

impl Badge {
    pub const ALL: [Badge; 4] = [
        Badge::StartingPoint,
        Badge::DeepFocus,
        Badge::Pro,
        Badge::Master,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Badge::StartingPoint => "Starting Point",
            Badge::DeepFocus => "Deep Focus",
            Badge::Pro => "Pro",
            Badge::Master => "Master",
        }
    }

    pub fn requirement(self) -> &'static str {
        match self {
            Badge::StartingPoint => "1 pomodoro",
            Badge::DeepFocus => "100 focus minutes",
            Badge::Pro => "50 pomodoros",
            Badge::Master => "200 pomodoros",
        }
    }
}

/// The small metrics struct every badge evaluates against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusTotals {
    pub count: u64,
    pub minutes: u64,
}

impl FocusTotals {
    pub fn from_sessions(sessions: &[FocusSession]) -> Self {
        let (count, minutes) = crate::stats::count_and_minutes(sessions);
        Self {
            count: count as u64,
            minutes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BadgeProgress {
    pub badge: Badge,
    pub earned: bool,
    pub progress: u64,
    pub target: u64,
}

impl BadgeProgress {
    /// Progress-bar fill, capped at 1.0.
    pub fn fraction(&self) -> f64 {
        (self.progress as f64 / self.target as f64).min(1.0)
    }
}

/// Evaluate one badge against the current totals.
pub fn badge_progress(totals: FocusTotals, badge: Badge) -> BadgeProgress {
    let (progress, target) = match badge {
        Badge::StartingPoint => (totals.count, 1),
        Badge::DeepFocus => (totals.minutes, 100),
        Badge::Pro => (totals.count, 50),
        Badge::Master => (totals.count, 200),
    };
    BadgeProgress {
        badge,
        earned: progress >= target,
        progress,
        target,
    }
}

/// Evaluate the whole list, in its fixed order.
pub fn all_badges(totals: FocusTotals) -> Vec<BadgeProgress> {
    Badge::ALL
        .iter()
        .map(|&badge| badge_progress(totals, badge))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pro_threshold_is_exact() {
        let below = badge_progress(FocusTotals { count: 49, minutes: 0 }, Badge::Pro);
        assert!(!below.earned);
        assert_eq!(below.progress, 49);
        assert_eq!(below.target, 50);

        let at = badge_progress(FocusTotals { count: 50, minutes: 0 }, Badge::Pro);
        assert!(at.earned);
    }

    #[test]
    fn deep_focus_uses_minutes_not_count() {
        let totals = FocusTotals { count: 1, minutes: 100 };
        assert!(badge_progress(totals, Badge::DeepFocus).earned);
        assert!(!badge_progress(totals, Badge::Pro).earned);
        assert!(badge_progress(totals, Badge::StartingPoint).earned);
    }

    #[test]
    fn fraction_caps_at_one() {
        let over = badge_progress(FocusTotals { count: 500, minutes: 0 }, Badge::Master);
        assert!((over.fraction() - 1.0).abs() < f64::EPSILON);
        let half = badge_progress(FocusTotals { count: 100, minutes: 0 }, Badge::Master);
        assert!((half.fraction() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn all_badges_keeps_the_fixed_order() {
        let list = all_badges(FocusTotals::default());
        let kinds: Vec<_> = list.iter().map(|b| b.badge).collect();
        assert_eq!(kinds, Badge::ALL.to_vec());
        assert!(list.iter().all(|b| !b.earned));
    }
}
