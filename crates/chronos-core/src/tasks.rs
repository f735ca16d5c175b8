//! Daily tasks and the core-goal slot allocator.
//!
//! Each day has three "core goal" slots plus a general bucket. The
//! allocator's tie-break is strict: slot 1 before 2 before 3, first
//! unoccupied wins.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Core-goal slot numbers.
pub const SLOTS: [u8; 3] = [1, 2, 3];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// Attribution day.
    pub date: NaiveDate,
    /// `Some(1..=3)` makes the task a core goal; `None` is the general
    /// bucket. At most one task per slot per day.
    pub slot: Option<u8>,
}

impl Task {
    pub fn new(title: impl Into<String>, date: NaiveDate, slot: Option<u8>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            completed: false,
            date,
            slot,
        }
    }

    pub fn is_core(&self) -> bool {
        self.slot.is_some()
    }
}

/// Pick the slot for a new task given today's existing tasks.
///
/// An explicitly requested slot is honored only if it is in 1..=3 and
/// unoccupied; a taken or invalid request yields `None` (the task lands
/// in the general bucket rather than evicting anything). Without a
/// request, the first unoccupied slot in order 1, 2, 3 is assigned;
/// when all three are taken the task is general.
pub fn assign_slot(existing_today: &[Task], requested: Option<u8>) -> Option<u8> {
    let occupied = |slot: u8| existing_today.iter().any(|t| t.slot == Some(slot));
    match requested {
        Some(slot) => SLOTS.contains(&slot).then_some(slot).filter(|&s| !occupied(s)),
        None => SLOTS.into_iter().find(|&s| !occupied(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 6).unwrap()
    }

    fn slotted(slot: u8) -> Task {
        Task::new(format!("goal {slot}"), day(), Some(slot))
    }

    #[test]
    fn first_unoccupied_wins_in_order() {
        // Slot 2 taken: an unrequested task gets slot 1, not 3.
        assert_eq!(assign_slot(&[slotted(2)], None), Some(1));
        assert_eq!(assign_slot(&[slotted(1)], None), Some(2));
        assert_eq!(assign_slot(&[], None), Some(1));
    }

    #[test]
    fn full_slots_yield_a_general_task() {
        let existing = [slotted(1), slotted(2), slotted(3)];
        assert_eq!(assign_slot(&existing, None), None);
    }

    #[test]
    fn explicit_request_honored_only_when_free() {
        assert_eq!(assign_slot(&[slotted(2)], Some(3)), Some(3));
        assert_eq!(assign_slot(&[slotted(2)], Some(2)), None);
        assert_eq!(assign_slot(&[], Some(4)), None);
    }

    #[test]
    fn general_tasks_do_not_occupy_slots() {
        let general = Task::new("inbox", day(), None);
        assert!(!general.is_core());
        assert_eq!(assign_slot(&[general], None), Some(1));
    }
}
