use tracing::debug;

use crate::model::ConflictResult;

use super::conflict;
use super::Engine;

impl Engine {
    /// Participant count against session capacity and, if known, room
    /// capacity. The two limits are checked independently, and the
    /// near-capacity warning fires whether or not an error did.
    ///
    /// A session with `max_capacity == 0` never gets the warning, not even
    /// for zero participants where `0 >= 90% × 0` holds. An empty zero-seat
    /// session is clear and any participant is already a capacity error.
    pub fn check_capacity(
        &self,
        participant_count: u32,
        max_capacity: u32,
        room_capacity: Option<u32>,
    ) -> ConflictResult {
        let mut result = ConflictResult::clear();

        if participant_count > max_capacity {
            result.push(conflict::session_capacity_exceeded(participant_count, max_capacity));
        }
        if let Some(room_capacity) = room_capacity
            && participant_count > room_capacity
        {
            result.push(conflict::room_capacity_exceeded(participant_count, room_capacity));
        }
        if self.is_nearly_full(participant_count, max_capacity) {
            result.push(conflict::nearly_full(participant_count, max_capacity));
        }

        if !result.conflicts.is_empty() {
            debug!(
                participant_count,
                max_capacity,
                ?room_capacity,
                blocking = result.has_conflict,
                "capacity check raised conflicts"
            );
        }
        result
    }

    // Integer form of `count >= percent% × max`, exact at the boundary.
    fn is_nearly_full(&self, participant_count: u32, max_capacity: u32) -> bool {
        max_capacity > 0
            && u64::from(participant_count) * 100
                >= u64::from(max_capacity) * u64::from(self.config.near_capacity_percent)
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{Engine, EngineConfig};
    use crate::model::{ConflictKind, Severity};

    #[test]
    fn at_max_no_error() {
        let r = Engine::default().check_capacity(8, 8, None);
        assert!(!r.has_conflict);
        assert_eq!(r.errors().count(), 0);
    }

    #[test]
    fn one_over_max_is_error() {
        let r = Engine::default().check_capacity(9, 8, None);
        assert!(r.has_conflict);
        assert_eq!(r.errors().count(), 1);
        let msg = &r.errors().next().unwrap().message;
        assert!(msg.contains('9') && msg.contains('8'), "{msg}");
    }

    #[test]
    fn exact_ninety_percent_warns_without_error() {
        let r = Engine::default().check_capacity(9, 10, None);
        assert!(!r.has_conflict);
        assert_eq!(r.warnings().count(), 1);
        assert_eq!(r.conflicts[0].kind, ConflictKind::Capacity);
        assert_eq!(r.conflicts[0].severity, Severity::Warning);
    }

    #[test]
    fn just_below_threshold_is_clear() {
        let r = Engine::default().check_capacity(8, 10, None);
        assert!(r.conflicts.is_empty());
    }

    #[test]
    fn room_and_session_errors_are_independent() {
        let r = Engine::default().check_capacity(12, 10, Some(6));
        assert_eq!(r.errors().count(), 2);
        // over capacity still counts as "nearly full"
        assert_eq!(r.warnings().count(), 1);
        assert_eq!(r.conflicts.len(), 3);
    }

    #[test]
    fn room_capacity_alone() {
        let r = Engine::default().check_capacity(5, 10, Some(4));
        assert!(r.has_conflict);
        assert_eq!(r.errors().count(), 1);
        assert!(r.conflicts[0].message.contains("room capacity of 4"));
    }

    #[test]
    fn zero_max_capacity_never_warns() {
        let e = Engine::default();
        assert!(e.check_capacity(0, 0, None).conflicts.is_empty());
        assert!(e.check_capacity(0, 0, Some(0)).conflicts.is_empty());

        let over = e.check_capacity(1, 0, None);
        assert!(over.has_conflict);
        assert_eq!(over.errors().count(), 1);
        assert_eq!(over.warnings().count(), 0);
    }

    #[test]
    fn threshold_is_configurable() {
        let e = Engine::new(EngineConfig::default().with_near_capacity_percent(50));
        assert_eq!(e.check_capacity(5, 10, None).warnings().count(), 1);
        assert_eq!(e.check_capacity(4, 10, None).warnings().count(), 0);
    }
}
