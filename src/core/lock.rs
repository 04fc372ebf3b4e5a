//! Action lock: minimum hold duration for announced actions
//!
//! - NEUTRAL → X: immediate, starts a hold of min_durations[X]
//! - X → anything: deferred until the hold expires
//! - X → NEUTRAL after expiry: immediate, no hold

use std::collections::BTreeMap;
use crate::types::Gesture;

/// Holds the externally visible action
#[derive(Debug, Clone)]
pub struct ActionLock {
    current: Gesture,
    /// Seconds on the caller's clock
    unlock_time: f64,
}

impl Default for ActionLock {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLock {
    pub fn new() -> Self {
        Self {
            current: Gesture::Neutral,
            unlock_time: 0.0,
        }
    }

    /// Gate this frame's physical gesture, returning the stable action
    pub fn resolve(
        &mut self,
        physical: Gesture,
        now: f64,
        min_durations: &BTreeMap<Gesture, f64>,
    ) -> Gesture {
        if self.is_locked(now) {
            return self.current;
        }

        if physical != self.current {
            if physical != Gesture::Neutral {
                let hold = min_durations.get(&physical).copied().unwrap_or(0.0);
                self.unlock_time = now + hold;
            }
            self.current = physical;
        }

        self.current
    }

    /// A non-neutral action is being held at `now`
    pub fn is_locked(&self, now: f64) -> bool {
        self.current != Gesture::Neutral && now < self.unlock_time
    }

    pub fn current(&self) -> Gesture {
        self.current
    }

    pub fn unlock_time(&self) -> f64 {
        self.unlock_time
    }

    /// Expiry while the current action is held
    pub fn locked_until(&self, now: f64) -> Option<f64> {
        if self.is_locked(now) {
            Some(self.unlock_time)
        } else {
            None
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn durations(entries: &[(Gesture, f64)]) -> BTreeMap<Gesture, f64> {
        entries.iter().copied().collect()
    }

    #[test]
    fn test_initial_state_is_neutral() {
        let lock = ActionLock::new();
        assert_eq!(lock.current(), Gesture::Neutral);
        assert_eq!(lock.unlock_time(), 0.0);
        assert!(!lock.is_locked(0.0));
    }

    #[test]
    fn test_holds_minimum_duration() {
        let mut lock = ActionLock::new();
        let d = durations(&[(Gesture::Smile, 1.0)]);

        assert_eq!(lock.resolve(Gesture::Smile, 0.0, &d), Gesture::Smile);
        assert_eq!(lock.unlock_time(), 1.0);
        assert_eq!(lock.resolve(Gesture::Neutral, 0.5, &d), Gesture::Smile);
        assert_eq!(lock.resolve(Gesture::Neutral, 1.0, &d), Gesture::Neutral);
    }

    #[test]
    fn test_locked_switch_between_actions_suppressed() {
        let mut lock = ActionLock::new();
        let d = durations(&[(Gesture::Smile, 1.0), (Gesture::Frown, 0.5)]);

        lock.resolve(Gesture::Smile, 0.0, &d);
        assert_eq!(lock.resolve(Gesture::Frown, 0.9, &d), Gesture::Smile);
        assert_eq!(lock.resolve(Gesture::Frown, 1.2, &d), Gesture::Frown);
        assert_eq!(lock.unlock_time(), 1.7);
    }

    #[test]
    fn test_missing_duration_means_no_hold() {
        let mut lock = ActionLock::new();
        let d = BTreeMap::new();
        assert_eq!(lock.resolve(Gesture::Wink, 2.0, &d), Gesture::Wink);
        assert!(!lock.is_locked(2.0));
        assert_eq!(lock.resolve(Gesture::Neutral, 2.0, &d), Gesture::Neutral);
    }

    #[test]
    fn test_same_gesture_does_not_extend_hold() {
        let mut lock = ActionLock::new();
        let d = durations(&[(Gesture::Tilt, 0.5)]);
        lock.resolve(Gesture::Tilt, 0.0, &d);
        lock.resolve(Gesture::Tilt, 0.6, &d);
        assert_eq!(lock.unlock_time(), 0.5);
        assert_eq!(lock.resolve(Gesture::Neutral, 0.7, &d), Gesture::Neutral);
    }

    #[test]
    fn test_locked_until_reports_expiry() {
        let mut lock = ActionLock::new();
        let d = durations(&[(Gesture::Malicious, 1.0)]);
        lock.resolve(Gesture::Malicious, 10.0, &d);
        assert_eq!(lock.locked_until(10.5), Some(11.0));
        assert_eq!(lock.locked_until(11.0), None);
    }
}
