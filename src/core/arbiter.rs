//! Gesture arbiter: one hysteresis filter per gesture, fixed priority,
//! cross-gesture silencing.
//!
//! Rules are scanned in priority order. A rule is skipped (its filter is not
//! updated, so window and latch freeze) when the gesture is disabled, has no
//! threshold entry, needs hands that this session lacks, or when any gesture
//! in its `silenced_by` list already came out true this frame.

use tracing::debug;
use crate::core::HysteresisFilter;
use crate::types::{ControllerConfig, Gesture, GestureReading, GestureSignals};

/// One row of the priority table
#[derive(Debug, Clone, Copy)]
pub struct ArbiterRule {
    pub gesture: Gesture,
    /// Skipped when any of these is true this frame
    pub silenced_by: &'static [Gesture],
    /// Only evaluated when hand landmarks are supported
    pub needs_hands: bool,
}

/// Priority table, highest first. THINKING can still override MALICIOUS.
pub const RULES: [ArbiterRule; 7] = [
    ArbiterRule { gesture: Gesture::Thinking, silenced_by: &[], needs_hands: true },
    ArbiterRule { gesture: Gesture::Malicious, silenced_by: &[], needs_hands: false },
    ArbiterRule { gesture: Gesture::Wink, silenced_by: &[Gesture::Malicious], needs_hands: false },
    ArbiterRule {
        gesture: Gesture::Tilt,
        silenced_by: &[Gesture::Malicious, Gesture::Wink],
        needs_hands: false,
    },
    ArbiterRule {
        gesture: Gesture::Frown,
        silenced_by: &[Gesture::Malicious, Gesture::Wink],
        needs_hands: false,
    },
    ArbiterRule { gesture: Gesture::Raise, silenced_by: &[Gesture::Tilt], needs_hands: false },
    ArbiterRule {
        gesture: Gesture::Smile,
        silenced_by: &[Gesture::Malicious, Gesture::Wink, Gesture::Tilt],
        needs_hands: false,
    },
];

/// Result of one arbitration pass
#[derive(Debug, Clone, PartialEq)]
pub struct Arbitration {
    /// First true gesture in priority order, NEUTRAL if none
    pub winner: Gesture,
    /// Per-gesture readings in priority order
    pub readings: Vec<GestureReading>,
}

/// Owns exactly one filter per physical gesture
#[derive(Debug, Clone)]
pub struct GestureArbiter {
    /// Indexed by `Gesture::slot()`
    filters: [HysteresisFilter; 7],
}

impl Default for GestureArbiter {
    fn default() -> Self {
        Self::new()
    }
}

impl GestureArbiter {
    pub fn new() -> Self {
        Self {
            filters: Gesture::PRIORITY.map(|g| HysteresisFilter::new(g.window_size())),
        }
    }

    /// Classify one frame's signals
    pub fn evaluate(
        &mut self,
        signals: &GestureSignals,
        config: &ControllerConfig,
        hands_supported: bool,
    ) -> Arbitration {
        let mut active = [false; 7];
        let mut readings = Vec::with_capacity(RULES.len());

        for (slot, rule) in RULES.iter().enumerate() {
            let gesture = rule.gesture;
            let filter = &mut self.filters[slot];

            let silenced = rule
                .silenced_by
                .iter()
                .any(|g| g.slot().map(|s| active[s]).unwrap_or(false));
            let thresholds = config.thresholds_for(gesture);

            let runnable = config.is_enabled(gesture)
                && (!rule.needs_hands || hands_supported)
                && !silenced;

            match thresholds.filter(|_| runnable) {
                Some(t) => {
                    let was = filter.is_latched();
                    let (latched, smoothed) = filter.update(signals.for_gesture(gesture), t.high, t.low);
                    if latched != was {
                        debug!("{} latch {} (mean {:.3})", gesture, if latched { "on" } else { "off" }, smoothed);
                    }
                    active[slot] = latched;
                    readings.push(GestureReading { gesture, evaluated: true, latched, smoothed: Some(smoothed) });
                }
                None => {
                    // frozen: report the held latch, but it cannot win this frame
                    readings.push(GestureReading {
                        gesture,
                        evaluated: false,
                        latched: filter.is_latched(),
                        smoothed: None,
                    });
                }
            }
        }

        let winner = RULES
            .iter()
            .enumerate()
            .find(|(slot, _)| active[*slot])
            .map(|(_, rule)| rule.gesture)
            .unwrap_or(Gesture::Neutral);

        Arbitration { winner, readings }
    }

    /// Filter owned by a gesture (None for NEUTRAL)
    pub fn filter(&self, gesture: Gesture) -> Option<&HysteresisFilter> {
        gesture.slot().map(|s| &self.filters[s])
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn strong() -> GestureSignals {
        GestureSignals {
            brow_down: 0.9,
            brow_up: 0.3,
            smile: 0.9,
            tilt: 0.9,
            thinking: 0.9,
            malicious: 0.9,
            wink: 0.9,
        }
    }

    fn low_config() -> ControllerConfig {
        let mut config = ControllerConfig::default();
        for g in Gesture::PRIORITY {
            config.set_sensitivity(g, 0.2);
        }
        config
    }

    #[test]
    fn test_rules_follow_priority_order() {
        let order: Vec<Gesture> = RULES.iter().map(|r| r.gesture).collect();
        assert_eq!(order, Gesture::PRIORITY.to_vec());
    }

    #[test]
    fn test_thinking_wins_with_hands() {
        let mut arbiter = GestureArbiter::new();
        let out = arbiter.evaluate(&strong(), &low_config(), true);
        assert_eq!(out.winner, Gesture::Thinking);
    }

    #[test]
    fn test_malicious_wins_without_hands() {
        let mut arbiter = GestureArbiter::new();
        let out = arbiter.evaluate(&strong(), &low_config(), false);
        assert_eq!(out.winner, Gesture::Malicious);
        // THINKING not evaluated at all
        assert!(arbiter.filter(Gesture::Thinking).unwrap().is_empty());
    }

    #[test]
    fn test_malicious_silences_wink_tilt_frown_smile_not_raise() {
        let mut arbiter = GestureArbiter::new();
        let signals = GestureSignals { brow_up: 0.9, ..strong() };
        let out = arbiter.evaluate(&signals, &low_config(), false);
        assert_eq!(out.winner, Gesture::Malicious);

        for g in [Gesture::Wink, Gesture::Tilt, Gesture::Frown, Gesture::Smile] {
            assert!(arbiter.filter(g).unwrap().is_empty(), "{} should be skipped", g);
        }
        // RAISE is only silenced by TILT, which was skipped
        assert_eq!(arbiter.filter(Gesture::Raise).unwrap().len(), 1);
        assert!(arbiter.filter(Gesture::Raise).unwrap().is_latched());
    }

    #[test]
    fn test_wink_silences_tilt_frown_smile_not_raise() {
        let mut arbiter = GestureArbiter::new();
        let signals = GestureSignals { malicious: 0.0, ..strong() };
        let out = arbiter.evaluate(&signals, &low_config(), false);
        assert_eq!(out.winner, Gesture::Wink);
        assert!(!arbiter.filter(Gesture::Malicious).unwrap().is_latched());

        for g in [Gesture::Tilt, Gesture::Frown, Gesture::Smile] {
            assert!(arbiter.filter(g).unwrap().is_empty(), "{} should be skipped", g);
        }
        assert_eq!(arbiter.filter(Gesture::Raise).unwrap().len(), 1);
        assert!(arbiter.filter(Gesture::Raise).unwrap().is_latched());
    }

    #[test]
    fn test_tilt_silences_raise() {
        let mut arbiter = GestureArbiter::new();
        let signals = GestureSignals { tilt: 0.9, brow_up: 0.9, ..GestureSignals::zero() };
        let out = arbiter.evaluate(&signals, &ControllerConfig::default(), false);
        assert_eq!(out.winner, Gesture::Tilt);
        assert!(arbiter.filter(Gesture::Raise).unwrap().is_empty());

        let raise = out.readings.iter().find(|r| r.gesture == Gesture::Raise).unwrap();
        assert!(!raise.evaluated);
        assert!(!raise.latched);
    }

    #[test]
    fn test_tilt_beats_smile() {
        let mut arbiter = GestureArbiter::new();
        let signals = GestureSignals { tilt: 0.5, smile: 0.9, ..GestureSignals::zero() };
        let out = arbiter.evaluate(&signals, &ControllerConfig::default(), false);
        assert_eq!(out.winner, Gesture::Tilt);
        assert!(arbiter.filter(Gesture::Smile).unwrap().is_empty());
    }

    #[test]
    fn test_disabled_gesture_is_frozen() {
        let mut arbiter = GestureArbiter::new();
        let mut config = ControllerConfig::default();
        let smile = GestureSignals { smile: 0.9, ..GestureSignals::zero() };

        arbiter.evaluate(&smile, &config, false);
        assert!(arbiter.filter(Gesture::Smile).unwrap().is_latched());

        config.set_enabled(Gesture::Smile, false);
        let out = arbiter.evaluate(&GestureSignals::zero(), &config, false);
        assert_eq!(out.winner, Gesture::Neutral);
        let filter = arbiter.filter(Gesture::Smile).unwrap();
        assert_eq!(filter.len(), 1);
        assert!(filter.is_latched());

        let reading = out.readings.iter().find(|r| r.gesture == Gesture::Smile).unwrap();
        assert!(!reading.evaluated);
        assert!(reading.latched);
    }

    #[test]
    fn test_missing_threshold_skips_gesture() {
        let mut arbiter = GestureArbiter::new();
        let mut config = ControllerConfig::default();
        config.thresholds.remove(&Gesture::Smile);
        let out = arbiter.evaluate(&GestureSignals { smile: 0.9, ..GestureSignals::zero() }, &config, false);
        assert_eq!(out.winner, Gesture::Neutral);
        assert!(arbiter.filter(Gesture::Smile).unwrap().is_empty());
    }

    #[test]
    fn test_frown_forced_off_by_brow_raise() {
        let mut arbiter = GestureArbiter::new();
        let signals = GestureSignals { brow_down: 0.9, brow_up: 0.55, ..GestureSignals::zero() };
        let out = arbiter.evaluate(&signals, &ControllerConfig::default(), false);
        assert_eq!(out.winner, Gesture::Raise);
        let frown = out.readings.iter().find(|r| r.gesture == Gesture::Frown).unwrap();
        assert_eq!(frown.smoothed, Some(0.0));
    }

    #[test]
    fn test_nothing_active_is_neutral() {
        let mut arbiter = GestureArbiter::new();
        let out = arbiter.evaluate(&GestureSignals::zero(), &ControllerConfig::default(), true);
        assert_eq!(out.winner, Gesture::Neutral);
        assert_eq!(out.readings.len(), 7);
        assert!(out.readings.iter().all(|r| r.evaluated && !r.latched));
    }
}
