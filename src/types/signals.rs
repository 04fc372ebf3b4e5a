//! Raw per-frame gesture signals

use serde::{Deserialize, Serialize};
use crate::types::Gesture;
use crate::FROWN_RAISE_CUTOFF;

/// Seven raw signals derived from one snapshot. Not clamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GestureSignals {
    /// max(browDownLeft, browDownRight)
    pub brow_down: f64,
    /// browInnerUp
    pub brow_up: f64,
    /// mean of both mouth-smile scores
    pub smile: f64,
    /// eye-corner height difference, scaled
    pub tilt: f64,
    /// fingertip proximity to the chin
    pub thinking: f64,
    /// brow_down + smile combo, zero unless both are clear
    pub malicious: f64,
    /// |eyeBlinkLeft - eyeBlinkRight|
    pub wink: f64,
}

impl GestureSignals {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Frown input: cancelled while the inner brows are raised
    pub fn frown(&self) -> f64 {
        if self.brow_up > FROWN_RAISE_CUTOFF {
            0.0
        } else {
            self.brow_down
        }
    }

    /// Signal fed to the given gesture's filter
    pub fn for_gesture(&self, gesture: Gesture) -> f64 {
        match gesture {
            Gesture::Neutral => 0.0,
            Gesture::Thinking => self.thinking,
            Gesture::Malicious => self.malicious,
            Gesture::Wink => self.wink,
            Gesture::Tilt => self.tilt,
            Gesture::Frown => self.frown(),
            Gesture::Raise => self.brow_up,
            Gesture::Smile => self.smile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frown_cancelled_by_raise() {
        let s = GestureSignals { brow_down: 0.9, brow_up: 0.5, ..GestureSignals::zero() };
        assert_eq!(s.frown(), 0.0);
        assert_eq!(s.for_gesture(Gesture::Frown), 0.0);
        assert_eq!(s.for_gesture(Gesture::Raise), 0.5);
    }

    #[test]
    fn test_frown_kept_at_cutoff() {
        let s = GestureSignals { brow_down: 0.9, brow_up: 0.4, ..GestureSignals::zero() };
        assert_eq!(s.frown(), 0.9);
    }
}
