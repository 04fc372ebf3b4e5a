//! Feature extractor: snapshot → seven raw gesture signals
//!
//! Pure function of one frame. Signals are not clamped.

use crate::{
    LANDMARK_LEFT_EYE, LANDMARK_RIGHT_EYE, LANDMARK_CHIN,
    HAND_INDEX_TIP, HAND_THUMB_TIP,
    TILT_GAIN, THINKING_RADIUS, THINKING_GAIN, MALICIOUS_FLOOR,
};
use crate::types::{Face, FrameReason, GestureSignals, Hand, Snapshot};

/// Blendshape names emitted by the face model
pub const BROW_DOWN_LEFT: &str = "browDownLeft";
pub const BROW_DOWN_RIGHT: &str = "browDownRight";
pub const BROW_INNER_UP: &str = "browInnerUp";
pub const MOUTH_SMILE_LEFT: &str = "mouthSmileLeft";
pub const MOUTH_SMILE_RIGHT: &str = "mouthSmileRight";
pub const EYE_BLINK_LEFT: &str = "eyeBlinkLeft";
pub const EYE_BLINK_RIGHT: &str = "eyeBlinkRight";

/// Stateless signal extractor
#[derive(Debug, Default)]
pub struct FeatureExtractor;

impl FeatureExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract signals, Ok(None) when no scored face is present
    pub fn extract(&self, snapshot: &Snapshot) -> Result<Option<GestureSignals>, FrameReason> {
        match snapshot.scored_face() {
            Some(face) => self.extract_face(face, &snapshot.hands).map(Some),
            None => Ok(None),
        }
    }

    /// Extract signals from a face and any hands seen with it
    pub fn extract_face(&self, face: &Face, hands: &[Hand]) -> Result<GestureSignals, FrameReason> {
        let left_eye = face.landmark(LANDMARK_LEFT_EYE).ok_or(FrameReason::R202_LANDMARK_MISSING)?;
        let right_eye = face.landmark(LANDMARK_RIGHT_EYE).ok_or(FrameReason::R202_LANDMARK_MISSING)?;

        let brow_down = face.score(BROW_DOWN_LEFT).max(face.score(BROW_DOWN_RIGHT));
        let brow_up = face.score(BROW_INNER_UP);
        let smile = (face.score(MOUTH_SMILE_LEFT) + face.score(MOUTH_SMILE_RIGHT)) / 2.0;
        let tilt = (left_eye.y - right_eye.y).abs() * TILT_GAIN;
        let wink = (face.score(EYE_BLINK_LEFT) - face.score(EYE_BLINK_RIGHT)).abs();

        let thinking = if hands.is_empty() {
            0.0
        } else {
            let chin = face.landmark(LANDMARK_CHIN).ok_or(FrameReason::R202_LANDMARK_MISSING)?;
            hands
                .iter()
                .map(|hand| {
                    let index = hand.landmarks[HAND_INDEX_TIP].distance_2d(chin);
                    let thumb = hand.landmarks[HAND_THUMB_TIP].distance_2d(chin);
                    let min_dist = index.min(thumb);
                    if min_dist < THINKING_RADIUS {
                        (THINKING_RADIUS - min_dist) * THINKING_GAIN
                    } else {
                        0.0
                    }
                })
                .fold(0.0, f64::max)
        };

        Ok(GestureSignals {
            brow_down,
            brow_up,
            smile,
            tilt,
            thinking,
            malicious: malicious_signal(brow_down, smile),
            wink,
        })
    }
}

/// Mean of brow-down and smile, zero unless both reach the floor
pub fn malicious_signal(brow_down: f64, smile: f64) -> f64 {
    if brow_down < MALICIOUS_FLOOR || smile < MALICIOUS_FLOOR {
        0.0
    } else {
        (brow_down + smile) / 2.0
    }
}

// =============================================================================
// TESTS
// =============================================================================
