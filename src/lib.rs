//! Veado: facial expression controller
//!
//! Per-frame landmark snapshot → FeatureExtractor → GestureArbiter
//! (hysteresis + priority) → ActionLock → stable action label.

pub mod core;
pub mod types;

// =============================================================================
// HYSTERESIS WINDOWS - frames averaged per gesture
// =============================================================================

pub const WINDOW_THINKING: usize = 5;
pub const WINDOW_MALICIOUS: usize = 5;
pub const WINDOW_WINK: usize = 4;
pub const WINDOW_TILT: usize = 6;
pub const WINDOW_FROWN: usize = 6;
pub const WINDOW_RAISE: usize = 4;
pub const WINDOW_SMILE: usize = 6;

// =============================================================================
// THRESHOLD MARGINS - low = sensitivity - margin
// =============================================================================

pub const MARGIN_DEFAULT: f64 = 0.15;
/// Tilt signal is small and fast, so it gets a tighter band
pub const MARGIN_TILT: f64 = 0.10;

// =============================================================================
// DEFAULT SENSITIVITIES (high threshold)
// =============================================================================

pub const SENSITIVITY_THINKING: f64 = 0.6;
pub const SENSITIVITY_MALICIOUS: f64 = 0.7;
pub const SENSITIVITY_WINK: f64 = 0.2;
pub const SENSITIVITY_TILT: f64 = 0.3;
pub const SENSITIVITY_FROWN: f64 = 0.4;
pub const SENSITIVITY_RAISE: f64 = 0.5;
pub const SENSITIVITY_SMILE: f64 = 0.5;

// =============================================================================
// DEFAULT MINIMUM HOLD DURATIONS (seconds)
// =============================================================================

pub const HOLD_DEFAULT_SECS: f64 = 0.5;
pub const HOLD_COMPOSITE_SECS: f64 = 1.0;
pub const HOLD_WINK_SECS: f64 = 0.2;

// =============================================================================
// FEATURE EXTRACTION
// =============================================================================

/// Outer eye corner, left side of the face mesh
pub const LANDMARK_LEFT_EYE: usize = 33;
/// Outer eye corner, right side of the face mesh
pub const LANDMARK_RIGHT_EYE: usize = 263;
pub const LANDMARK_CHIN: usize = 152;

pub const HAND_THUMB_TIP: usize = 4;
pub const HAND_INDEX_TIP: usize = 8;
pub const HAND_LANDMARK_COUNT: usize = 21;

/// Eye-corner height difference gain for the tilt signal
pub const TILT_GAIN: f64 = 5.0;

/// Fingertip-to-chin radius for the thinking pose
pub const THINKING_RADIUS: f64 = 0.20;
pub const THINKING_GAIN: f64 = 5.0;

/// Both brow-down and smile must reach this before "malicious" counts
pub const MALICIOUS_FLOOR: f64 = 0.25;

/// Inner-brow raise above this cancels the frown signal
pub const FROWN_RAISE_CUTOFF: f64 = 0.4;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
