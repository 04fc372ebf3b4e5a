//! Gesture labels

use serde::{Deserialize, Serialize};
use crate::{
    MARGIN_DEFAULT, MARGIN_TILT,
    WINDOW_THINKING, WINDOW_MALICIOUS, WINDOW_WINK, WINDOW_TILT,
    WINDOW_FROWN, WINDOW_RAISE, WINDOW_SMILE,
};

/// The fixed gesture set. `Neutral` is the "nothing active" sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gesture {
    Neutral,
    /// Fingertip or thumb near the chin
    Thinking,
    /// Frown and smile at the same time
    Malicious,
    Wink,
    Tilt,
    Frown,
    Raise,
    Smile,
}

impl Gesture {
    /// Physical gestures in priority order (highest first)
    pub const PRIORITY: [Gesture; 7] = [
        Gesture::Thinking,
        Gesture::Malicious,
        Gesture::Wink,
        Gesture::Tilt,
        Gesture::Frown,
        Gesture::Raise,
        Gesture::Smile,
    ];

    /// Every label, NEUTRAL first
    pub const ALL: [Gesture; 8] = [
        Gesture::Neutral,
        Gesture::Thinking,
        Gesture::Malicious,
        Gesture::Wink,
        Gesture::Tilt,
        Gesture::Frown,
        Gesture::Raise,
        Gesture::Smile,
    ];

    /// Slot in `PRIORITY`, None for NEUTRAL
    pub fn slot(&self) -> Option<usize> {
        Self::PRIORITY.iter().position(|g| g == self)
    }

    /// Rolling window length of this gesture's filter
    pub fn window_size(&self) -> usize {
        match self {
            Gesture::Neutral => 1,
            Gesture::Thinking => WINDOW_THINKING,
            Gesture::Malicious => WINDOW_MALICIOUS,
            Gesture::Wink => WINDOW_WINK,
            Gesture::Tilt => WINDOW_TILT,
            Gesture::Frown => WINDOW_FROWN,
            Gesture::Raise => WINDOW_RAISE,
            Gesture::Smile => WINDOW_SMILE,
        }
    }

    /// Gap between the on and off thresholds
    pub fn margin(&self) -> f64 {
        match self {
            Gesture::Tilt => MARGIN_TILT,
            _ => MARGIN_DEFAULT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Gesture::Neutral => "NEUTRAL",
            Gesture::Thinking => "THINKING",
            Gesture::Malicious => "MALICIOUS",
            Gesture::Wink => "WINK",
            Gesture::Tilt => "TILT",
            Gesture::Frown => "FROWN",
            Gesture::Raise => "RAISE",
            Gesture::Smile => "SMILE",
        }
    }

    /// Status colour as RGB
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Gesture::Neutral => (0x00, 0xFF, 0x00),
            Gesture::Malicious => (0xA0, 0x20, 0xF0),
            Gesture::Frown => (0xFF, 0x00, 0x00),
            Gesture::Raise => (0xFF, 0xFF, 0x00),
            Gesture::Smile => (0x00, 0xFF, 0xFF),
            Gesture::Tilt => (0xFF, 0x14, 0x93),
            Gesture::Wink => (0xFF, 0xA5, 0x00),
            Gesture::Thinking => (0x1E, 0x90, 0xFF),
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Gesture::Neutral => "😐",
            Gesture::Thinking => "🤔",
            Gesture::Malicious => "😈",
            Gesture::Wink => "😉",
            Gesture::Tilt => "🙃",
            Gesture::Frown => "😠",
            Gesture::Raise => "🤨",
            Gesture::Smile => "😄",
        }
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for Gesture {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Gesture::ALL
            .iter()
            .copied()
            .find(|g| g.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown gesture '{}'", s))
    }
}
