//! Controller configuration, passed explicitly into every frame

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::types::Gesture;
use crate::{
    HOLD_COMPOSITE_SECS, HOLD_DEFAULT_SECS, HOLD_WINK_SECS,
    SENSITIVITY_THINKING, SENSITIVITY_MALICIOUS, SENSITIVITY_WINK, SENSITIVITY_TILT,
    SENSITIVITY_FROWN, SENSITIVITY_RAISE, SENSITIVITY_SMILE,
};

/// Schmitt-trigger band for one gesture
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub high: f64,
    pub low: f64,
}

impl Thresholds {
    /// Band derived from a sensitivity: (t, t - margin)
    pub fn from_sensitivity(gesture: Gesture, sensitivity: f64) -> Self {
        Self {
            high: sensitivity,
            low: sensitivity - gesture.margin(),
        }
    }
}

/// User-tunable parameters keyed by gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Key pressed when the action becomes current (NEUTRAL included)
    #[serde(default)]
    pub keys: BTreeMap<Gesture, String>,
    /// Sensitivity `t` per gesture; high = t, low = t - margin
    #[serde(default)]
    pub thresholds: BTreeMap<Gesture, f64>,
    #[serde(default)]
    pub enabled: BTreeMap<Gesture, bool>,
    /// Minimum hold per action, in seconds
    #[serde(default)]
    pub min_durations: BTreeMap<Gesture, f64>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        let keys = [
            (Gesture::Neutral, "f13"),
            (Gesture::Smile, "f14"),
            (Gesture::Frown, "f15"),
            (Gesture::Raise, "f16"),
            (Gesture::Malicious, "f17"),
            (Gesture::Tilt, "f18"),
            (Gesture::Wink, "f19"),
            (Gesture::Thinking, "f20"),
        ]
        .into_iter()
        .map(|(g, k)| (g, k.to_string()))
        .collect();

        Self {
            keys,
            thresholds: Gesture::PRIORITY
                .into_iter()
                .map(|g| (g, default_sensitivity(g)))
                .collect(),
            enabled: Gesture::PRIORITY.into_iter().map(|g| (g, true)).collect(),
            min_durations: Gesture::PRIORITY
                .into_iter()
                .map(|g| (g, default_min_duration(g)))
                .collect(),
        }
    }
}

impl ControllerConfig {
    /// Config with no entries at all
    pub fn empty() -> Self {
        Self {
            keys: BTreeMap::new(),
            thresholds: BTreeMap::new(),
            enabled: BTreeMap::new(),
            min_durations: BTreeMap::new(),
        }
    }

    /// Threshold band, None when the sensitivity entry is missing
    pub fn thresholds_for(&self, gesture: Gesture) -> Option<Thresholds> {
        self.thresholds
            .get(&gesture)
            .map(|t| Thresholds::from_sensitivity(gesture, *t))
    }

    /// Enabled unless explicitly switched off
    pub fn is_enabled(&self, gesture: Gesture) -> bool {
        self.enabled.get(&gesture).copied().unwrap_or(true)
    }

    /// Minimum hold in seconds, 0.0 when missing
    pub fn min_duration(&self, gesture: Gesture) -> f64 {
        self.min_durations.get(&gesture).copied().unwrap_or(0.0)
    }

    /// Bound key, None when missing or empty
    pub fn key_for(&self, gesture: Gesture) -> Option<&str> {
        self.keys
            .get(&gesture)
            .map(|k| k.as_str())
            .filter(|k| !k.is_empty())
    }

    pub fn set_sensitivity(&mut self, gesture: Gesture, sensitivity: f64) -> &mut Self {
        self.thresholds.insert(gesture, sensitivity);
        self
    }

    pub fn set_enabled(&mut self, gesture: Gesture, enabled: bool) -> &mut Self {
        self.enabled.insert(gesture, enabled);
        self
    }

    pub fn set_min_duration(&mut self, gesture: Gesture, secs: f64) -> &mut Self {
        self.min_durations.insert(gesture, secs);
        self
    }
}

pub fn default_sensitivity(gesture: Gesture) -> f64 {
    match gesture {
        Gesture::Thinking => SENSITIVITY_THINKING,
        Gesture::Malicious => SENSITIVITY_MALICIOUS,
        Gesture::Wink => SENSITIVITY_WINK,
        Gesture::Tilt => SENSITIVITY_TILT,
        Gesture::Frown => SENSITIVITY_FROWN,
        Gesture::Raise => SENSITIVITY_RAISE,
        Gesture::Smile | Gesture::Neutral => SENSITIVITY_SMILE,
    }
}

pub fn default_min_duration(gesture: Gesture) -> f64 {
    match gesture {
        Gesture::Malicious | Gesture::Thinking => HOLD_COMPOSITE_SECS,
        Gesture::Wink => HOLD_WINK_SECS,
        _ => HOLD_DEFAULT_SECS,
    }
}
