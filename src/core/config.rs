//! Config file I/O: lenient load over defaults, pretty JSON save
//!
//! A bad entry never rejects the whole file. Each fallback is logged and
//! the corresponding reason recorded on the load result.

use std::path::Path;
use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::{info, warn};
use crate::types::{ConfigReason, ControllerConfig, Gesture};

lazy_static! {
    // f13, space, ctrl+shift+a
    static ref RE_KEY_NAME: Regex = Regex::new(r"^[A-Za-z0-9]+(\+[A-Za-z0-9]+)*$").unwrap();
}

/// Config plus what happened while reading it
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: ControllerConfig,
    /// R101/R102/R103/R105
    pub reason: ConfigReason,
    /// Entry-level fallbacks, e.g. R106 for rejected keys
    pub warnings: Vec<ConfigReason>,
}

impl ConfigLoad {
    fn defaults(reason: ConfigReason) -> Self {
        Self {
            config: ControllerConfig::default(),
            reason,
            warnings: Vec::new(),
        }
    }
}

/// Key names are letters/digits joined by '+'. Empty means unbound.
pub fn is_valid_key(key: &str) -> bool {
    key.is_empty() || RE_KEY_NAME.is_match(key)
}

/// Load config from disk. Only an unreadable existing file is an error.
pub fn load_config(path: impl AsRef<Path>) -> Result<ConfigLoad, ConfigReason> {
    let path = path.as_ref();
    if !path.exists() {
        info!("no config at {}, using defaults", path.display());
        return Ok(ConfigLoad::defaults(ConfigReason::R102_CONFIG_DEFAULTED));
    }

    let text = std::fs::read_to_string(path).map_err(|e| {
        warn!("config {} unreadable: {}", path.display(), e);
        ConfigReason::R104_CONFIG_STORAGE_ERROR
    })?;

    let load = parse_config(&text);
    info!("config {}: {}", path.display(), load.reason);
    Ok(load)
}

/// Merge a JSON document over the defaults
pub fn parse_config(text: &str) -> ConfigLoad {
    let root = match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            warn!("config is not a JSON object, using defaults");
            return ConfigLoad::defaults(ConfigReason::R103_CONFIG_PARSE_ERROR);
        }
    };

    if is_legacy(&root) {
        warn!("legacy key schema, resetting config to defaults");
        return ConfigLoad::defaults(ConfigReason::R105_CONFIG_LEGACY_RESET);
    }

    merge_config(ControllerConfig::default(), &root)
}

/// Merge a config document entry by entry over `base`
pub fn merge_config(base: ControllerConfig, root: &Map<String, Value>) -> ConfigLoad {
    let mut load = ConfigLoad {
        config: base,
        reason: ConfigReason::R101_CONFIG_LOADED,
        warnings: Vec::new(),
    };
    let config = &mut load.config;

    for (gesture, value) in section(root, "keys") {
        match value.as_str() {
            Some(key) if is_valid_key(key.trim()) => {
                config.keys.insert(gesture, key.trim().to_string());
            }
            _ => {
                warn!("{}: invalid key {}, unbound", gesture, value);
                config.keys.insert(gesture, String::new());
                load.warnings.push(ConfigReason::R106_CONFIG_INVALID_KEY);
            }
        }
    }

    for (gesture, value) in section(root, "thresholds") {
        if gesture == Gesture::Neutral {
            continue;
        }
        match as_number(value) {
            Some(t) => {
                let clamped = t.clamp(0.0, 1.0);
                if clamped != t {
                    warn!("{}: sensitivity {} clamped to {}", gesture, t, clamped);
                }
                config.thresholds.insert(gesture, clamped);
            }
            None => warn!("{}: bad sensitivity {}, keeping default", gesture, value),
        }
    }

    for (gesture, value) in section(root, "enabled") {
        if gesture == Gesture::Neutral {
            continue;
        }
        match value.as_bool() {
            Some(on) => {
                config.enabled.insert(gesture, on);
            }
            None => warn!("{}: bad enabled flag {}, keeping default", gesture, value),
        }
    }

    for (gesture, value) in section(root, "min_durations") {
        if gesture == Gesture::Neutral {
            continue;
        }
        let secs = match as_number(value) {
            Some(s) if s >= 0.0 => s,
            _ => {
                warn!("{}: bad duration {}, using 0.0", gesture, value);
                0.0
            }
        };
        config.min_durations.insert(gesture, secs);
    }

    load
}

/// Write config as pretty JSON, creating parent directories
pub fn save_config(config: &ControllerConfig, path: impl AsRef<Path>) -> Result<(), ConfigReason> {
    let path = path.as_ref();
    let json = serde_json::to_string_pretty(config).map_err(|_| ConfigReason::R103_CONFIG_PARSE_ERROR)?;

    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir).map_err(|_| ConfigReason::R104_CONFIG_STORAGE_ERROR)?;
    }
    std::fs::write(path, json).map_err(|_| ConfigReason::R104_CONFIG_STORAGE_ERROR)?;

    info!("config saved to {}", path.display());
    Ok(())
}

/// Known gestures in a section; unknown names are skipped
fn section<'a>(root: &'a Map<String, Value>, name: &str) -> Vec<(Gesture, &'a Value)> {
    match root.get(name) {
        Some(Value::Object(entries)) => entries
            .iter()
            .filter_map(|(k, v)| match k.parse::<Gesture>() {
                Ok(g) => Some((g, v)),
                Err(_) => {
                    warn!("{}: ignoring unknown gesture '{}'", name, k);
                    None
                }
            })
            .collect(),
        Some(other) => {
            warn!("{}: expected an object, got {}", name, other);
            Vec::new()
        }
        None => Vec::new(),
    }
}

/// Non-empty key section naming no gesture we know
fn is_legacy(root: &Map<String, Value>) -> bool {
    match root.get("keys") {
        Some(Value::Object(keys)) => !keys.is_empty() && keys.keys().all(|k| k.parse::<Gesture>().is_err()),
        _ => false,
    }
}

/// Number, or a string holding one
fn as_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_key_validation() {
        assert!(is_valid_key("f13"));
        assert!(is_valid_key("ctrl+shift+a"));
        assert!(is_valid_key(""));
        assert!(!is_valid_key("f13 f14"));
        assert!(!is_valid_key("ctrl+"));
        assert!(!is_valid_key("+a"));
    }

    #[test]
    fn test_empty_object_is_defaults() {
        let load = parse_config("{}");
        assert_eq!(load.reason, ConfigReason::R101_CONFIG_LOADED);
        assert_eq!(load.config, ControllerConfig::default());
        assert!(load.warnings.is_empty());
    }

    #[test]
    fn test_partial_sections_merge_over_defaults() {
        let load = parse_config(r#"{"thresholds": {"SMILE": 0.8}, "enabled": {"WINK": false}}"#);
        assert_eq!(load.config.thresholds[&Gesture::Smile], 0.8);
        assert_eq!(load.config.thresholds[&Gesture::Frown], 0.4);
        assert!(!load.config.is_enabled(Gesture::Wink));
        assert!(load.config.is_enabled(Gesture::Smile));
        assert_eq!(load.config.key_for(Gesture::Neutral), Some("f13"));
    }

    #[test]
    fn test_malformed_entries() {
        let load = parse_config(
            r#"{
                "thresholds": {"SMILE": "0.65", "FROWN": "loud", "TILT": 3.0},
                "enabled": {"RAISE": "yes"},
                "min_durations": {"SMILE": "abc", "WINK": "0.3", "TILT": -1},
                "keys": {"SMILE": "not a key", "FROWN": 15}
            }"#,
        );
        let c = &load.config;
        assert_eq!(c.thresholds[&Gesture::Smile], 0.65);
        assert_eq!(c.thresholds[&Gesture::Frown], 0.4);
        assert_eq!(c.thresholds[&Gesture::Tilt], 1.0);
        assert!(c.is_enabled(Gesture::Raise));
        assert_eq!(c.min_duration(Gesture::Smile), 0.0);
        assert_eq!(c.min_duration(Gesture::Wink), 0.3);
        assert_eq!(c.min_duration(Gesture::Tilt), 0.0);
        assert_eq!(c.key_for(Gesture::Smile), None);
        assert_eq!(c.key_for(Gesture::Frown), None);
        assert_eq!(load.warnings, vec![ConfigReason::R106_CONFIG_INVALID_KEY; 2]);
    }

    #[test]
    fn test_invalid_json_falls_back() {
        let load = parse_config("{ not json");
        assert_eq!(load.reason, ConfigReason::R103_CONFIG_PARSE_ERROR);
        assert_eq!(load.config, ControllerConfig::default());

        assert_eq!(parse_config("[1, 2]").reason, ConfigReason::R103_CONFIG_PARSE_ERROR);
    }

    #[test]
    fn test_legacy_schema_resets() {
        let load = parse_config(r#"{"keys": {"HAPPY": "f14", "SAD": "f15"}, "thresholds": {"SMILE": 0.9}}"#);
        assert_eq!(load.reason, ConfigReason::R105_CONFIG_LEGACY_RESET);
        assert_eq!(load.config.thresholds[&Gesture::Smile], 0.5);
    }

    #[test]
    fn test_merge_over_custom_base() {
        let mut base = ControllerConfig::default();
        base.set_sensitivity(Gesture::Smile, 0.9).set_enabled(Gesture::Tilt, false);

        let doc = serde_json::json!({"thresholds": {"FROWN": 2.5}, "keys": {"WINK": "a b"}});
        let load = merge_config(base, doc.as_object().unwrap());

        assert_eq!(load.config.thresholds[&Gesture::Smile], 0.9);
        assert!(!load.config.is_enabled(Gesture::Tilt));
        assert_eq!(load.config.thresholds[&Gesture::Frown], 1.0);
        assert_eq!(load.config.key_for(Gesture::Wink), None);
        assert_eq!(load.warnings, vec![ConfigReason::R106_CONFIG_INVALID_KEY]);
    }

    #[test]
    fn test_unknown_gestures_ignored() {
        let load = parse_config(r#"{"keys": {"SMILE": "f1", "HAPPY": "f2"}}"#);
        assert_eq!(load.reason, ConfigReason::R101_CONFIG_LOADED);
        assert_eq!(load.config.key_for(Gesture::Smile), Some("f1"));
        assert_eq!(load.config.keys.len(), 8);
    }
}
