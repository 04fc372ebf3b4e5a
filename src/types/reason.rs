//! Reason codes for fallbacks, failures and capability decisions
//!
//! R1xx config, R2xx frames, R3xx capability, R4xx announce.

use serde::{Deserialize, Serialize};

// =============================================================================
// R1xx: Configuration
// =============================================================================

/// Outcome codes for loading and saving the controller config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum ConfigReason {
    /// File read and merged over the defaults
    R101_CONFIG_LOADED,
    /// No file, defaults used
    R102_CONFIG_DEFAULTED,
    /// File is not valid JSON (or could not be encoded)
    R103_CONFIG_PARSE_ERROR,
    /// File could not be read or written
    R104_CONFIG_STORAGE_ERROR,
    /// Old key schema detected, reset to defaults
    R105_CONFIG_LEGACY_RESET,
    /// A key binding failed validation and was unbound
    R106_CONFIG_INVALID_KEY,
}

impl ConfigReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::R101_CONFIG_LOADED => "R101_CONFIG_LOADED",
            Self::R102_CONFIG_DEFAULTED => "R102_CONFIG_DEFAULTED",
            Self::R103_CONFIG_PARSE_ERROR => "R103_CONFIG_PARSE_ERROR",
            Self::R104_CONFIG_STORAGE_ERROR => "R104_CONFIG_STORAGE_ERROR",
            Self::R105_CONFIG_LEGACY_RESET => "R105_CONFIG_LEGACY_RESET",
            Self::R106_CONFIG_INVALID_KEY => "R106_CONFIG_INVALID_KEY",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::R101_CONFIG_LOADED => "Config loaded",
            Self::R102_CONFIG_DEFAULTED => "No config file, using defaults",
            Self::R103_CONFIG_PARSE_ERROR => "Config is not valid JSON",
            Self::R104_CONFIG_STORAGE_ERROR => "Config file could not be read or written",
            Self::R105_CONFIG_LEGACY_RESET => "Legacy config schema, reset to defaults",
            Self::R106_CONFIG_INVALID_KEY => "Invalid key name, binding removed",
        }
    }
}

impl std::fmt::Display for ConfigReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

impl std::error::Error for ConfigReason {}

// =============================================================================
// R2xx: Frames
// =============================================================================

/// Why a frame could not be classified
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum FrameReason {
    /// Snapshot JSON did not decode
    R201_FRAME_DECODE_ERROR,
    /// A required face landmark index is out of range
    R202_LANDMARK_MISSING,
}

impl FrameReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::R201_FRAME_DECODE_ERROR => "R201_FRAME_DECODE_ERROR",
            Self::R202_LANDMARK_MISSING => "R202_LANDMARK_MISSING",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::R201_FRAME_DECODE_ERROR => "Snapshot could not be decoded",
            Self::R202_LANDMARK_MISSING => "Face landmark list too short",
        }
    }
}

impl std::fmt::Display for FrameReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

impl std::error::Error for FrameReason {}

// =============================================================================
// R3xx: Capability
// =============================================================================

/// Why hand tracking is unavailable for this session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum CapabilityReason {
    /// Turned off by the operator
    R301_HAND_SUPPORT_DISABLED,
    /// Hand model file is missing
    R302_HAND_MODEL_NOT_FOUND,
}

impl CapabilityReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::R301_HAND_SUPPORT_DISABLED => "R301_HAND_SUPPORT_DISABLED",
            Self::R302_HAND_MODEL_NOT_FOUND => "R302_HAND_MODEL_NOT_FOUND",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::R301_HAND_SUPPORT_DISABLED => "Hand support disabled",
            Self::R302_HAND_MODEL_NOT_FOUND => "Hand model not found",
        }
    }
}

impl std::fmt::Display for CapabilityReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

// =============================================================================
// R4xx: Announce
// =============================================================================

/// Why an action change produced no key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum AnnounceReason {
    /// No key bound to the action
    R401_KEY_UNBOUND,
    /// The key sink rejected the press
    R402_KEY_SINK_FAILED,
}

impl AnnounceReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::R401_KEY_UNBOUND => "R401_KEY_UNBOUND",
            Self::R402_KEY_SINK_FAILED => "R402_KEY_SINK_FAILED",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::R401_KEY_UNBOUND => "No key bound to action",
            Self::R402_KEY_SINK_FAILED => "Key sink failed",
        }
    }
}

impl std::fmt::Display for AnnounceReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}

impl std::error::Error for AnnounceReason {}
