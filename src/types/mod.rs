//! Core types for Veado

mod gesture;
mod landmarks;
mod signals;
mod config;
mod output;
mod reason;

pub use gesture::Gesture;
pub use landmarks::{Point, Face, Hand, Snapshot};
pub use signals::GestureSignals;
pub use config::{ControllerConfig, Thresholds, default_sensitivity, default_min_duration};
pub use output::{FrameOutput, GestureReading, ActionUpdate};
pub use reason::{ConfigReason, FrameReason, CapabilityReason, AnnounceReason};
