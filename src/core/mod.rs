//! Core modules for Veado

pub mod hysteresis;
pub mod features;
pub mod arbiter;
pub mod lock;
pub mod detector;
pub mod config;
pub mod announce;
pub mod api;

pub use hysteresis::HysteresisFilter;
pub use features::{FeatureExtractor, malicious_signal};
pub use arbiter::{GestureArbiter, Arbitration, ArbiterRule, RULES};
pub use lock::ActionLock;
pub use detector::{ExpressionDetector, HandSupport};
pub use config::{load_config, merge_config, parse_config, save_config, is_valid_key, ConfigLoad};
pub use announce::{KeyAnnouncer, KeySink, LogSink, RecordingSink};
pub use api::{create_router, run_server};
