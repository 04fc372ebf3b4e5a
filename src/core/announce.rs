//! Announce step: map a changed action to its bound key

use tracing::{info, warn};
use crate::types::{AnnounceReason, ControllerConfig, Gesture};

/// Where key presses go. OS-level injection lives behind this.
pub trait KeySink {
    fn press(&mut self, key: &str) -> Result<(), AnnounceReason>;
}

/// Logs presses instead of injecting them
#[derive(Debug, Default)]
pub struct LogSink;

impl KeySink for LogSink {
    fn press(&mut self, key: &str) -> Result<(), AnnounceReason> {
        info!("key press: {}", key);
        Ok(())
    }
}

/// Collects presses in order
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub pressed: Vec<String>,
}

impl KeySink for RecordingSink {
    fn press(&mut self, key: &str) -> Result<(), AnnounceReason> {
        self.pressed.push(key.to_string());
        Ok(())
    }
}

/// Presses the configured key for each announced action
#[derive(Debug, Default)]
pub struct KeyAnnouncer<S: KeySink> {
    sink: S,
    announced: u64,
}

impl<S: KeySink> KeyAnnouncer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink, announced: 0 }
    }

    /// Press the key bound to `action`; returns the key on success
    pub fn announce(&mut self, action: Gesture, config: &ControllerConfig) -> Result<String, AnnounceReason> {
        let key = match config.key_for(action) {
            Some(k) => k.to_string(),
            None => {
                warn!("{}: no key bound, nothing sent", action);
                return Err(AnnounceReason::R401_KEY_UNBOUND);
            }
        };
        self.sink.press(&key).map_err(|e| {
            warn!("{}: key {} failed: {}", action, key, e);
            AnnounceReason::R402_KEY_SINK_FAILED
        })?;
        self.announced += 1;
        info!("Action: {} -> {}", action, key);
        Ok(key)
    }

    pub fn announced(&self) -> u64 {
        self.announced
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
