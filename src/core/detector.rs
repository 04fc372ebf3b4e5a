//! Expression detector: snapshot → signals → arbiter → lock
//!
//! Single consumer: all filter and lock state is touched only from
//! `process`, driven once per frame by the caller.

use std::path::Path;
use chrono::Utc;
use tracing::{debug, info};
use crate::core::{ActionLock, FeatureExtractor, GestureArbiter};
use crate::types::{CapabilityReason, ControllerConfig, FrameOutput, FrameReason, Gesture, Snapshot};

/// Whether hand landmarks can drive THINKING this session
#[derive(Debug, Clone, PartialEq)]
pub enum HandSupport {
    Available,
    /// Reason kept for diagnostics
    Unavailable { reason: CapabilityReason, detail: String },
}

impl HandSupport {
    /// Decide once at startup. No model path means the producer is trusted
    /// to send hands when it has them.
    pub fn probe(model_path: Option<&Path>, disabled: bool) -> Self {
        if disabled {
            return HandSupport::Unavailable {
                reason: CapabilityReason::R301_HAND_SUPPORT_DISABLED,
                detail: "disabled by operator".to_string(),
            };
        }
        match model_path {
            Some(path) if !path.is_file() => HandSupport::Unavailable {
                reason: CapabilityReason::R302_HAND_MODEL_NOT_FOUND,
                detail: path.display().to_string(),
            },
            _ => HandSupport::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, HandSupport::Available)
    }
}

impl std::fmt::Display for HandSupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandSupport::Available => write!(f, "available"),
            HandSupport::Unavailable { reason, detail } => write!(f, "unavailable ({}: {})", reason.code(), detail),
        }
    }
}

/// Per-session classification pipeline
#[derive(Debug)]
pub struct ExpressionDetector {
    extractor: FeatureExtractor,
    arbiter: GestureArbiter,
    lock: ActionLock,
    hands: HandSupport,
    frames: u64,
}

impl ExpressionDetector {
    pub fn new(hands: HandSupport) -> Self {
        match &hands {
            HandSupport::Available => info!("hand support available, THINKING enabled"),
            HandSupport::Unavailable { reason, detail } => {
                info!("hand support unavailable ({}: {}), THINKING disabled", reason.code(), detail)
            }
        }
        Self {
            extractor: FeatureExtractor::new(),
            arbiter: GestureArbiter::new(),
            lock: ActionLock::new(),
            hands,
            frames: 0,
        }
    }

    /// Classify one frame at caller time `now` (seconds)
    pub fn process(
        &mut self,
        snapshot: &Snapshot,
        config: &ControllerConfig,
        now: f64,
    ) -> Result<FrameOutput, FrameReason> {
        let signals = self.extractor.extract(snapshot)?;
        self.frames += 1;

        let (physical, readings) = match &signals {
            Some(s) => {
                let out = self.arbiter.evaluate(s, config, self.hands.is_available());
                (out.winner, out.readings)
            }
            None => {
                debug!("frame {}: no face, filters frozen", self.frames);
                (Gesture::Neutral, Vec::new())
            }
        };

        let previous = self.lock.current();
        let action = self.lock.resolve(physical, now, &config.min_durations);
        let changed = action != previous;
        if changed {
            info!("action {} -> {} at {:.3}s", previous, action, now);
        }

        Ok(FrameOutput {
            timestamp: Utc::now(),
            now,
            physical,
            action,
            changed,
            locked_until: self.lock.locked_until(now),
            signals,
            readings,
        })
    }

    pub fn current_action(&self) -> Gesture {
        self.lock.current()
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn hand_support(&self) -> &HandSupport {
        &self.hands
    }

    pub fn arbiter(&self) -> &GestureArbiter {
        &self.arbiter
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::{MOUTH_SMILE_LEFT, MOUTH_SMILE_RIGHT};
    use crate::types::{Face, Point};

    fn smiling(score: f64, t: f64) -> Snapshot {
        Snapshot {
            timestamp: Some(t),
            face: Some(Face {
                landmarks: vec![Point::new(0.5, 0.5); 478],
                blendshapes: [(MOUTH_SMILE_LEFT.to_string(), score), (MOUTH_SMILE_RIGHT.to_string(), score)]
                    .into_iter()
                    .collect(),
            }),
            hands: vec![],
        }
    }

    #[test]
    fn test_probe_disabled() {
        let support = HandSupport::probe(None, true);
        assert!(!support.is_available());
        assert!(matches!(
            support,
            HandSupport::Unavailable { reason: CapabilityReason::R301_HAND_SUPPORT_DISABLED, .. }
        ));
    }

    #[test]
    fn test_probe_missing_model() {
        let support = HandSupport::probe(Some(Path::new("/nonexistent/hand_landmarker.task")), false);
        match support {
            HandSupport::Unavailable { reason, detail } => {
                assert_eq!(reason, CapabilityReason::R302_HAND_MODEL_NOT_FOUND);
                assert!(detail.contains("hand_landmarker.task"));
            }
            HandSupport::Available => panic!("missing model should be unavailable"),
        }
        assert!(HandSupport::probe(None, false).is_available());
    }

    #[test]
    fn test_smile_reported_then_held() {
        let mut detector = ExpressionDetector::new(HandSupport::Available);
        let config = ControllerConfig::default();

        let out = detector.process(&smiling(0.9, 0.0), &config, 0.0).unwrap();
        assert_eq!(out.physical, Gesture::Smile);
        assert_eq!(out.action, Gesture::Smile);
        assert!(out.changed);
        assert_eq!(out.locked_until, Some(0.5));

        // face gone: physical drops at once, action is held
        let out = detector.process(&Snapshot::empty(), &config, 0.2).unwrap();
        assert_eq!(out.physical, Gesture::Neutral);
        assert_eq!(out.action, Gesture::Smile);
        assert!(!out.changed);
        assert!(out.signals.is_none());

        let out = detector.process(&Snapshot::empty(), &config, 0.6).unwrap();
        assert_eq!(out.action, Gesture::Neutral);
        assert!(out.changed);
        assert_eq!(detector.frames_processed(), 3);
    }

    #[test]
    fn test_no_face_freezes_filters() {
        let mut detector = ExpressionDetector::new(HandSupport::Available);
        let config = ControllerConfig::default();
        detector.process(&smiling(0.9, 0.0), &config, 0.0).unwrap();
        for i in 0..10 {
            detector.process(&Snapshot::empty(), &config, 1.0 + i as f64).unwrap();
        }
        let smile = detector.arbiter().filter(Gesture::Smile).unwrap();
        assert_eq!(smile.len(), 1);
        assert!(smile.is_latched());
    }

    #[test]
    fn test_bad_snapshot_mutates_nothing() {
        let mut detector = ExpressionDetector::new(HandSupport::Available);
        let mut snap = smiling(0.9, 0.0);
        if let Some(face) = snap.face.as_mut() {
            face.landmarks.truncate(10);
        }
        let err = detector.process(&snap, &ControllerConfig::default(), 0.0).unwrap_err();
        assert_eq!(err, FrameReason::R202_LANDMARK_MISSING);
        assert_eq!(detector.frames_processed(), 0);
        assert_eq!(detector.current_action(), Gesture::Neutral);
    }
}
