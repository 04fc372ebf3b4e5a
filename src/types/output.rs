//! Output structures for terminal display and the API

use colored::Colorize;
use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::types::{Gesture, GestureSignals};

/// One gesture's filter after the frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureReading {
    pub gesture: Gesture,
    /// Filter was updated this frame (not skipped or silenced)
    pub evaluated: bool,
    /// Latched state after the frame
    pub latched: bool,
    /// Window mean, present only when evaluated
    pub smoothed: Option<f64>,
}

/// Output for each processed frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameOutput {
    pub timestamp: DateTime<Utc>,
    /// Caller clock, seconds
    pub now: f64,
    /// Arbiter winner before the hold lock
    pub physical: Gesture,
    /// Stable action after the hold lock
    pub action: Gesture,
    /// Action differs from the previous frame's
    pub changed: bool,
    /// Lock expiry, present while the action is held
    pub locked_until: Option<f64>,
    /// None when no face was detected
    pub signals: Option<GestureSignals>,
    pub readings: Vec<GestureReading>,
}

impl FrameOutput {
    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let (r, g, b) = self.action.rgb();
        let label = format!("{} {}", self.action.emoji(), self.action).truecolor(r, g, b).bold();
        let mut line = format!("t={:.3}s | action={}", self.now, label);
        if self.physical != self.action {
            line.push_str(&format!(" {}", format!("(physical={})", self.physical).dimmed()));
        }
        if let Some(until) = self.locked_until {
            line.push_str(&format!(" | locked until {:.3}s", until));
        }
        line
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        let locked = self
            .locked_until
            .map(|u| format!("{:.3}", u))
            .unwrap_or_else(|| "-".to_string());
        format!(
            "t={:.3} | physical={} | action={} | changed={} | locked_until={}",
            self.now, self.physical, self.action, self.changed, locked
        )
    }

    /// Per-gesture breakdown for verbose output
    pub fn readings_string(&self) -> String {
        self.readings
            .iter()
            .map(|r| match r.smoothed {
                Some(s) => format!("{}={:.2}{}", r.gesture, s, if r.latched { "*" } else { "" }),
                None => format!("{}=--{}", r.gesture, if r.latched { "*" } else { "" }),
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Live update pushed to subscribers when the action changes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionUpdate {
    pub action: Gesture,
    pub physical: Gesture,
    pub now: f64,
    pub key: Option<String>,
    pub frames_processed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(physical: Gesture, action: Gesture, locked_until: Option<f64>) -> FrameOutput {
        FrameOutput {
            timestamp: Utc::now(),
            now: 0.5,
            physical,
            action,
            changed: false,
            locked_until,
            signals: None,
            readings: vec![
                GestureReading { gesture: Gesture::Smile, evaluated: true, latched: true, smoothed: Some(0.61) },
                GestureReading { gesture: Gesture::Tilt, evaluated: false, latched: false, smoothed: None },
            ],
        }
    }

    #[test]
    fn test_parseable_string() {
        let out = output(Gesture::Neutral, Gesture::Smile, Some(1.0));
        assert_eq!(
            out.to_parseable_string(),
            "t=0.500 | physical=NEUTRAL | action=SMILE | changed=false | locked_until=1.000"
        );
    }

    #[test]
    fn test_readings_string_marks_latched() {
        let out = output(Gesture::Smile, Gesture::Smile, None);
        assert_eq!(out.readings_string(), "SMILE=0.61* TILT=--");
    }

    #[test]
    fn test_terminal_string_mentions_physical_only_when_different() {
        colored::control::set_override(false);
        let same = output(Gesture::Smile, Gesture::Smile, None).to_terminal_string();
        assert!(!same.contains("physical"));
        let held = output(Gesture::Neutral, Gesture::Smile, Some(1.0)).to_terminal_string();
        assert!(held.contains("physical=NEUTRAL"));
        assert!(held.contains("locked until 1.000s"));
    }
}
