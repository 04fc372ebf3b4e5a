//! Per-frame landmark snapshot produced by the upstream detector

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::HAND_LANDMARK_COUNT;

/// Normalized landmark position (image space, z optional)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Distance in the image plane
    pub fn distance_2d(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// A detected face: mesh points plus blendshape scores
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Face {
    pub landmarks: Vec<Point>,
    #[serde(default)]
    pub blendshapes: HashMap<String, f64>,
}

impl Face {
    /// Blendshape score, 0.0 when the model did not report it
    pub fn score(&self, name: &str) -> f64 {
        self.blendshapes.get(name).copied().unwrap_or(0.0)
    }

    pub fn landmark(&self, index: usize) -> Option<&Point> {
        self.landmarks.get(index)
    }
}

/// A detected hand, fixed 21-point layout
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub landmarks: [Point; HAND_LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Point; HAND_LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }
}

/// Everything the detector saw in one frame. Read-only to the core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    /// Capture time in seconds; the caller's clock is used when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face: Option<Face>,
    #[serde(default)]
    pub hands: Vec<Hand>,
}

impl Snapshot {
    /// Frame with nothing detected
    pub fn empty() -> Self {
        Self::default()
    }

    /// Face usable for classification (needs blendshapes)
    pub fn scored_face(&self) -> Option<&Face> {
        self.face.as_ref().filter(|f| !f.blendshapes.is_empty())
    }
}
