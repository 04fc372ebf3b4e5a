//! Hysteresis filter: rolling mean + Schmitt trigger
//!
//! - OFF → ON: mean > high
//! - ON → OFF: mean < low
//! - otherwise latched state is kept

use std::collections::VecDeque;

/// Smoothing/threshold unit owned by one gesture
#[derive(Debug, Clone)]
pub struct HysteresisFilter {
    /// Last N raw values, oldest first
    window: VecDeque<f64>,
    capacity: usize,
    latched: bool,
}

impl HysteresisFilter {
    /// Create a filter averaging the last `capacity` values (at least 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity),
            capacity,
            latched: false,
        }
    }

    /// Push a raw value and re-evaluate the latch. Returns (latched, smoothed).
    pub fn update(&mut self, raw: f64, high: f64, low: f64) -> (bool, f64) {
        self.window.push_back(raw);
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }

        // never empty here: we pushed first
        let smoothed = self.window.iter().sum::<f64>() / self.window.len() as f64;

        if !self.latched && smoothed > high {
            self.latched = true;
        } else if self.latched && smoothed < low {
            self.latched = false;
        }

        (self.latched, smoothed)
    }

    pub fn is_latched(&self) -> bool {
        self.latched
    }

    /// Mean of the current window, None before the first update
    pub fn smoothed(&self) -> Option<f64> {
        if self.window.is_empty() {
            None
        } else {
            Some(self.window.iter().sum::<f64>() / self.window.len() as f64)
        }
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

// =============================================================================
// TESTS
// =============================================================================
