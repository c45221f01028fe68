//! Blink detection and blink-rate estimation.
//!
//! A blink is counted on the edge from "open" (EAR at or above threshold)
//! to "closed" (EAR below threshold). Consecutive closed frames do not count
//! again. The rate is estimated from blink timestamps kept over a trailing
//! 60-second window.

use crate::{
    constants::{BLINK_WINDOW_MS, INITIAL_PREVIOUS_EAR},
    types::{BlinkSample, TimestampMs},
};
use std::collections::VecDeque;

/// Edge-triggered blink detector, one per session
#[derive(Debug, Clone)]
pub struct BlinkDetector {
    threshold: f64,
    previous_ear: f64,
    blink_count: u32,
    blink_times: VecDeque<TimestampMs>,
}

impl BlinkDetector {
    /// Create a new blink detector
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            previous_ear: INITIAL_PREVIOUS_EAR,
            blink_count: 0,
            blink_times: VecDeque::new(),
        }
    }

    /// Change the EAR threshold without touching counted blinks
    pub fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Current EAR threshold
    #[must_use]
    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Blinks counted so far
    #[must_use]
    pub fn blink_count(&self) -> u32 {
        self.blink_count
    }

    /// Feed one frame's mean EAR
    pub fn update(&mut self, ear: f64, timestamp: TimestampMs) -> BlinkSample {
        let blink_detected = ear < self.threshold;

        if blink_detected && self.previous_ear >= self.threshold {
            self.blink_count += 1;
            self.blink_times.push_back(timestamp);

            // Eviction happens only when a new blink lands, so a quiet
            // stretch keeps the last minute's blinks and reports them as-is.
            while let Some(&oldest) = self.blink_times.front() {
                if timestamp - oldest >= BLINK_WINDOW_MS {
                    self.blink_times.pop_front();
                } else {
                    break;
                }
            }
        }

        self.previous_ear = ear;

        BlinkSample {
            timestamp,
            blink_detected,
            eye_aspect_ratio: ear.max(0.0),
            blink_count: self.blink_count,
            average_blink_rate: self.rate(timestamp),
        }
    }

    /// Blinks-per-minute estimate at `now`.
    ///
    /// Once the kept blinks span a full minute the count itself is the rate;
    /// during warm-up the count is extrapolated to 60 seconds.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    pub fn rate(&self, now: TimestampMs) -> u32 {
        let Some(&oldest) = self.blink_times.front() else {
            return 0;
        };
        let count = self.blink_times.len();
        let span_ms = now - oldest;

        if span_ms >= BLINK_WINDOW_MS {
            u32::try_from(count).unwrap_or(u32::MAX)
        } else if span_ms > 0 {
            let span_secs = span_ms as f64 / 1000.0;
            (count as f64 / span_secs * 60.0).round() as u32
        } else {
            0
        }
    }

    /// Sample reported while no face is visible: count kept, no new evidence
    #[must_use]
    pub fn idle_sample(&self, timestamp: TimestampMs) -> BlinkSample {
        BlinkSample {
            timestamp,
            blink_detected: false,
            eye_aspect_ratio: 0.0,
            blink_count: self.blink_count,
            average_blink_rate: 0,
        }
    }
}
