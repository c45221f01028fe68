//! Focus tracking library for webcam-based attention monitoring.
//!
//! This library turns a stream of face-mesh landmarks into focus metrics:
//! - Eye aspect ratio and blink counting with a sliding one-minute rate
//! - A geometric head pose (yaw, pitch, roll) from a handful of landmarks
//! - A rule-based engagement score and distraction reason per frame
//! - Session aggregation into time focused, time distracted and efficiency
//!
//! Capture runs as its own actor behind a readiness-gated command channel:
//! 1. The capture surface announces readiness and brings up a landmark source
//! 2. The control surface queues commands until then, and owns the session
//! 3. Each frame becomes a tracking sample, or a synthesized no-face sample
//!    when the watchdog sees the source go quiet
//! 4. Stopping a session reduces its history to final metrics
//!
//! # Examples
//!
//! ## Processing Frames
//!
//! ```no_run
//! use focus_tracker::{config::TrackingSettings, landmarks::LandmarkFrame, pipeline::FramePipeline};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let points = Vec::new();
//! let mut pipeline = FramePipeline::new(&TrackingSettings::default());
//! let frame = LandmarkFrame::new(points);
//!
//! let sample = pipeline.process(Some(&frame), 1_000)?;
//! println!(
//!     "EAR {:.3}, yaw {:.1}°, engagement {}",
//!     sample.blink.eye_aspect_ratio, sample.head_pose.yaw, sample.engagement.level
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Running a Session
//!
//! ```no_run
//! use focus_tracker::{app::TrackerApp, config::Config, source::ReplaySource};
//! use std::time::Duration;
//!
//! # async fn run() -> focus_tracker::Result<()> {
//! let source = ReplaySource::from_file("recording.jsonl");
//! let mut app = TrackerApp::spawn(source, &Config::default());
//!
//! let session = app.run_session(Duration::from_secs(60), &[]).await?;
//! println!("Efficiency: {:.0}%", session.metrics.efficiency);
//!
//! app.shutdown().await?;
//! # Ok(())
//! # }
//! ```

/// Face-mesh landmark frames and display landmark extraction
pub mod landmarks;

/// Eye aspect ratio, head pose and face centering
pub mod geometry;

/// Edge-triggered blink counting
pub mod blink_detector;

/// Rule-based engagement scoring
pub mod engagement;

/// Per-frame analysis pipeline
pub mod pipeline;

/// Bounded sample history
pub mod history;

/// Session metric reduction
pub mod metrics;

/// Tracking sessions and their lifecycle
pub mod session;

/// In-memory store of finished sessions
pub mod archive;

/// Messages exchanged between the actors
pub mod messages;

/// Readiness-gated command relay
pub mod relay;

/// Landmark source capability and replay adapter
pub mod source;

/// No-data watchdog
pub mod watchdog;

/// Capture surface actor
pub mod capture;

/// Control surface actor
pub mod control;

/// Application wiring
pub mod app;

/// Error types for the library
pub mod error;

/// Configuration management
pub mod config;

/// Constants used throughout the application
pub mod constants;

/// Shared sample types
pub mod types;

pub use error::{Error, Result};
