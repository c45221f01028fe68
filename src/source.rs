//! Landmark source capability.
//!
//! The capture surface depends only on [`LandmarkSource`]; concrete
//! detectors and cameras sit behind adapters. [`ReplaySource`] is the
//! adapter shipped with the crate: it plays back a recorded landmark stream.

use crate::{config::CaptureConfig, landmarks::LandmarkFrame, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Per-frame result callback: `Some` landmarks for a detected face, `None`
/// when the frame had no face.
pub type ResultCallback = Arc<dyn Fn(Option<LandmarkFrame>) + Send + Sync>;

/// Options handed to the landmark source
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    pub max_faces: usize,
    pub refine_landmarks: bool,
    pub min_detection_confidence: f64,
    pub min_tracking_confidence: f64,
    pub frame_rate: u32,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl SourceOptions {
    /// Build options from capture configuration and a frame rate
    #[must_use]
    pub fn from_config(capture: &CaptureConfig, frame_rate: u32) -> Self {
        Self {
            max_faces: capture.max_faces,
            refine_landmarks: capture.refine_landmarks,
            min_detection_confidence: capture.min_detection_confidence,
            min_tracking_confidence: capture.min_tracking_confidence,
            frame_rate,
            frame_width: capture.frame_width,
            frame_height: capture.frame_height,
        }
    }

    /// Time between frames at the configured rate
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.frame_rate.max(1)
    }
}

/// Narrow interface over a face-landmark detector plus its camera
pub trait LandmarkSource: Send {
    /// Apply detector and camera options
    ///
    /// # Errors
    ///
    /// Returns [`Error::CapabilityUnavailable`] if the detector or camera
    /// cannot be brought up
    fn configure(&mut self, options: &SourceOptions) -> Result<()>;

    /// Register the per-frame callback, replacing any previous one
    fn on_result(&mut self, callback: ResultCallback);

    /// Begin delivering frames
    ///
    /// # Errors
    ///
    /// Returns an error if capture cannot start
    fn start(&mut self) -> Result<()>;

    /// Stop delivering frames; idempotent
    fn stop(&mut self);
}

/// One line of a landmark recording
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// `null` for frames without a face
    #[serde(default)]
    pub landmarks: Option<LandmarkFrame>,
}

/// Parse a JSON-lines landmark recording; blank lines are skipped
///
/// # Errors
///
/// Returns [`Error::Json`] for a malformed line
pub fn parse_recording(content: &str) -> Result<Vec<Option<LandmarkFrame>>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str::<RecordedFrame>(line)?.landmarks))
        .collect()
}

/// Plays back recorded landmark frames at the configured frame rate
pub struct ReplaySource {
    path: Option<PathBuf>,
    frames: Option<Arc<Vec<Option<LandmarkFrame>>>>,
    frame_interval: Duration,
    looped: bool,
    callback: Option<ResultCallback>,
    task: Option<JoinHandle<()>>,
}

impl ReplaySource {
    /// Replay a JSON-lines recording from disk; the file is read on `configure`
    #[must_use]
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            frames: None,
            frame_interval: Duration::from_millis(33),
            looped: false,
            callback: None,
            task: None,
        }
    }

    /// Replay frames already in memory
    #[must_use]
    pub fn from_frames(frames: Vec<Option<LandmarkFrame>>) -> Self {
        Self {
            path: None,
            frames: Some(Arc::new(frames)),
            frame_interval: Duration::from_millis(33),
            looped: false,
            callback: None,
            task: None,
        }
    }

    /// Restart from the first frame after the last one
    #[must_use]
    pub fn looped(mut self, looped: bool) -> Self {
        self.looped = looped;
        self
    }

    /// Whether playback is in progress
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn load(&mut self) -> Result<()> {
        if self.frames.is_some() {
            return Ok(());
        }
        let Some(path) = &self.path else {
            return Err(Error::CapabilityUnavailable("no recording configured".to_string()));
        };
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::CapabilityUnavailable(format!("cannot open recording {}: {e}", path.display()))
        })?;
        let frames = parse_recording(&content)?;
        log::info!("Loaded {} recorded frames from {}", frames.len(), path.display());
        self.frames = Some(Arc::new(frames));
        Ok(())
    }
}

impl LandmarkSource for ReplaySource {
    fn configure(&mut self, options: &SourceOptions) -> Result<()> {
        self.load()?;
        self.frame_interval = options.frame_interval();
        log::debug!("Replay source configured at {} fps", options.frame_rate);
        Ok(())
    }

    fn on_result(&mut self, callback: ResultCallback) {
        self.callback = Some(callback);
    }

    fn start(&mut self) -> Result<()> {
        let frames = self
            .frames
            .clone()
            .ok_or_else(|| Error::CapabilityUnavailable("replay source not configured".to_string()))?;
        let callback = self
            .callback
            .clone()
            .ok_or_else(|| Error::InvalidInput("no result callback registered".to_string()))?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| Error::CapabilityUnavailable(format!("no async runtime: {e}")))?;

        self.stop();

        let period = self.frame_interval;
        let looped = self.looped;
        self.task = Some(runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                for frame in frames.iter() {
                    ticker.tick().await;
                    callback(frame.clone());
                }
                if !looped || frames.is_empty() {
                    break;
                }
            }
            log::info!("Replay finished");
        }));
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ReplaySource {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recording() {
        let content = "{\"landmarks\": [[0.1, 0.2, 0.0]]}\n\n{\"landmarks\": null}\n{}\n";
        let frames = parse_recording(content).unwrap();
        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].as_ref().map(LandmarkFrame::len), Some(1));
        assert!(frames[1].is_none());
        assert!(frames[2].is_none());
    }

    #[test]
    fn test_parse_recording_rejects_garbage() {
        assert!(matches!(parse_recording("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_missing_file_is_capability_error() {
        let mut source = ReplaySource::from_file("/nonexistent/recording.jsonl");
        let options = SourceOptions::from_config(&CaptureConfig::default(), 30);
        assert!(matches!(
            source.configure(&options),
            Err(Error::CapabilityUnavailable(_))
        ));
    }

    #[test]
    fn test_start_requires_runtime() {
        let mut source = ReplaySource::from_frames(vec![None]);
        source.on_result(Arc::new(|_| {}));
        assert!(matches!(source.start(), Err(Error::CapabilityUnavailable(_))));
    }

    #[test]
    fn test_frame_interval() {
        let options = SourceOptions::from_config(&CaptureConfig::default(), 20);
        assert_eq!(options.frame_interval(), Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_replay_delivers_frames_in_order() {
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let mut source = ReplaySource::from_frames(vec![None, Some(LandmarkFrame::new(Vec::new())), None]);
        source.on_result(Arc::new(move |frame| {
            let _ = tx.send(frame.map(|f| f.len()));
        }));
        source
            .configure(&SourceOptions::from_config(&CaptureConfig::default(), 100))
            .unwrap();
        source.start().unwrap();

        let mut received = Vec::new();
        for _ in 0..3 {
            received.push(rx.recv().await.unwrap());
        }
        assert_eq!(received, vec![None, Some(0), None]);
        source.stop();
        assert!(!source.is_running());
    }
}
