//! Configuration management for the focus tracker

use crate::{
    constants::{DEFAULT_HISTORY_CAPACITY, DEFAULT_NO_DATA_TIMEOUT_MS, DEFAULT_WATCHDOG_INTERVAL_MS},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Classification thresholds and frame rates
    pub tracking: TrackingSettings,

    /// Capture surface configuration
    pub capture: CaptureConfig,

    /// Session configuration
    pub session: SessionConfig,
}

/// Tracking thresholds.
///
/// This struct is also the payload of the `start` and `settings-update`
/// commands, so its keys are camelCase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrackingSettings {
    /// EAR below this counts as closed eyes
    pub blink_threshold: f64,

    /// Yaw magnitude (degrees) beyond which the head is turned away
    pub engagement_yaw_threshold: f64,

    /// Upward pitch (degrees) beyond which the user looks above the screen
    pub engagement_pitch_up_threshold: f64,

    /// Downward pitch (degrees) beyond which the user looks below the screen
    pub engagement_pitch_down_threshold: f64,

    /// Capture rate while the control surface is in the background
    pub fps_background: u32,

    /// Capture rate while tracking is in the foreground
    pub fps_active: u32,

    /// Whether the camera may be used at all
    pub camera_enabled: bool,
}

/// Partial settings update; unset fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SettingsPatch {
    pub blink_threshold: Option<f64>,
    pub engagement_yaw_threshold: Option<f64>,
    pub engagement_pitch_up_threshold: Option<f64>,
    pub engagement_pitch_down_threshold: Option<f64>,
    pub fps_background: Option<u32>,
    pub fps_active: Option<u32>,
    pub camera_enabled: Option<bool>,
}

/// Capture surface configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Watchdog tick period in milliseconds
    pub watchdog_interval_ms: u64,

    /// Silence after which the watchdog emits a no-face sample
    pub no_data_timeout_ms: u64,

    /// Maximum number of faces requested from the detector
    pub max_faces: usize,

    /// Request iris-refined landmarks
    pub refine_landmarks: bool,

    /// Detector confidence threshold (0.0-1.0)
    pub min_detection_confidence: f64,

    /// Tracker confidence threshold (0.0-1.0)
    pub min_tracking_confidence: f64,

    /// Capture width in pixels
    pub frame_width: u32,

    /// Capture height in pixels
    pub frame_height: u32,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Samples kept per session before the oldest are dropped
    pub history_capacity: usize,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            blink_threshold: 0.2,
            engagement_yaw_threshold: 30.0,
            engagement_pitch_up_threshold: 20.0,
            engagement_pitch_down_threshold: 25.0,
            fps_background: 15,
            fps_active: 30,
            camera_enabled: true,
        }
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            watchdog_interval_ms: DEFAULT_WATCHDOG_INTERVAL_MS,
            no_data_timeout_ms: DEFAULT_NO_DATA_TIMEOUT_MS,
            max_faces: 1,
            refine_landmarks: true,
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            frame_width: 640,
            frame_height: 480,
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

fn check_angle(name: &str, value: f64) -> Result<()> {
    if value > 0.0 && value <= 90.0 {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be in (0, 90] degrees, got {value}")))
    }
}

fn check_fps(name: &str, value: u32) -> Result<()> {
    if (1..=120).contains(&value) {
        Ok(())
    } else {
        Err(Error::ConfigError(format!("{name} must be between 1 and 120, got {value}")))
    }
}

impl TrackingSettings {
    /// Check thresholds and frame rates against sane ranges
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] naming the first out-of-range field
    pub fn validate(&self) -> Result<()> {
        if !(self.blink_threshold > 0.0 && self.blink_threshold < 1.0) {
            return Err(Error::ConfigError(format!(
                "Blink threshold must be in (0, 1), got {}",
                self.blink_threshold
            )));
        }
        check_angle("Yaw threshold", self.engagement_yaw_threshold)?;
        check_angle("Pitch-up threshold", self.engagement_pitch_up_threshold)?;
        check_angle("Pitch-down threshold", self.engagement_pitch_down_threshold)?;
        check_fps("Background FPS", self.fps_background)?;
        check_fps("Active FPS", self.fps_active)?;
        Ok(())
    }

    /// Apply a partial update, returning the merged settings
    #[must_use]
    pub fn merge(&self, patch: &SettingsPatch) -> Self {
        Self {
            blink_threshold: patch.blink_threshold.unwrap_or(self.blink_threshold),
            engagement_yaw_threshold: patch.engagement_yaw_threshold.unwrap_or(self.engagement_yaw_threshold),
            engagement_pitch_up_threshold: patch
                .engagement_pitch_up_threshold
                .unwrap_or(self.engagement_pitch_up_threshold),
            engagement_pitch_down_threshold: patch
                .engagement_pitch_down_threshold
                .unwrap_or(self.engagement_pitch_down_threshold),
            fps_background: patch.fps_background.unwrap_or(self.fps_background),
            fps_active: patch.fps_active.unwrap_or(self.fps_active),
            camera_enabled: patch.camera_enabled.unwrap_or(self.camera_enabled),
        }
    }
}

impl CaptureConfig {
    /// Watchdog tick period
    #[must_use]
    pub fn watchdog_interval(&self) -> Duration {
        Duration::from_millis(self.watchdog_interval_ms)
    }

    /// Silence tolerated before a no-face sample is synthesized
    #[must_use]
    pub fn no_data_timeout(&self) -> Duration {
        Duration::from_millis(self.no_data_timeout_ms)
    }
}

impl Config {
    /// Load configuration from a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;

        serde_yaml::from_str(&content).map_err(|e| Error::ConfigError(format!("Failed to parse config: {e}")))
    }

    /// Save configuration to a YAML file
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for the first invalid value
    pub fn validate(&self) -> Result<()> {
        self.tracking.validate()?;

        // Validate capture settings
        if self.capture.watchdog_interval_ms == 0 {
            return Err(Error::ConfigError(
                "Watchdog interval must be greater than 0".to_string(),
            ));
        }
        if self.capture.no_data_timeout_ms == 0 {
            return Err(Error::ConfigError(
                "No-data timeout must be greater than 0".to_string(),
            ));
        }
        if self.capture.max_faces == 0 {
            return Err(Error::ConfigError("Max faces must be greater than 0".to_string()));
        }
        if !(0.0..=1.0).contains(&self.capture.min_detection_confidence) {
            return Err(Error::ConfigError(
                "Detection confidence must be between 0.0 and 1.0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.capture.min_tracking_confidence) {
            return Err(Error::ConfigError(
                "Tracking confidence must be between 0.0 and 1.0".to_string(),
            ));
        }

        // Validate session settings
        if self.session.history_capacity == 0 {
            return Err(Error::ConfigError(
                "History capacity must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# Focus Tracker Configuration

# Classification thresholds (also sent to the capture surface)
tracking:
  blinkThreshold: 0.2
  engagementYawThreshold: 30.0
  engagementPitchUpThreshold: 20.0
  engagementPitchDownThreshold: 25.0
  fpsBackground: 15
  fpsActive: 30
  cameraEnabled: true

# Capture surface
capture:
  watchdog_interval_ms: 1000
  no_data_timeout_ms: 2000
  max_faces: 1
  refine_landmarks: true
  min_detection_confidence: 0.5
  min_tracking_confidence: 0.5
  frame_width: 640
  frame_height: 480

# Session history
session:
  history_capacity: 1000
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed: Config = serde_yaml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(parsed, Config::default());
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed: Config = serde_yaml::from_str("tracking:\n  blinkThreshold: 0.25\n").unwrap();
        assert_eq!(parsed.tracking.blink_threshold, 0.25);
        assert_eq!(parsed.tracking.engagement_yaw_threshold, 30.0);
        assert_eq!(parsed.session.history_capacity, 1000);
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let mut settings = TrackingSettings::default();
        settings.blink_threshold = 1.5;
        assert!(settings.validate().is_err());

        let mut settings = TrackingSettings::default();
        settings.engagement_yaw_threshold = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = TrackingSettings::default();
        settings.fps_active = 0;
        assert!(settings.validate().is_err());

        let mut config = Config::default();
        config.session.history_capacity = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.capture.watchdog_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_merge_patch() {
        let base = TrackingSettings::default();
        let patch = SettingsPatch {
            engagement_yaw_threshold: Some(40.0),
            fps_active: Some(24),
            ..SettingsPatch::default()
        };
        let merged = base.merge(&patch);
        assert_eq!(merged.engagement_yaw_threshold, 40.0);
        assert_eq!(merged.fps_active, 24);
        assert_eq!(merged.blink_threshold, base.blink_threshold);
    }

    #[test]
    fn test_durations() {
        let capture = CaptureConfig::default();
        assert_eq!(capture.watchdog_interval(), Duration::from_secs(1));
        assert_eq!(capture.no_data_timeout(), Duration::from_secs(2));
    }
}
