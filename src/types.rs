//! Per-frame tracking samples and their wire shape.
//!
//! Every type here is produced once per frame (or synthesized by the
//! watchdog) and never mutated afterwards. Field names serialize in
//! camelCase to match the `data{sample}` message consumed by the control
//! surface.

use serde::{Deserialize, Serialize};

/// Wall-clock timestamp in milliseconds since the Unix epoch
pub type TimestampMs = i64;

/// Current wall-clock time in milliseconds
#[must_use]
pub fn now_ms() -> TimestampMs {
    chrono::Utc::now().timestamp_millis()
}

/// Blink classification for one frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlinkSample {
    pub timestamp: TimestampMs,
    /// Eyes are below the EAR threshold in this frame
    pub blink_detected: bool,
    /// Mean EAR of both eyes, never negative
    pub eye_aspect_ratio: f64,
    /// Blinks counted since session start
    pub blink_count: u32,
    /// Windowed blinks-per-minute estimate
    pub average_blink_rate: u32,
}

/// Head rotation in degrees, each angle clamped to [-90, 90]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadPoseSample {
    pub timestamp: TimestampMs,
    /// Negative is turned left, positive turned right
    pub yaw: f64,
    /// Negative is up, positive down
    pub pitch: f64,
    pub roll: f64,
}

impl HeadPoseSample {
    /// Neutral pose used when no face is visible
    #[must_use]
    pub fn neutral(timestamp: TimestampMs) -> Self {
        Self {
            timestamp,
            yaw: 0.0,
            pitch: 0.0,
            roll: 0.0,
        }
    }
}

/// Why a frame was classified as distracted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistractionReason {
    /// No face in the frame
    FaceNotDetected,
    /// Gaze above or below the screen
    LookingAway,
    /// Head turned sideways
    HeadTurned,
}

impl DistractionReason {
    /// Wire name of the reason
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FaceNotDetected => "face_not_detected",
            Self::LookingAway => "looking_away",
            Self::HeadTurned => "head_turned",
        }
    }
}

impl std::fmt::Display for DistractionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Engagement classification for one frame.
///
/// `distracted` implies `level == 0`; construct distracted samples through
/// [`EngagementSample::distracted`] to keep that true.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSample {
    pub timestamp: TimestampMs,
    /// Score in {0, 20, 40, 60, 80, 100}
    pub level: u8,
    pub face_centered: bool,
    pub looking_at_screen: bool,
    pub distracted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distraction_reason: Option<DistractionReason>,
}

impl EngagementSample {
    /// A distracted sample with zero engagement
    #[must_use]
    pub fn distracted(
        timestamp: TimestampMs,
        reason: DistractionReason,
        face_centered: bool,
        looking_at_screen: bool,
    ) -> Self {
        Self {
            timestamp,
            level: 0,
            face_centered,
            looking_at_screen,
            distracted: true,
            distraction_reason: Some(reason),
        }
    }
}

/// Normalized 2D point for the overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

/// Mouth box for the overlay
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouthBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Key face points in normalized [0, 1] frame coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceLandmarksData {
    pub left_eye: Point2,
    pub right_eye: Point2,
    pub mouth: MouthBox,
}

/// Combined per-frame classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSample {
    pub timestamp: TimestampMs,
    pub face_detected: bool,
    pub blink: BlinkSample,
    pub head_pose: HeadPoseSample,
    pub engagement: EngagementSample,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub face_landmarks: Option<FaceLandmarksData>,
}

impl TrackingSample {
    /// Reason this sample counts as distracted, if it does
    #[must_use]
    pub fn distraction(&self) -> Option<DistractionReason> {
        if self.engagement.distracted {
            self.engagement.distraction_reason
        } else {
            None
        }
    }
}
