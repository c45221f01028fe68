//! Rule-based engagement classification.

use crate::{
    config::TrackingSettings,
    constants::{
        ENGAGEMENT_BLINK_POINTS, ENGAGEMENT_CENTERED_POINTS, ENGAGEMENT_LOOKING_POINTS, NORMAL_BLINK_RATE_MAX,
        NORMAL_BLINK_RATE_MIN,
    },
    types::{BlinkSample, DistractionReason, EngagementSample, HeadPoseSample, TimestampMs},
};

/// Angular thresholds the classifier compares against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngagementThresholds {
    /// |yaw| above this is "head turned"
    pub yaw: f64,
    /// pitch below `-pitch_up` is "looking up"
    pub pitch_up: f64,
    /// pitch above `pitch_down` is "looking down"
    pub pitch_down: f64,
}

impl From<&TrackingSettings> for EngagementThresholds {
    fn from(settings: &TrackingSettings) -> Self {
        Self {
            yaw: settings.engagement_yaw_threshold,
            pitch_up: settings.engagement_pitch_up_threshold,
            pitch_down: settings.engagement_pitch_down_threshold,
        }
    }
}

/// Stateless engagement classifier
#[derive(Debug, Clone, Copy)]
pub struct EngagementClassifier {
    thresholds: EngagementThresholds,
}

impl EngagementClassifier {
    #[must_use]
    pub fn new(thresholds: EngagementThresholds) -> Self {
        Self { thresholds }
    }

    /// Classify one frame with a visible face.
    ///
    /// A turned head takes precedence over vertical gaze. A distracted frame
    /// scores 0; otherwise the score adds 40 for a centered face, 40 for
    /// looking at the screen and 20 for a blink rate strictly inside (10, 30).
    #[must_use]
    pub fn classify(
        &self,
        head_pose: &HeadPoseSample,
        blink: &BlinkSample,
        face_centered: bool,
        timestamp: TimestampMs,
    ) -> EngagementSample {
        let head_turned_away = head_pose.yaw.abs() > self.thresholds.yaw;
        let looking_up = head_pose.pitch < -self.thresholds.pitch_up;
        let looking_down = head_pose.pitch > self.thresholds.pitch_down;
        let looking_at_screen = !head_turned_away && !looking_up && !looking_down;

        let reason = if head_turned_away {
            Some(DistractionReason::HeadTurned)
        } else if looking_up || looking_down {
            Some(DistractionReason::LookingAway)
        } else {
            None
        };

        if let Some(reason) = reason {
            return EngagementSample::distracted(timestamp, reason, face_centered, looking_at_screen);
        }

        let mut level = 0;
        if face_centered {
            level += ENGAGEMENT_CENTERED_POINTS;
        }
        if looking_at_screen {
            level += ENGAGEMENT_LOOKING_POINTS;
        }
        if blink.average_blink_rate > NORMAL_BLINK_RATE_MIN && blink.average_blink_rate < NORMAL_BLINK_RATE_MAX {
            level += ENGAGEMENT_BLINK_POINTS;
        }

        EngagementSample {
            timestamp,
            level,
            face_centered,
            looking_at_screen,
            distracted: false,
            distraction_reason: None,
        }
    }

    /// Sample used when no face was detected; the rules are bypassed
    #[must_use]
    pub fn no_face(timestamp: TimestampMs) -> EngagementSample {
        EngagementSample::distracted(timestamp, DistractionReason::FaceNotDetected, false, false)
    }
}
