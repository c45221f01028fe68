//! Per-frame analysis: landmarks in, one [`TrackingSample`] out.

use crate::{
    blink_detector::BlinkDetector,
    config::TrackingSettings,
    engagement::{EngagementClassifier, EngagementThresholds},
    geometry,
    landmarks::LandmarkFrame,
    types::{FaceLandmarksData, HeadPoseSample, TimestampMs, TrackingSample},
    Result,
};

/// Stateful frame pipeline, one per capture session
#[derive(Debug, Clone)]
pub struct FramePipeline {
    blink: BlinkDetector,
    classifier: EngagementClassifier,
}

impl FramePipeline {
    /// Create a pipeline for a fresh session
    #[must_use]
    pub fn new(settings: &TrackingSettings) -> Self {
        Self {
            blink: BlinkDetector::new(settings.blink_threshold),
            classifier: EngagementClassifier::new(EngagementThresholds::from(settings)),
        }
    }

    /// Swap in new thresholds; blink history is kept
    pub fn update_settings(&mut self, settings: &TrackingSettings) {
        self.blink.set_threshold(settings.blink_threshold);
        self.classifier = EngagementClassifier::new(EngagementThresholds::from(settings));
    }

    /// Analyze one frame, or synthesize a no-face sample when `frame` is `None`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::MissingLandmark`] if the frame lacks a required
    /// index. No sample is produced for such a frame and blink state is left
    /// untouched.
    pub fn process(&mut self, frame: Option<&LandmarkFrame>, timestamp: TimestampMs) -> Result<TrackingSample> {
        let Some(frame) = frame else {
            return Ok(self.synthesize_no_face(timestamp));
        };

        // All geometry runs before any state changes so that a short frame
        // cannot leave the blink detector half-updated.
        let ear = geometry::average_eye_aspect_ratio(frame)?;
        let head_pose = geometry::head_pose(frame, timestamp)?;
        let face_centered = geometry::is_face_centered(frame)?;
        let face_landmarks = FaceLandmarksData::extract(frame)?;

        let blink = self.blink.update(ear, timestamp);
        let engagement = self.classifier.classify(&head_pose, &blink, face_centered, timestamp);

        Ok(TrackingSample {
            timestamp,
            face_detected: true,
            blink,
            head_pose,
            engagement,
            face_landmarks: Some(face_landmarks),
        })
    }

    /// The sample emitted when no face is visible or nothing arrived in time
    #[must_use]
    pub fn synthesize_no_face(&self, timestamp: TimestampMs) -> TrackingSample {
        TrackingSample {
            timestamp,
            face_detected: false,
            blink: self.blink.idle_sample(timestamp),
            head_pose: HeadPoseSample::neutral(timestamp),
            engagement: EngagementClassifier::no_face(timestamp),
            face_landmarks: None,
        }
    }

    /// Blinks counted so far in this session
    #[must_use]
    pub fn blink_count(&self) -> u32 {
        self.blink.blink_count()
    }
}
