//! Helper functions and utilities for tests

#![allow(dead_code)]

use focus_tracker::{
    constants::NUM_FACE_MESH_LANDMARKS,
    landmarks::LandmarkFrame,
    types::{DistractionReason, EngagementSample, HeadPoseSample, TrackingSample},
    Error, Result,
};
use nalgebra::Point3;

/// Eye aspect ratio of a relaxed open eye
pub const OPEN_EAR: f64 = 0.3;
/// Eye aspect ratio well below the default blink threshold
pub const CLOSED_EAR: f64 = 0.1;

const EYE_LINE_Y: f64 = 0.40;
const EYE_WIDTH: f64 = 0.10;
const EYE_DISTANCE: f64 = 0.10;
const FACE_HEIGHT: f64 = 0.40;

/// Synthetic face-mesh frame with a chosen eye opening and head pose.
///
/// Eyes sit on y = 0.40 with inner corners 0.1 apart around x = 0.5 and the
/// chin at y = 0.80, so the nose placement maps directly onto yaw and pitch.
pub fn face_frame(ear: f64, yaw: f64, pitch: f64) -> LandmarkFrame {
    let mut points = vec![Point3::new(0.5, 0.5, 0.0); NUM_FACE_MESH_LANDMARKS];

    // Each eye: width 0.1, lids at +/- h, EAR = 4h / 0.2
    let h = ear * 2.0 * EYE_WIDTH / 4.0;
    let left_inner_x = 0.5 - EYE_DISTANCE / 2.0;
    let right_inner_x = 0.5 + EYE_DISTANCE / 2.0;

    // Contour [33, 160, 158, 133, 153, 144]
    let x0 = left_inner_x - EYE_WIDTH;
    points[33] = Point3::new(x0, EYE_LINE_Y, 0.0);
    points[160] = Point3::new(x0 + 0.03, EYE_LINE_Y - h, 0.0);
    points[158] = Point3::new(x0 + 0.07, EYE_LINE_Y - h, 0.0);
    points[133] = Point3::new(left_inner_x, EYE_LINE_Y, 0.0);
    points[153] = Point3::new(x0 + 0.07, EYE_LINE_Y + h, 0.0);
    points[144] = Point3::new(x0 + 0.03, EYE_LINE_Y + h, 0.0);

    // Contour [362, 385, 387, 263, 373, 380]
    let x1 = right_inner_x;
    points[362] = Point3::new(x1, EYE_LINE_Y, 0.0);
    points[385] = Point3::new(x1 + 0.03, EYE_LINE_Y - h, 0.0);
    points[387] = Point3::new(x1 + 0.07, EYE_LINE_Y - h, 0.0);
    points[263] = Point3::new(x1 + EYE_WIDTH, EYE_LINE_Y, 0.0);
    points[373] = Point3::new(x1 + 0.07, EYE_LINE_Y + h, 0.0);
    points[380] = Point3::new(x1 + 0.03, EYE_LINE_Y + h, 0.0);

    let nose_x = 0.5 + yaw / 60.0 * EYE_DISTANCE;
    let nose_y = EYE_LINE_Y + (pitch / 90.0 + 0.4) * FACE_HEIGHT;
    points[1] = Point3::new(nose_x, nose_y, -0.05);
    points[152] = Point3::new(0.5, EYE_LINE_Y + FACE_HEIGHT, 0.0);

    points[61] = Point3::new(0.45, 0.68, 0.0);
    points[291] = Point3::new(0.55, 0.68, 0.0);
    points[13] = Point3::new(0.5, 0.66, 0.0);
    points[14] = Point3::new(0.5, 0.70, 0.0);

    LandmarkFrame::new(points)
}

/// Looking straight at the screen with open eyes
pub fn attentive_frame() -> LandmarkFrame {
    face_frame(OPEN_EAR, 0.0, 0.0)
}

/// Same pose as [`attentive_frame`] with the eyes shut
pub fn closed_eyes_frame() -> LandmarkFrame {
    face_frame(CLOSED_EAR, 0.0, 0.0)
}

/// Hand-built sample for metric tests
pub fn sample_at(timestamp: i64, level: u8, reason: Option<DistractionReason>) -> TrackingSample {
    let engagement = match reason {
        Some(reason) => EngagementSample::distracted(timestamp, reason, false, false),
        None => EngagementSample {
            timestamp,
            level,
            face_centered: level >= 40,
            looking_at_screen: true,
            distracted: false,
            distraction_reason: None,
        },
    };
    let face_detected = reason != Some(DistractionReason::FaceNotDetected);
    TrackingSample {
        timestamp,
        face_detected,
        blink: focus_tracker::types::BlinkSample {
            timestamp,
            blink_detected: false,
            eye_aspect_ratio: if face_detected { OPEN_EAR } else { 0.0 },
            blink_count: 0,
            average_blink_rate: 0,
        },
        head_pose: HeadPoseSample::neutral(timestamp),
        engagement,
        face_landmarks: None,
    }
}

/// Assert that two floats agree within `tolerance`
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) -> Result<()> {
    if (actual - expected).abs() > tolerance {
        return Err(Error::InvalidInput(format!(
            "expected {expected} +/- {tolerance}, got {actual}"
        )));
    }
    Ok(())
}
