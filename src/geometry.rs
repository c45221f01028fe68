//! Geometric analysis of a landmark frame: eye aspect ratio, head pose and
//! face centering.
//!
//! All functions are pure. The same landmark indices and constants are used
//! for every face; there is no per-user calibration.

use crate::{
    constants::{
        CENTER_BAND_MAX, CENTER_BAND_MIN, CHIN, EPSILON, LEFT_EYE_CONTOUR, LEFT_EYE_INNER, MAX_POSE_ANGLE,
        NOSE_TIP, PITCH_NEUTRAL_RATIO, PITCH_SCALE_DEGREES, RIGHT_EYE_CONTOUR, RIGHT_EYE_INNER, YAW_SCALE_DEGREES,
    },
    landmarks::LandmarkFrame,
    types::{HeadPoseSample, TimestampMs},
    Result,
};
use nalgebra::{distance, Point3};

/// Eye aspect ratio of a six-point eye contour.
///
/// `EAR = (|p2 - p6| + |p3 - p5|) / (2 |p1 - p4|)` using 3D distances.
/// A degenerate contour with zero width yields 0.
#[must_use]
pub fn eye_aspect_ratio(contour: [&Point3<f64>; 6]) -> f64 {
    let [p1, p2, p3, p4, p5, p6] = contour;

    let vertical1 = distance(p2, p6);
    let vertical2 = distance(p3, p5);
    let horizontal = distance(p1, p4);

    if horizontal < EPSILON {
        return 0.0;
    }

    (vertical1 + vertical2) / (2.0 * horizontal)
}

fn contour<'a>(frame: &'a LandmarkFrame, indices: &[usize; 6]) -> Result<[&'a Point3<f64>; 6]> {
    Ok([
        frame.point(indices[0])?,
        frame.point(indices[1])?,
        frame.point(indices[2])?,
        frame.point(indices[3])?,
        frame.point(indices[4])?,
        frame.point(indices[5])?,
    ])
}

/// Mean eye aspect ratio of both eyes
///
/// # Errors
///
/// Returns [`crate::Error::MissingLandmark`] if an eye contour index is absent
pub fn average_eye_aspect_ratio(frame: &LandmarkFrame) -> Result<f64> {
    let right = eye_aspect_ratio(contour(frame, &RIGHT_EYE_CONTOUR)?);
    let left = eye_aspect_ratio(contour(frame, &LEFT_EYE_CONTOUR)?);
    Ok((right + left) / 2.0)
}

fn clamp_angle(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(-MAX_POSE_ANGLE, MAX_POSE_ANGLE)
    } else {
        0.0
    }
}

/// Estimate yaw, pitch and roll in degrees.
///
/// - yaw: horizontal nose offset from the inner-eye midpoint, normalized by
///   the inter-eye distance and scaled so one eye-distance is 60°
/// - pitch: nose position along the eye-to-chin span, offset so 0.4 of the
///   span reads as level, scaled by 90°
/// - roll: angle of the line joining the inner eye corners
///
/// Each angle is clamped to [-90, 90]. A degenerate span (coincident eye
/// corners or chin on the eye line) reads as 0 for the affected angle.
///
/// # Errors
///
/// Returns [`crate::Error::MissingLandmark`] if a pose landmark is absent
pub fn head_pose(frame: &LandmarkFrame, timestamp: TimestampMs) -> Result<HeadPoseSample> {
    let nose = frame.point(NOSE_TIP)?;
    let chin = frame.point(CHIN)?;
    let left_inner = frame.point(LEFT_EYE_INNER)?;
    let right_inner = frame.point(RIGHT_EYE_INNER)?;

    let eye_center_x = (left_inner.x + right_inner.x) / 2.0;
    let eye_center_y = (left_inner.y + right_inner.y) / 2.0;

    let eye_distance = (right_inner.x - left_inner.x).abs();
    let yaw = if eye_distance < EPSILON {
        0.0
    } else {
        (nose.x - eye_center_x) / eye_distance * YAW_SCALE_DEGREES
    };

    let face_height = (chin.y - eye_center_y).abs();
    let pitch = if face_height < EPSILON {
        0.0
    } else {
        ((nose.y - eye_center_y) / face_height - PITCH_NEUTRAL_RATIO) * PITCH_SCALE_DEGREES
    };

    let roll = (right_inner.y - left_inner.y)
        .atan2(right_inner.x - left_inner.x)
        .to_degrees();

    let pose = HeadPoseSample {
        timestamp,
        yaw: clamp_angle(yaw),
        pitch: clamp_angle(pitch),
        roll: clamp_angle(roll),
    };

    log::debug!(
        "Head pose - Yaw: {:.1}°, Pitch: {:.1}°, Roll: {:.1}°",
        pose.yaw,
        pose.pitch,
        pose.roll
    );

    Ok(pose)
}

/// Whether the nose tip lies in the central band (0.3, 0.7) on both axes
///
/// # Errors
///
/// Returns [`crate::Error::MissingLandmark`] if the nose landmark is absent
pub fn is_face_centered(frame: &LandmarkFrame) -> Result<bool> {
    let nose = frame.point(NOSE_TIP)?;
    let inside = |v: f64| v > CENTER_BAND_MIN && v < CENTER_BAND_MAX;
    Ok(inside(nose.x) && inside(nose.y))
}
