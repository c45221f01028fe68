//! Frame analysis tests over synthetic face-mesh frames

mod test_helpers;

use focus_tracker::{
    config::TrackingSettings,
    geometry::{average_eye_aspect_ratio, head_pose, is_face_centered},
    landmarks::LandmarkFrame,
    pipeline::FramePipeline,
    types::DistractionReason,
    Error,
};
use nalgebra::{Point3, Vector3};
use test_helpers::{assert_close, attentive_frame, closed_eyes_frame, face_frame, CLOSED_EAR, OPEN_EAR};

fn pipeline() -> FramePipeline {
    FramePipeline::new(&TrackingSettings::default())
}

fn shifted(frame: &LandmarkFrame, offset: Vector3<f64>) -> LandmarkFrame {
    frame.points().iter().map(|p| p + offset).collect::<Vec<Point3<f64>>>().into()
}

#[test]
fn test_attentive_frame() {
    let sample = pipeline().process(Some(&attentive_frame()), 1_000).unwrap();

    assert!(sample.face_detected);
    assert_close(sample.blink.eye_aspect_ratio, OPEN_EAR, 1e-9).unwrap();
    assert!(!sample.blink.blink_detected);
    assert_close(sample.head_pose.yaw, 0.0, 1e-6).unwrap();
    assert_close(sample.head_pose.pitch, 0.0, 1e-6).unwrap();
    assert_close(sample.head_pose.roll, 0.0, 1e-6).unwrap();

    // Centered and looking, but no blink rate yet
    assert_eq!(sample.engagement.level, 80);
    assert!(sample.engagement.face_centered);
    assert!(sample.engagement.looking_at_screen);
    assert!(!sample.engagement.distracted);
    assert_eq!(sample.distraction(), None);

    let landmarks = sample.face_landmarks.unwrap();
    assert_close(landmarks.left_eye.x, 0.40, 1e-9).unwrap();
    assert_close(landmarks.right_eye.x, 0.60, 1e-9).unwrap();
    assert_close(landmarks.mouth.width, 0.10, 1e-9).unwrap();
    assert_close(landmarks.mouth.height, 0.04, 1e-9).unwrap();
}

#[test]
fn test_blink_sequence_counts_closing_edges() {
    let mut pipeline = pipeline();
    let ears = [0.25, 0.15, 0.15, 0.25, 0.15];
    let mut last = None;
    for (i, ear) in ears.into_iter().enumerate() {
        let ts = i64::try_from(i).unwrap() * 100;
        last = Some(pipeline.process(Some(&face_frame(ear, 0.0, 0.0)), ts).unwrap());
    }
    let last = last.unwrap();
    assert_eq!(last.blink.blink_count, 2);
    assert!(last.blink.blink_detected);
    assert_eq!(pipeline.blink_count(), 2);
}

#[test]
fn test_normal_blink_rate_earns_full_score() {
    let mut pipeline = pipeline();
    pipeline.process(Some(&closed_eyes_frame()), 0).unwrap();
    pipeline.process(Some(&attentive_frame()), 3_000).unwrap();
    let sample = pipeline.process(Some(&closed_eyes_frame()), 6_000).unwrap();

    // Two blinks over six seconds extrapolate to 20 per minute
    assert_eq!(sample.blink.average_blink_rate, 20);
    assert_eq!(sample.engagement.level, 100);
}

#[test]
fn test_head_turn_takes_precedence() {
    let mut pipeline = pipeline();
    let sample = pipeline.process(Some(&face_frame(OPEN_EAR, 45.0, 40.0)), 0).unwrap();

    assert_close(sample.head_pose.yaw, 45.0, 1e-6).unwrap();
    assert!(sample.engagement.distracted);
    assert_eq!(sample.engagement.level, 0);
    assert!(!sample.engagement.looking_at_screen);
    assert_eq!(sample.distraction(), Some(DistractionReason::HeadTurned));
}

#[test]
fn test_vertical_gaze_is_looking_away() {
    let mut pipeline = pipeline();
    for pitch in [-30.0, 30.0] {
        let sample = pipeline.process(Some(&face_frame(OPEN_EAR, 0.0, pitch)), 0).unwrap();
        assert_close(sample.head_pose.pitch, pitch, 1e-6).unwrap();
        assert_eq!(sample.distraction(), Some(DistractionReason::LookingAway));
    }

    // Inside both thresholds
    let sample = pipeline.process(Some(&face_frame(OPEN_EAR, 0.0, -15.0)), 0).unwrap();
    assert!(!sample.engagement.distracted);
}

#[test]
fn test_off_center_face_is_partially_engaged() {
    let frame = shifted(&attentive_frame(), Vector3::new(0.3, 0.0, 0.0));
    assert!(!is_face_centered(&frame).unwrap());

    let sample = pipeline().process(Some(&frame), 0).unwrap();
    assert_close(sample.head_pose.yaw, 0.0, 1e-6).unwrap();
    assert!(!sample.engagement.face_centered);
    assert!(!sample.engagement.distracted);
    assert_eq!(sample.engagement.level, 40);
}

#[test]
fn test_geometry_is_scale_invariant() {
    let frame = face_frame(OPEN_EAR, 20.0, 10.0);
    let ear = average_eye_aspect_ratio(&frame).unwrap();
    let pose = head_pose(&frame, 0).unwrap();

    for factor in [0.5, 2.0, 640.0] {
        let scaled = frame.scaled(factor);
        assert_close(average_eye_aspect_ratio(&scaled).unwrap(), ear, 1e-9).unwrap();
        let scaled_pose = head_pose(&scaled, 0).unwrap();
        assert_close(scaled_pose.yaw, pose.yaw, 1e-6).unwrap();
        assert_close(scaled_pose.pitch, pose.pitch, 1e-6).unwrap();
    }
}

#[test]
fn test_closed_eyes_ear() {
    let ear = average_eye_aspect_ratio(&closed_eyes_frame()).unwrap();
    assert_close(ear, CLOSED_EAR, 1e-9).unwrap();
}

#[test]
fn test_no_face_frame() {
    let mut pipeline = pipeline();
    pipeline.process(Some(&closed_eyes_frame()), 0).unwrap();
    let sample = pipeline.process(None, 500).unwrap();

    assert!(!sample.face_detected);
    assert_eq!(sample.engagement.level, 0);
    assert_eq!(sample.distraction(), Some(DistractionReason::FaceNotDetected));
    assert_eq!(sample.blink.blink_count, 1);
    assert!(sample.face_landmarks.is_none());
}

#[test]
fn test_short_frame_leaves_state_untouched() {
    let full = closed_eyes_frame();
    let truncated = LandmarkFrame::new(full.points()[..200].to_vec());

    let mut pipeline = pipeline();
    let err = pipeline.process(Some(&truncated), 0).unwrap_err();
    assert!(matches!(err, Error::MissingLandmark { len: 200, .. }));
    assert_eq!(pipeline.blink_count(), 0);

    // The next full frame still sees an open-eye history and counts the blink
    let sample = pipeline.process(Some(&full), 100).unwrap();
    assert_eq!(sample.blink.blink_count, 1);
}

#[test]
fn test_engagement_invariant_over_pose_grid() {
    let mut pipeline = pipeline();
    let mut ts = 0;
    for ear in [CLOSED_EAR, OPEN_EAR] {
        for yaw in [-80.0, -31.0, -10.0, 0.0, 29.0, 50.0] {
            for pitch in [-60.0, -21.0, 0.0, 24.0, 26.0, 70.0] {
                ts += 100;
                let sample = pipeline.process(Some(&face_frame(ear, yaw, pitch)), ts).unwrap();
                let engagement = sample.engagement;

                assert!(engagement.level <= 100);
                assert!(sample.head_pose.yaw.abs() <= 90.0);
                assert!(sample.head_pose.pitch.abs() <= 90.0);
                if engagement.distracted {
                    assert_eq!(engagement.level, 0);
                    assert!(engagement.distraction_reason.is_some());
                } else {
                    assert!(engagement.looking_at_screen);
                    assert!(engagement.level >= 40);
                    assert!(engagement.distraction_reason.is_none());
                }
            }
        }
    }
}
