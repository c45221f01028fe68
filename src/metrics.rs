//! Session-level reduction of per-frame samples.
//!
//! [`reduce`] is a pure function of the sample history and the session's
//! wall-clock duration. It is always run over the full history at session
//! end, never maintained incrementally.
//!
//! Two kinds of counters coexist in [`SessionMetrics`]:
//! - `time_distracted`, `time_inactive` and `time_focused` are seconds,
//!   weighted by the gap to the next sample
//! - `time_fully_engaged`, `time_partially_engaged` and `time_disengaged`
//!   are frame counts despite their names

use crate::{
    constants::{FULL_ENGAGEMENT_ABOVE, LAST_FRAME_DURATION_SECS, MAX_FRAME_DURATION_SECS, PARTIAL_ENGAGEMENT_MIN},
    types::{DistractionReason, TrackingSample},
};
use serde::{Deserialize, Serialize};

/// Mean head pose over a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadPoseStats {
    pub average_yaw: f64,
    pub average_pitch: f64,
    pub average_roll: f64,
}

/// Summary statistics for one session
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    /// Highest blink count seen in the history
    pub total_blinks: u32,
    /// Blinks per minute over the whole session
    pub average_blink_rate: f64,
    /// Mean engagement level over samples
    pub average_engagement: f64,
    /// Frames with engagement above 80
    pub time_fully_engaged: u32,
    /// Frames with engagement in [40, 80]
    pub time_partially_engaged: u32,
    /// Frames that were distracted or below 40
    pub time_disengaged: u32,
    /// Seconds spent distracted
    pub time_distracted: f64,
    /// Session seconds not spent distracted
    pub time_focused: f64,
    /// Seconds with no face in frame
    pub time_inactive: f64,
    /// `time_focused / duration * 100`
    pub efficiency: f64,
    pub head_pose_stats: HeadPoseStats,
}

#[allow(clippy::cast_precision_loss)]
fn gap_secs(current: &TrackingSample, next: Option<&TrackingSample>) -> f64 {
    match next {
        Some(next) => ((next.timestamp - current.timestamp) as f64 / 1000.0).clamp(0.0, MAX_FRAME_DURATION_SECS),
        None => LAST_FRAME_DURATION_SECS,
    }
}

/// Reduce an ordered history to session metrics.
///
/// `total_duration_secs` is the session's wall-clock length, used for the
/// focus complement, efficiency and the session-wide blink rate. An empty
/// history yields all-zero metrics.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn reduce<'a, I>(history: I, total_duration_secs: f64) -> SessionMetrics
where
    I: IntoIterator<Item = &'a TrackingSample>,
{
    let mut samples = history.into_iter().peekable();
    if samples.peek().is_none() {
        return SessionMetrics::default();
    }

    let mut metrics = SessionMetrics::default();
    let mut count: u32 = 0;
    let mut total_engagement = 0.0;
    let mut total_yaw = 0.0;
    let mut total_pitch = 0.0;
    let mut total_roll = 0.0;

    while let Some(sample) = samples.next() {
        let frame_duration = gap_secs(sample, samples.peek().copied());
        let engagement = &sample.engagement;

        count += 1;
        metrics.total_blinks = metrics.total_blinks.max(sample.blink.blink_count);
        total_engagement += f64::from(engagement.level);

        if engagement.distracted {
            metrics.time_distracted += frame_duration;
            if engagement.distraction_reason == Some(DistractionReason::FaceNotDetected) {
                metrics.time_inactive += frame_duration;
            }
        }

        if engagement.distracted || engagement.level < PARTIAL_ENGAGEMENT_MIN {
            metrics.time_disengaged += 1;
        } else if engagement.level > FULL_ENGAGEMENT_ABOVE {
            metrics.time_fully_engaged += 1;
        } else {
            metrics.time_partially_engaged += 1;
        }

        total_yaw += sample.head_pose.yaw;
        total_pitch += sample.head_pose.pitch;
        total_roll += sample.head_pose.roll;
    }

    let n = f64::from(count);
    metrics.average_engagement = total_engagement / n;
    metrics.head_pose_stats = HeadPoseStats {
        average_yaw: total_yaw / n,
        average_pitch: total_pitch / n,
        average_roll: total_roll / n,
    };

    metrics.time_focused = (total_duration_secs - metrics.time_distracted).max(0.0);
    if total_duration_secs > 0.0 {
        metrics.efficiency = metrics.time_focused / total_duration_secs * 100.0;
        metrics.average_blink_rate = f64::from(metrics.total_blinks) / total_duration_secs * 60.0;
    }

    metrics
}
