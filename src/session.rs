//! Tracking session lifecycle.
//!
//! A [`SessionContext`] is created when a session starts and owns
//! everything the session accumulates: the bounded sample history and the
//! latest sample. [`SessionContext::finish`] is a one-shot transition that
//! computes the metrics and hands back an immutable [`TrackingSession`].

use crate::{
    history::BoundedHistory,
    metrics::{reduce, SessionMetrics},
    types::{TimestampMs, TrackingSample},
    Error, Result,
};
use serde::{Deserialize, Serialize};

/// Session record, finalized exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingSession {
    pub id: String,
    pub start_time: TimestampMs,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<TimestampMs>,
    /// Seconds between start and end
    pub total_duration: f64,
    pub metrics: SessionMetrics,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl TrackingSession {
    /// Whether `finish` has run for this session
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Mutable state of a running session
#[derive(Debug)]
pub struct SessionContext {
    session: TrackingSession,
    history: BoundedHistory,
    latest: Option<TrackingSample>,
}

impl SessionContext {
    /// Begin a session at `start_time`
    #[must_use]
    pub fn start(start_time: TimestampMs, history_capacity: usize) -> Self {
        log::info!("Starting tracking session session_{start_time}");
        Self {
            session: TrackingSession {
                id: format!("session_{start_time}"),
                start_time,
                end_time: None,
                total_duration: 0.0,
                metrics: SessionMetrics::default(),
                tags: Vec::new(),
            },
            history: BoundedHistory::new(history_capacity),
            latest: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.session.id
    }

    #[must_use]
    pub fn start_time(&self) -> TimestampMs {
        self.session.start_time
    }

    #[must_use]
    pub fn history(&self) -> &BoundedHistory {
        &self.history
    }

    #[must_use]
    pub fn latest(&self) -> Option<&TrackingSample> {
        self.latest.as_ref()
    }

    /// Attach a label, ignoring duplicates
    pub fn tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.session.tags.contains(&tag) {
            self.session.tags.push(tag);
        }
    }

    /// Append a sample produced by the capture surface
    pub fn append(&mut self, sample: TrackingSample) {
        self.latest = Some(sample.clone());
        self.history.push(sample);
    }

    /// Seconds elapsed from start to `now`, never negative
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn elapsed_secs(&self, now: TimestampMs) -> f64 {
        ((now - self.session.start_time) as f64 / 1000.0).max(0.0)
    }

    /// Compute final metrics and close the session.
    ///
    /// Consumes the context, so no sample can be appended afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionError`] if `end_time` precedes the start
    pub fn finish(self, end_time: TimestampMs) -> Result<TrackingSession> {
        if end_time < self.session.start_time {
            return Err(Error::SessionError(format!(
                "Session {} cannot end at {end_time}, before its start {}",
                self.session.id, self.session.start_time
            )));
        }

        let total_duration = self.elapsed_secs(end_time);
        let metrics = reduce(&self.history, total_duration);

        if self.history.dropped() > 0 {
            log::debug!(
                "Session {} history dropped {} oldest samples",
                self.session.id,
                self.history.dropped()
            );
        }
        log::info!(
            "Session {} finished: {:.1}s, efficiency {:.1}%",
            self.session.id,
            total_duration,
            metrics.efficiency
        );

        Ok(TrackingSession {
            end_time: Some(end_time),
            total_duration,
            metrics,
            ..self.session
        })
    }
}
