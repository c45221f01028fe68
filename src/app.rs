//! Application wiring for the two tracking actors.

use crate::{
    archive::SessionArchive,
    capture::CaptureSurface,
    config::Config,
    control::ControlSurface,
    messages::{CaptureEvent, Command},
    session::TrackingSession,
    source::LandmarkSource,
    types::now_ms,
    Error, Result,
};
use log::{info, warn};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

/// Main application struct
///
/// Runs the capture surface on its own task and drives the control surface
/// from whichever task owns the `TrackerApp`.
pub struct TrackerApp {
    control: ControlSurface<mpsc::UnboundedSender<Command>>,
    events: mpsc::UnboundedReceiver<CaptureEvent>,
    capture: JoinHandle<Result<()>>,
}

impl TrackerApp {
    /// Spawn the capture surface over `source` and connect a control surface.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<L>(source: L, config: &Config) -> Self
    where
        L: LandmarkSource + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let surface = CaptureSurface::new(source, config.capture.clone(), event_tx);
        let capture = tokio::spawn(surface.run(command_rx));

        let control = ControlSurface::new(command_tx, config.tracking.clone())
            .with_history_capacity(config.session.history_capacity);

        info!("Tracker started");
        Self {
            control,
            events: event_rx,
            capture,
        }
    }

    #[must_use]
    pub fn control(&self) -> &ControlSurface<mpsc::UnboundedSender<Command>> {
        &self.control
    }

    pub fn control_mut(&mut self) -> &mut ControlSurface<mpsc::UnboundedSender<Command>> {
        &mut self.control
    }

    /// Apply capture events to the control surface for `duration`.
    ///
    /// Returns the number of events handled.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] if the capture surface exits early
    pub async fn pump_for(&mut self, duration: Duration) -> Result<usize> {
        let deadline = Instant::now() + duration;
        let mut handled = 0;
        loop {
            tokio::select! {
                () = sleep_until(deadline) => break,
                event = self.events.recv() => match event {
                    Some(event) => {
                        self.control.handle_event(event)?;
                        handled += 1;
                    }
                    None => {
                        return Err(Error::ChannelClosed("capture surface exited".to_string()));
                    }
                },
            }
        }
        Ok(handled)
    }

    /// Track one session for `duration` and return it finalized
    ///
    /// # Errors
    ///
    /// Returns an error if a session is already running or the capture
    /// surface goes away mid-session
    pub async fn run_session(&mut self, duration: Duration, tags: &[String]) -> Result<TrackingSession> {
        let id = self.control.start_session(now_ms())?.id().to_string();
        for tag in tags {
            self.control.tag_session(tag.as_str())?;
        }
        info!("Session {id} running for {:.1}s", duration.as_secs_f64());

        if let Err(e) = self.pump_for(duration).await {
            warn!("Session {id} interrupted: {e}");
            self.control.stop_session(now_ms())?;
            return Err(e);
        }

        let session = self.control.stop_session(now_ms())?;
        info!(
            "Session {id} finished: {:.1}s, efficiency {:.0}%",
            session.total_duration, session.metrics.efficiency
        );
        Ok(session)
    }

    /// Close the command channel, wait for the capture surface and return
    /// the sessions recorded during this run
    ///
    /// # Errors
    ///
    /// Returns the capture surface failure, if any
    pub async fn shutdown(self) -> Result<SessionArchive> {
        let Self {
            control,
            events,
            capture,
        } = self;
        let archive = control.archive().clone();
        drop(control);

        let outcome = capture
            .await
            .map_err(|e| Error::ChannelClosed(format!("capture task failed: {e}")));
        drop(events);
        outcome??;

        info!("Tracker shut down with {} archived sessions", archive.len());
        Ok(archive)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::ReplaySource;
    use crate::types::DistractionReason;

    fn fast_config() -> Config {
        let mut config = Config::default();
        config.tracking.fps_active = 100;
        config.capture.watchdog_interval_ms = 20;
        config.capture.no_data_timeout_ms = 40;
        config
    }

    #[tokio::test]
    async fn test_session_over_no_face_replay() {
        let source = ReplaySource::from_frames(vec![None; 4]).looped(true);
        let mut app = TrackerApp::spawn(source, &fast_config());

        let session = app
            .run_session(Duration::from_millis(300), &["pomodoro".to_string()])
            .await
            .unwrap();

        assert!(session.is_finished());
        assert_eq!(session.tags, vec!["pomodoro".to_string()]);
        assert!(session.metrics.time_disengaged > 0);
        assert_eq!(session.metrics.time_fully_engaged, 0);
        assert!(session.metrics.time_distracted > 0.0);
        assert!(app.control().camera_status().initialized);

        let archive = app.shutdown().await.unwrap();
        assert_eq!(archive.len(), 1);
    }

    #[tokio::test]
    async fn test_watchdog_fills_silent_source() {
        let source = ReplaySource::from_frames(Vec::new());
        let mut app = TrackerApp::spawn(source, &fast_config());

        app.control_mut().start_session(now_ms()).unwrap();
        app.pump_for(Duration::from_millis(250)).await.unwrap();

        let latest = app.control().latest_sample().cloned().unwrap();
        assert!(!latest.face_detected);
        assert_eq!(latest.distraction(), Some(DistractionReason::FaceNotDetected));

        app.control_mut().stop_session(now_ms()).unwrap();
        app.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_missing_recording_reports_error() {
        let source = ReplaySource::from_file("/nonexistent/recording.jsonl");
        let mut app = TrackerApp::spawn(source, &fast_config());

        app.control_mut().start_session(now_ms()).unwrap();
        app.pump_for(Duration::from_millis(100)).await.unwrap();

        assert!(app.control().last_error().is_some());
        assert!(!app.control().camera_status().active);
        let session = app.control_mut().stop_session(now_ms()).unwrap();
        assert_eq!(session.metrics, crate::metrics::SessionMetrics::default());
        app.shutdown().await.unwrap();
    }
}
