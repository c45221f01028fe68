//! Control surface: session ownership and command dispatch.
//!
//! The control surface never touches landmarks. It sends commands through
//! the readiness gate, appends incoming samples to the running session and
//! finalizes the session when tracking stops.

use crate::{
    archive::SessionArchive,
    config::{SettingsPatch, TrackingSettings},
    constants::DEFAULT_HISTORY_CAPACITY,
    messages::{CameraStatus, CaptureEvent, Command},
    relay::{CommandRelay, CommandSink},
    session::{SessionContext, TrackingSession},
    types::{TimestampMs, TrackingSample},
    Error, Result,
};
use log::{debug, info, warn};

/// Foreground actor state
pub struct ControlSurface<S: CommandSink> {
    relay: CommandRelay<S>,
    settings: TrackingSettings,
    history_capacity: usize,
    session: Option<SessionContext>,
    camera_status: CameraStatus,
    last_error: Option<String>,
    archive: SessionArchive,
}

impl<S: CommandSink> ControlSurface<S> {
    #[must_use]
    pub fn new(sink: S, settings: TrackingSettings) -> Self {
        Self {
            relay: CommandRelay::new(sink),
            settings,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            session: None,
            camera_status: CameraStatus::default(),
            last_error: None,
            archive: SessionArchive::new(),
        }
    }

    /// Override the per-session history capacity
    #[must_use]
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity.max(1);
        self
    }

    #[must_use]
    pub fn is_tracking(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn settings(&self) -> &TrackingSettings {
        &self.settings
    }

    #[must_use]
    pub fn session(&self) -> Option<&SessionContext> {
        self.session.as_ref()
    }

    #[must_use]
    pub fn latest_sample(&self) -> Option<&TrackingSample> {
        self.session.as_ref().and_then(SessionContext::latest)
    }

    #[must_use]
    pub fn camera_status(&self) -> &CameraStatus {
        &self.camera_status
    }

    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    #[must_use]
    pub fn archive(&self) -> &SessionArchive {
        &self.archive
    }

    #[must_use]
    pub fn relay(&self) -> &CommandRelay<S> {
        &self.relay
    }

    /// Open a session and ask the capture surface to start
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionError`] if a session is already running, or a
    /// delivery error from the relay
    pub fn start_session(&mut self, now: TimestampMs) -> Result<&SessionContext> {
        if let Some(session) = &self.session {
            return Err(Error::SessionError(format!("session {} is already running", session.id())));
        }

        self.last_error = None;
        self.relay.dispatch(Command::Start {
            settings: self.settings.clone(),
        })?;
        let context = SessionContext::start(now, self.history_capacity);
        Ok(self.session.insert(context))
    }

    /// Stop tracking and finalize the running session.
    ///
    /// The finished session is archived and a copy returned. Samples that
    /// arrive afterwards are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionError`] if no session is running
    pub fn stop_session(&mut self, now: TimestampMs) -> Result<TrackingSession> {
        let context = self
            .session
            .take()
            .ok_or_else(|| Error::SessionError("no session is running".to_string()))?;

        if let Err(e) = self.relay.dispatch(Command::Stop) {
            warn!("Could not deliver stop command: {e}");
        }

        // A clock step backwards must not lose the session
        let end_time = now.max(context.start_time());
        let finished = context.finish(end_time)?;
        self.archive.add(finished.clone());
        Ok(finished)
    }

    /// Label the running session (e.g. as a pomodoro)
    ///
    /// # Errors
    ///
    /// Returns [`Error::SessionError`] if no session is running
    pub fn tag_session(&mut self, tag: impl Into<String>) -> Result<()> {
        let session = self
            .session
            .as_mut()
            .ok_or_else(|| Error::SessionError("no session is running".to_string()))?;
        session.tag(tag);
        Ok(())
    }

    /// Validate and apply new settings, forwarding them to the capture surface
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigError`] for out-of-range settings, or a delivery
    /// error from the relay
    pub fn update_settings(&mut self, patch: &SettingsPatch) -> Result<()> {
        let merged = self.settings.merge(patch);
        merged.validate()?;

        self.settings = merged;
        self.relay.dispatch(Command::SettingsUpdate {
            settings: self.settings.clone(),
        })
    }

    /// Apply one event from the capture surface
    ///
    /// # Errors
    ///
    /// Returns a delivery error if draining deferred commands fails
    pub fn handle_event(&mut self, event: CaptureEvent) -> Result<()> {
        match event {
            CaptureEvent::Ready => {
                let delivered = self.relay.mark_ready()?;
                info!("Capture surface ready, delivered {delivered} deferred commands");
            }
            CaptureEvent::Data { sample } => match self.session.as_mut() {
                Some(session) => session.append(*sample),
                None => debug!("Ignoring sample outside a session"),
            },
            CaptureEvent::Status { status } => {
                info!(
                    "Camera status: initialized={}, active={}",
                    status.initialized, status.active
                );
                if let Some(error) = &status.error {
                    self.last_error = Some(error.clone());
                }
                self.camera_status = status;
            }
            CaptureEvent::Error { message } => {
                warn!("Capture surface error: {message}");
                self.last_error = Some(message);
            }
        }
        Ok(())
    }
}
