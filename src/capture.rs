//! Capture surface actor.
//!
//! Owns the landmark source, the frame pipeline and the watchdog. It reads
//! commands from one channel and reports samples, status and errors on
//! another, handling one message at a time.

use crate::{
    config::{CaptureConfig, TrackingSettings},
    landmarks::LandmarkFrame,
    messages::{CameraStatus, CaptureEvent, Command},
    pipeline::FramePipeline,
    source::{LandmarkSource, ResultCallback, SourceOptions},
    types::now_ms,
    watchdog::{is_stale, Watchdog},
    Error, Result,
};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::time::Instant;

/// The hidden capture surface
pub struct CaptureSurface<L: LandmarkSource> {
    source: L,
    capture: CaptureConfig,
    settings: TrackingSettings,
    pipeline: FramePipeline,
    events: mpsc::UnboundedSender<CaptureEvent>,
    frames_tx: mpsc::Sender<Option<LandmarkFrame>>,
    frames_rx: mpsc::Receiver<Option<LandmarkFrame>>,
    ticks_tx: mpsc::Sender<()>,
    ticks_rx: mpsc::Receiver<()>,
    watchdog: Option<Watchdog>,
    initialized: bool,
    active: bool,
    last_sample_at: Instant,
}

impl<L: LandmarkSource> CaptureSurface<L> {
    /// Create the actor; it does nothing until [`CaptureSurface::run`]
    #[must_use]
    pub fn new(source: L, capture: CaptureConfig, events: mpsc::UnboundedSender<CaptureEvent>) -> Self {
        let settings = TrackingSettings::default();
        // Capacity 1: at most one frame waits while another is analyzed,
        // anything beyond that is dropped at the callback.
        let (frames_tx, frames_rx) = mpsc::channel(1);
        let (ticks_tx, ticks_rx) = mpsc::channel(1);
        Self {
            source,
            capture,
            pipeline: FramePipeline::new(&settings),
            settings,
            events,
            frames_tx,
            frames_rx,
            ticks_tx,
            ticks_rx,
            watchdog: None,
            initialized: false,
            active: false,
            last_sample_at: Instant::now(),
        }
    }

    /// Current status snapshot
    #[must_use]
    pub fn status(&self) -> CameraStatus {
        CameraStatus::new(self.initialized, self.active)
    }

    /// Process commands until the command channel closes.
    ///
    /// Announces readiness first, then brings up the landmark source. A
    /// failed bring-up is reported and retried on the next `start`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ChannelClosed`] if the control surface stops listening
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) -> Result<()> {
        info!("Capture surface listening for commands");
        self.emit(CaptureEvent::Ready)?;
        self.initialize()?;

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command)?,
                    None => break,
                },
                Some(frame) = self.frames_rx.recv() => self.handle_frame(frame)?,
                Some(()) = self.ticks_rx.recv() => self.handle_tick()?,
            }
        }

        info!("Command channel closed, shutting down capture surface");
        self.halt();
        Ok(())
    }

    fn emit(&self, event: CaptureEvent) -> Result<()> {
        self.events
            .send(event)
            .map_err(|_| Error::ChannelClosed("control surface stopped listening".to_string()))
    }

    fn emit_error(&self, message: String) -> Result<()> {
        warn!("{message}");
        self.emit(CaptureEvent::Error { message })
    }

    fn emit_status(&self, error: Option<String>) -> Result<()> {
        let mut status = self.status();
        status.error = error;
        self.emit(CaptureEvent::Status { status })
    }

    fn source_options(&self) -> SourceOptions {
        SourceOptions::from_config(&self.capture, self.settings.fps_active)
    }

    fn initialize(&mut self) -> Result<()> {
        let frames = self.frames_tx.clone();
        let callback: ResultCallback = Arc::new(move |frame| {
            if frames.try_send(frame).is_err() {
                debug!("Analysis in flight, dropping frame");
            }
        });
        self.source.on_result(callback);

        match self.source.configure(&self.source_options()) {
            Ok(()) => {
                info!("Landmark source initialized");
                self.initialized = true;
                self.emit_status(None)
            }
            Err(e) => {
                self.initialized = false;
                self.emit_status(Some(e.to_string()))?;
                self.emit_error(format!("Initialization failed: {e}"))
            }
        }
    }

    fn handle_command(&mut self, command: Command) -> Result<()> {
        debug!("Capture surface received {} command", command.kind());
        match command {
            Command::Start { settings } => self.start(settings),
            Command::Stop => {
                self.halt();
                info!("Tracking stopped");
                self.emit_status(None)
            }
            Command::SettingsUpdate { settings } => {
                if let Err(e) = settings.validate() {
                    return self.emit_error(format!("Rejected settings update: {e}"));
                }
                self.pipeline.update_settings(&settings);
                self.settings = settings;
                Ok(())
            }
        }
    }

    fn start(&mut self, settings: TrackingSettings) -> Result<()> {
        if let Err(e) = settings.validate() {
            return self.emit_error(format!("Rejected start settings: {e}"));
        }
        if self.active {
            info!("Start received while tracking, restarting");
            self.halt();
        }

        self.pipeline = FramePipeline::new(&settings);
        self.settings = settings;

        if !self.settings.camera_enabled {
            self.emit_status(Some("camera disabled".to_string()))?;
            return self.emit_error("Camera is disabled in settings".to_string());
        }

        if !self.initialized {
            self.initialize()?;
            if !self.initialized {
                return self.emit_error("Tracker is not ready yet".to_string());
            }
        } else if let Err(e) = self.source.configure(&self.source_options()) {
            self.emit_status(Some(e.to_string()))?;
            return self.emit_error(format!("Failed to configure landmark source: {e}"));
        }

        if let Err(e) = self.source.start() {
            error!("Failed to start camera: {e}");
            self.emit_status(Some(e.to_string()))?;
            return self.emit_error(format!("Failed to start camera: {e}"));
        }

        self.active = true;
        self.last_sample_at = Instant::now();
        self.watchdog = Some(Watchdog::spawn(
            self.capture.watchdog_interval(),
            self.ticks_tx.clone(),
        ));
        info!("Tracking started at {} fps", self.settings.fps_active);
        self.emit_status(None)
    }

    /// Cancel the watchdog, stop the source and discard queued frames
    fn halt(&mut self) {
        if let Some(watchdog) = self.watchdog.take() {
            watchdog.cancel();
        }
        self.source.stop();
        self.active = false;
        while self.frames_rx.try_recv().is_ok() {}
        while self.ticks_rx.try_recv().is_ok() {}
    }

    fn handle_frame(&mut self, frame: Option<LandmarkFrame>) -> Result<()> {
        if !self.active {
            debug!("Discarding frame delivered after stop");
            return Ok(());
        }

        match self.pipeline.process(frame.as_ref(), now_ms()) {
            Ok(sample) => {
                self.last_sample_at = Instant::now();
                self.emit(CaptureEvent::Data {
                    sample: Box::new(sample),
                })
            }
            Err(e) => {
                error!("Frame analysis aborted: {e}");
                self.emit(CaptureEvent::Error {
                    message: format!("Frame analysis aborted: {e}"),
                })
            }
        }
    }

    fn handle_tick(&mut self) -> Result<()> {
        if !self.active {
            return Ok(());
        }
        // Synthesized samples leave `last_sample_at` alone, so a silent
        // source yields one no-face sample per tick.
        if is_stale(self.last_sample_at, Instant::now(), self.capture.no_data_timeout()) {
            info!("No landmark results recently, reporting face not detected");
            let sample = self.pipeline.synthesize_no_face(now_ms());
            self.emit(CaptureEvent::Data {
                sample: Box::new(sample),
            })?;
        }
        Ok(())
    }
}
