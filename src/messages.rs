//! Messages exchanged between the control and capture surfaces.
//!
//! Commands flow control → capture, events flow capture → control. Both
//! serialize with a `kind` tag so they can cross a process boundary as JSON.

use crate::{config::TrackingSettings, types::TrackingSample};
use serde::{Deserialize, Serialize};

/// Capture surface state as reported to the control surface
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CameraStatus {
    pub initialized: bool,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CameraStatus {
    #[must_use]
    pub fn new(initialized: bool, active: bool) -> Self {
        Self {
            initialized,
            active,
            error: None,
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Control → capture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Command {
    Start { settings: TrackingSettings },
    Stop,
    SettingsUpdate { settings: TrackingSettings },
}

impl Command {
    /// Wire name of the command
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::Stop => "stop",
            Self::SettingsUpdate { .. } => "settings-update",
        }
    }
}

/// Capture → control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum CaptureEvent {
    /// Command listener is live; sent once
    Ready,
    Data { sample: Box<TrackingSample> },
    Status {
        #[serde(flatten)]
        status: CameraStatus,
    },
    Error { message: String },
}
