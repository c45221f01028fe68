//! Error types for the focus tracking library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// A landmark index the analyzer depends on is absent from the frame.
    ///
    /// The landmark collaborator delivers either a full set or nothing, so a
    /// short frame is an integrity violation rather than a "no face" case.
    #[error("Landmark {index} missing from frame with {len} points")]
    MissingLandmark {
        /// Requested landmark index
        index: usize,
        /// Number of points actually present
        len: usize,
    },

    /// Landmark detector or camera could not be brought up
    #[error("Capability unavailable: {0}")]
    CapabilityUnavailable(String),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Session lifecycle violation (start while active, stop while idle)
    #[error("Session error: {0}")]
    SessionError(String),

    /// The peer end of an actor channel is gone
    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
