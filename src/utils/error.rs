//! Error types for the converter.
//!
//! Provides a hierarchy of error types using `thiserror` for ergonomic error handling.

use std::io;
use std::sync::PoisonError;
use thiserror::Error;
use serde::Serialize;

/// Validation errors for settings supplied by the caller.
#[derive(Error, Debug, Serialize, PartialEq)]
pub enum ValidationError {
    /// Quality outside `[0.0, 1.0]` or not a finite number
    #[error("Invalid quality value: {0}. Must be between 0.0 and 1.0")]
    Quality(f32),
    /// Invalid settings error
    #[error("Settings error: {0}")]
    Settings(String),
}

/// Main error type for the converter.
///
/// Per-item `Decode`/`Encode` failures are recorded on the item by the batch
/// processor and never escape a run; everything else reaches the caller.
#[derive(Error, Debug, Serialize)]
pub enum ConverterError {
    /// Settings validation failed
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Source bytes are not a supported image
    #[error("Decode error: {0}")]
    Decode(String),

    /// Target format could not be produced from the decoded image
    #[error("Encode error: {0}")]
    Encode(String),

    /// A run was requested with nothing admitted
    #[error("Cannot run an empty batch")]
    EmptyBatch,

    /// Another run already holds the session
    #[error("A conversion run is already in progress")]
    Busy,

    /// Unknown or unsupported format name
    #[error("Format error: {0}")]
    Format(String),

    /// No converted output under the requested name
    #[error("No converted output for: {0}")]
    NotFound(String),

    /// The blocking conversion task failed to complete
    #[error("Processing error: {0}")]
    Processing(String),

    /// File IO error
    #[error("IO error: {0}")]
    IO(String),

    /// Shared state is unusable
    #[error("State error: {0}")]
    State(String),
}

/// Convenience result type for converter operations.
pub type ConverterResult<T> = Result<T, ConverterError>;

impl ConverterError {
    pub fn decode<T: Into<String>>(msg: T) -> Self {
        Self::Decode(msg.into())
    }

    pub fn encode<T: Into<String>>(msg: T) -> Self {
        Self::Encode(msg.into())
    }

    pub fn format<T: Into<String>>(msg: T) -> Self {
        Self::Format(msg.into())
    }

    pub fn processing<T: Into<String>>(msg: T) -> Self {
        Self::Processing(msg.into())
    }

    /// Whether this is a per-item codec failure rather than a batch-level one.
    pub fn is_item_failure(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::Encode(_))
    }
}

impl ValidationError {
    pub fn settings(msg: impl Into<String>) -> Self {
        Self::Settings(msg.into())
    }
}

impl From<io::Error> for ConverterError {
    fn from(err: io::Error) -> Self {
        Self::IO(err.to_string())
    }
}

impl From<tokio::task::JoinError> for ConverterError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Processing(format!("Conversion task failed: {err}"))
    }
}

impl<T> From<PoisonError<T>> for ConverterError {
    fn from(_: PoisonError<T>) -> Self {
        Self::State("Batch configuration lock is poisoned".to_string())
    }
}
