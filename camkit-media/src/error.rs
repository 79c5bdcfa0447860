//! Capture error types and handling
//!
//! This module defines all error types used throughout the media capture
//! library, providing clear error messages and context for debugging and
//! error handling.

use thiserror::Error;

/// Main error type for media capture operations
#[derive(Error, Debug)]
pub enum MediaError {
    /// Stream acquisition failed (device denied, unavailable, or any
    /// platform error during negotiation)
    #[error("Stream acquisition failed: {reason}")]
    Acquisition {
        /// Failure reason
        reason: String,
    },

    /// No capture device matched the requested facing
    #[error("No capture device for facing {facing}")]
    DeviceNotFound {
        /// Requested camera facing
        facing: String,
    },

    /// Permission to access the capture device was denied
    #[error("Permission denied: {operation}")]
    PermissionDenied {
        /// Operation that was denied
        operation: String,
    },

    /// Invalid configuration provided
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration {
        /// Error message
        message: String,
    },

    /// Frame encoding failed
    #[error("Frame encoding failed: {reason}")]
    EncodingFailed {
        /// Failure reason
        reason: String,
    },

    /// Frame data does not match its declared dimensions
    #[error("Invalid frame data: expected {expected} bytes, got {actual}")]
    InvalidFrameData {
        /// Expected data size
        expected: usize,
        /// Actual data size
        actual: usize,
    },
}

/// Result type alias for media capture operations
pub type MediaResult<T> = Result<T, MediaError>;

impl MediaError {
    /// Check if error is recoverable by retrying the operation
    pub fn is_recoverable(&self) -> bool {
        match self {
            MediaError::Acquisition { .. } => true,
            MediaError::DeviceNotFound { .. } => true,
            MediaError::PermissionDenied { .. } => false,
            MediaError::InvalidConfiguration { .. } => false,
            MediaError::EncodingFailed { .. } => false,
            MediaError::InvalidFrameData { .. } => false,
        }
    }
}
