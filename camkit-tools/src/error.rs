//! Info-service client error types

use thiserror::Error;

/// Main error type for info-service requests
#[derive(Error, Debug)]
pub enum ToolsError {
    /// The service answered with a non-success HTTP status
    #[error("request to {url} failed with HTTP status {status}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The request could not be completed (connection, timeout, protocol)
    #[error("request failed: {source}")]
    Request {
        /// Underlying transport error
        #[from]
        source: reqwest::Error,
    },

    /// The response body could not be decoded
    #[error("invalid response payload: {reason}")]
    InvalidResponse {
        /// Decode failure reason
        reason: String,
    },
}

/// Result type alias for info-service requests
pub type ToolsResult<T> = Result<T, ToolsError>;
