//! # camkit Tools
//!
//! Thin HTTP clients for the local info service backing the assistant:
//! next calendar appointment, current weather, and stock quotes. Each call
//! is a single GET; errors carry the HTTP status or underlying cause and
//! are left to the caller to handle.

#![warn(clippy::all)]

pub mod client;
pub mod error;

// Re-export main types
pub use client::{StockQuote, ToolsClient, WeatherReport, DEFAULT_BASE_URL};
pub use error::{ToolsError, ToolsResult};
