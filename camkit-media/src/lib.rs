//! # camkit Media
//!
//! Camera stream lifecycle and periodic frame sampling. This crate acquires
//! a camera video stream from an injected device provider, binds it to an
//! output sink for display, and periodically samples the current frame as a
//! base64-encoded JPEG for downstream consumers.

#![warn(clippy::all)]

pub mod capture;
pub mod config;
pub mod device;
pub mod error;
pub mod frame;
pub mod sampler;
pub mod sink;

#[cfg(feature = "native")]
pub mod native;

// Re-export main types
pub use capture::{CaptureEvent, MediaCapture};
pub use config::CaptureConfig;
pub use device::{CameraStream, StreamConstraints, StreamProvider, TestPatternProvider};
pub use error::{MediaError, MediaResult};
pub use frame::{Facing, Resolution, VideoFrame};
pub use sampler::{FrameConsumer, FrameSampler, SamplerStats};
pub use sink::{NullVideoSink, VideoSink};

#[cfg(feature = "native")]
pub use native::{NativeCameraStream, NativeStreamProvider};
