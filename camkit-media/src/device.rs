//! Capture device capability interfaces
//!
//! Device access is injected through the [`StreamProvider`] trait so the
//! capture manager never touches platform APIs directly. This keeps the
//! lifecycle logic testable with substitute providers and lets backends be
//! added incrementally.

use crate::error::MediaResult;
use crate::frame::{Facing, Resolution, VideoFrame};
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Constraints for a stream acquisition request
#[derive(Debug, Clone, Copy)]
pub struct StreamConstraints {
    /// Requested resolution
    pub resolution: Resolution,
    /// Requested camera facing
    pub facing: Facing,
}

/// An active device media stream
///
/// Handles are shared between the capture manager and the sampler task;
/// implementations must tolerate `latest_frame` being polled after `stop`.
pub trait CameraStream: Send + Sync {
    /// Current visual frame of the stream, if the device has produced one
    fn latest_frame(&self) -> Option<VideoFrame>;

    /// Native dimensions of the stream
    fn resolution(&self) -> Resolution;

    /// Stop all underlying tracks. Idempotent.
    fn stop(&self);

    /// Whether the stream is still delivering frames
    fn is_live(&self) -> bool;
}

/// Device stream acquisition collaborator
///
/// `acquire` suspends until the platform resolves or rejects the request;
/// no timeout is imposed here.
#[async_trait]
pub trait StreamProvider: Send + Sync {
    /// Request a video stream matching the given constraints
    async fn acquire(&self, constraints: &StreamConstraints) -> MediaResult<Arc<dyn CameraStream>>;
}

/// Synthetic stream provider producing a moving gradient pattern
///
/// Stands in for real hardware in demos, headless deployments, and tests.
#[derive(Debug, Default)]
pub struct TestPatternProvider;

#[async_trait]
impl StreamProvider for TestPatternProvider {
    async fn acquire(&self, constraints: &StreamConstraints) -> MediaResult<Arc<dyn CameraStream>> {
        Ok(Arc::new(TestPatternStream {
            resolution: constraints.resolution,
            facing: constraints.facing,
            live: AtomicBool::new(true),
            sequence: AtomicU64::new(0),
        }))
    }
}

/// Stream handle produced by [`TestPatternProvider`]
pub struct TestPatternStream {
    resolution: Resolution,
    facing: Facing,
    live: AtomicBool,
    sequence: AtomicU64,
}

impl TestPatternStream {
    /// Facing this pattern stream was requested with
    pub fn facing(&self) -> Facing {
        self.facing
    }
}

impl CameraStream for TestPatternStream {
    fn latest_frame(&self) -> Option<VideoFrame> {
        if !self.live.load(Ordering::Acquire) {
            return None;
        }

        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let Resolution { width, height } = self.resolution;
        let mut data = Vec::with_capacity(self.resolution.byte_len());
        for y in 0..height {
            for x in 0..width {
                data.push((x.wrapping_add(seq as u32)) as u8);
                data.push(y as u8);
                data.push((x ^ y) as u8);
            }
        }

        let timestamp_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        Some(VideoFrame {
            width,
            height,
            data,
            timestamp_ms,
        })
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn stop(&self) {
        self.live.store(false, Ordering::Release);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}
