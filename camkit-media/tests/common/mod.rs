//! Shared test fixtures: fake provider, stream, and sink
#![allow(dead_code)]

use async_trait::async_trait;
use camkit_media::{
    CameraStream, Facing, MediaError, MediaResult, Resolution, StreamConstraints, StreamProvider,
    VideoFrame, VideoSink,
};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Stream stub that serves a solid gray frame and counts `stop` calls
pub struct FakeStream {
    resolution: Resolution,
    live: AtomicBool,
    stop_calls: AtomicUsize,
}

impl FakeStream {
    fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            live: AtomicBool::new(true),
            stop_calls: AtomicUsize::new(0),
        }
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::Acquire)
    }
}

impl CameraStream for FakeStream {
    fn latest_frame(&self) -> Option<VideoFrame> {
        if !self.live.load(Ordering::Acquire) {
            return None;
        }
        Some(VideoFrame {
            width: self.resolution.width,
            height: self.resolution.height,
            data: vec![128; self.resolution.byte_len()],
            timestamp_ms: 0,
        })
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn stop(&self) {
        self.live.store(false, Ordering::Release);
        self.stop_calls.fetch_add(1, Ordering::AcqRel);
    }

    fn is_live(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }
}

/// Provider stub that records every request and can be told to fail
#[derive(Default)]
pub struct FakeProvider {
    fail: AtomicBool,
    streams: Mutex<Vec<Arc<FakeStream>>>,
    requests: Mutex<Vec<Facing>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::Release);
    }

    pub fn requests(&self) -> Vec<Facing> {
        self.requests.lock().clone()
    }

    pub fn streams(&self) -> Vec<Arc<FakeStream>> {
        self.streams.lock().clone()
    }
}

#[async_trait]
impl StreamProvider for FakeProvider {
    async fn acquire(&self, constraints: &StreamConstraints) -> MediaResult<Arc<dyn CameraStream>> {
        self.requests.lock().push(constraints.facing);

        if self.fail.load(Ordering::Acquire) {
            return Err(MediaError::Acquisition {
                reason: "device unavailable".to_string(),
            });
        }

        let stream = Arc::new(FakeStream::new(constraints.resolution));
        self.streams.lock().push(Arc::clone(&stream));
        Ok(stream)
    }
}

/// Sink stub that records attachment, visibility, and call counts
#[derive(Default)]
pub struct FakeSink {
    attached: Mutex<Option<Resolution>>,
    visible: AtomicBool,
    attach_calls: AtomicUsize,
    detach_calls: AtomicUsize,
}

impl FakeSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.lock().is_some()
    }

    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }

    pub fn attach_calls(&self) -> usize {
        self.attach_calls.load(Ordering::Acquire)
    }

    pub fn detach_calls(&self) -> usize {
        self.detach_calls.load(Ordering::Acquire)
    }
}

impl VideoSink for FakeSink {
    fn attach(&self, stream: Arc<dyn CameraStream>) {
        *self.attached.lock() = Some(stream.resolution());
        self.attach_calls.fetch_add(1, Ordering::AcqRel);
    }

    fn detach(&self) {
        self.attached.lock().take();
        self.detach_calls.fetch_add(1, Ordering::AcqRel);
    }

    fn show(&self) {
        self.visible.store(true, Ordering::Release);
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::Release);
    }

    fn frame_size(&self) -> Option<Resolution> {
        *self.attached.lock()
    }
}
