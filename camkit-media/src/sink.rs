//! Output sink capability interface
//!
//! The visual surface a live stream is attached to for display. The sink is
//! a reference the capture manager borrows, not owns: a binding survives
//! stream restarts such as a camera switch.

use crate::device::CameraStream;
use crate::frame::Resolution;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Visual output sink collaborator
pub trait VideoSink: Send + Sync {
    /// Set the sink's source to the given stream
    fn attach(&self, stream: Arc<dyn CameraStream>);

    /// Clear the sink's source
    fn detach(&self);

    /// Make the sink visible
    fn show(&self);

    /// Hide the sink
    fn hide(&self);

    /// Native width/height of the currently attached stream's frames,
    /// `None` when nothing is attached
    fn frame_size(&self) -> Option<Resolution>;
}

/// Headless sink that tracks attachment and visibility but renders nowhere
///
/// The fallback implementation for sampling-only deployments and tests,
/// in the role a software renderer plays for display-capable builds.
#[derive(Default)]
pub struct NullVideoSink {
    attached: Mutex<Option<Arc<dyn CameraStream>>>,
    visible: AtomicBool,
}

impl NullVideoSink {
    /// Create a detached, hidden sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a stream is currently attached
    pub fn is_attached(&self) -> bool {
        self.attached.lock().is_some()
    }

    /// Whether the sink is currently shown
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }
}

impl VideoSink for NullVideoSink {
    fn attach(&self, stream: Arc<dyn CameraStream>) {
        *self.attached.lock() = Some(stream);
    }

    fn detach(&self) {
        self.attached.lock().take();
    }

    fn show(&self) {
        self.visible.store(true, Ordering::Release);
    }

    fn hide(&self) {
        self.visible.store(false, Ordering::Release);
    }

    fn frame_size(&self) -> Option<Resolution> {
        self.attached.lock().as_ref().map(|s| s.resolution())
    }
}
