//! Native camera backend built on nokhwa
//!
//! The capture device runs on a dedicated thread that owns the camera
//! handle and publishes decoded RGB frames into shared state; the stream
//! handle handed back to the manager only reads that state. Acquisition
//! resolves once the device has opened (or failed to open) its stream.

use crate::device::{CameraStream, StreamConstraints, StreamProvider};
use crate::error::{MediaError, MediaResult};
use crate::frame::{Facing, Resolution, VideoFrame};
use async_trait::async_trait;
use nokhwa::pixel_format::RgbFormat;
use nokhwa::utils::{
    ApiBackend, CameraFormat, CameraIndex, FrameFormat, RequestedFormat, RequestedFormatType,
    Resolution as NokhwaResolution,
};
use nokhwa::Camera;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Stream provider backed by the platform camera stack
#[derive(Debug, Default)]
pub struct NativeStreamProvider;

impl NativeStreamProvider {
    /// Create a provider using the platform's native capture API
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl StreamProvider for NativeStreamProvider {
    async fn acquire(&self, constraints: &StreamConstraints) -> MediaResult<Arc<dyn CameraStream>> {
        let constraints = *constraints;
        let shared = Arc::new(NativeShared {
            frame: Mutex::new(None),
            live: AtomicBool::new(true),
        });

        let (ready_tx, ready_rx) = oneshot::channel();
        let thread_shared = Arc::clone(&shared);
        std::thread::Builder::new()
            .name("camkit-capture".into())
            .spawn(move || capture_loop(constraints, thread_shared, ready_tx))
            .map_err(|e| MediaError::Acquisition {
                reason: format!("failed to spawn capture thread: {}", e),
            })?;

        match ready_rx.await {
            Ok(Ok(resolution)) => Ok(Arc::new(NativeCameraStream { shared, resolution })),
            Ok(Err(e)) => Err(e),
            Err(_) => Err(MediaError::Acquisition {
                reason: "capture thread exited before the device was ready".to_string(),
            }),
        }
    }
}

struct NativeShared {
    frame: Mutex<Option<VideoFrame>>,
    live: AtomicBool,
}

/// Stream handle over a native capture device
pub struct NativeCameraStream {
    shared: Arc<NativeShared>,
    resolution: Resolution,
}

impl CameraStream for NativeCameraStream {
    fn latest_frame(&self) -> Option<VideoFrame> {
        self.shared.frame.lock().clone()
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn stop(&self) {
        self.shared.live.store(false, Ordering::Release);
    }

    fn is_live(&self) -> bool {
        self.shared.live.load(Ordering::Acquire)
    }
}

fn select_device(facing: Facing) -> MediaResult<CameraIndex> {
    let cameras = nokhwa::query(ApiBackend::Auto).map_err(|e| MediaError::Acquisition {
        reason: format!("device enumeration failed: {}", e),
    })?;

    if cameras.is_empty() {
        return Err(MediaError::DeviceNotFound {
            facing: facing.to_string(),
        });
    }

    // Prefer a device whose name declares the requested facing; otherwise
    // assume front = first device, back = second.
    let keyword = match facing {
        Facing::Front => "front",
        Facing::Back => "back",
    };
    if let Some(info) = cameras
        .iter()
        .find(|c| c.human_name().to_lowercase().contains(keyword))
    {
        debug!(device = %info.human_name(), %facing, "matched camera by name");
        return Ok(info.index().clone());
    }

    let fallback = match facing {
        Facing::Front => 0,
        Facing::Back => 1.min(cameras.len() - 1),
    };
    debug!(device = %cameras[fallback].human_name(), %facing, "using fallback camera index");
    Ok(cameras[fallback].index().clone())
}

fn capture_loop(
    constraints: StreamConstraints,
    shared: Arc<NativeShared>,
    ready_tx: oneshot::Sender<MediaResult<Resolution>>,
) {
    let index = match select_device(constraints.facing) {
        Ok(index) => index,
        Err(e) => {
            let _ = ready_tx.send(Err(e));
            return;
        }
    };

    let requested = RequestedFormat::new::<RgbFormat>(RequestedFormatType::Closest(
        CameraFormat::new(
            NokhwaResolution::new(constraints.resolution.width, constraints.resolution.height),
            FrameFormat::MJPEG,
            30,
        ),
    ));

    let mut camera = match Camera::new(index, requested) {
        Ok(camera) => camera,
        Err(e) => {
            let _ = ready_tx.send(Err(MediaError::Acquisition {
                reason: format!("failed to open device: {}", e),
            }));
            return;
        }
    };

    if let Err(e) = camera.open_stream() {
        let _ = ready_tx.send(Err(MediaError::Acquisition {
            reason: format!("failed to open stream: {}", e),
        }));
        return;
    }

    let native = camera.resolution();
    let resolution = Resolution::new(native.width_x, native.height_y);
    info!(%resolution, facing = %constraints.facing, "native camera stream open");
    let _ = ready_tx.send(Ok(resolution));

    while shared.live.load(Ordering::Acquire) {
        match camera.frame() {
            Ok(buffer) => match buffer.decode_image::<RgbFormat>() {
                Ok(decoded) => {
                    let (width, height) = decoded.dimensions();
                    let frame = VideoFrame {
                        width,
                        height,
                        data: decoded.into_raw(),
                        timestamp_ms: now_ms(),
                    };
                    *shared.frame.lock() = Some(frame);
                }
                Err(e) => warn!(error = %e, "frame decode failed"),
            },
            Err(e) => {
                warn!(error = %e, "frame capture failed");
                std::thread::sleep(Duration::from_millis(50));
            }
        }
    }

    if let Err(e) = camera.stop_stream() {
        warn!(error = %e, "failed to stop native stream");
    }
    debug!("native capture thread exited");
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
