//! Periodic frame sampling
//!
//! A cancellable periodic task that extracts one encoded still image from
//! the live stream per tick and hands it to a caller-supplied consumer.
//! The task handle is owned by [`FrameSampler`], which guarantees
//! cancellation on teardown.

use crate::capture::{CaptureEvent, Session};
use crate::error::{MediaError, MediaResult};
use crate::frame::VideoFrame;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{trace, warn};

/// Frame consumer callback, invoked with one base64 JPEG payload per sample
pub type FrameConsumer = Arc<dyn Fn(String) + Send + Sync>;

/// Counters for the current sampling run
///
/// Reset each time sampling is (re)started.
#[derive(Debug, Default, Clone)]
pub struct SamplerStats {
    /// Samples delivered to the consumer
    pub samples_emitted: u64,
    /// Ticks skipped because stream or sink were absent or the frame was
    /// malformed
    pub ticks_skipped: u64,
    /// Ticks where JPEG encoding failed
    pub encode_failures: u64,
}

/// Owner of the periodic sample task
///
/// Dropping the sampler aborts the task, so no teardown path can leak a
/// running timer.
pub struct FrameSampler {
    handle: JoinHandle<()>,
}

impl FrameSampler {
    pub(crate) fn spawn(
        session: Arc<Mutex<Session>>,
        consumer: FrameConsumer,
        interval: Duration,
        quality: u8,
        event_tx: broadcast::Sender<CaptureEvent>,
    ) -> Self {
        // First tick fires one full interval after start, never immediately.
        // The ticker is anchored here so the schedule starts at registration
        // time, not at the task's first poll.
        let mut ticker = time::interval_at(time::Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let handle = tokio::spawn(async move {
            loop {
                ticker.tick().await;

                // The tick body is synchronous; cancellation lands on the
                // interval await, so a started tick always completes.
                let (stream, sink) = {
                    let session = session.lock();
                    (session.stream.clone(), session.sink.clone())
                };

                let (Some(stream), Some(sink)) = (stream, sink) else {
                    session.lock().stats.ticks_skipped += 1;
                    trace!("sample tick skipped: stream or sink absent");
                    continue;
                };

                if sink.frame_size().is_none() {
                    session.lock().stats.ticks_skipped += 1;
                    trace!("sample tick skipped: sink has no attached source");
                    continue;
                }

                let Some(frame) = stream.latest_frame() else {
                    session.lock().stats.ticks_skipped += 1;
                    trace!("sample tick skipped: no frame available yet");
                    continue;
                };

                match encode_frame(&frame, quality) {
                    Ok(payload) => {
                        consumer(payload);
                        session.lock().stats.samples_emitted += 1;
                    }
                    Err(MediaError::InvalidFrameData { expected, actual }) => {
                        session.lock().stats.ticks_skipped += 1;
                        warn!(expected, actual, "dropping malformed frame");
                    }
                    Err(e) => {
                        session.lock().stats.encode_failures += 1;
                        warn!(error = %e, "frame encoding failed");
                        let _ = event_tx.send(CaptureEvent::SampleEncodingFailed {
                            reason: e.to_string(),
                        });
                    }
                }
            }
        });

        Self { handle }
    }

    /// Cancel the periodic task. Idempotent; no further tick fires after
    /// this returns.
    pub fn cancel(&mut self) {
        self.handle.abort();
    }

    /// Whether the underlying task has terminated
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for FrameSampler {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Encode an RGB24 frame as a JPEG and return the base64 payload
/// (no data-URI prefix).
pub(crate) fn encode_frame(frame: &VideoFrame, quality: u8) -> MediaResult<String> {
    if !frame.is_well_formed() {
        return Err(MediaError::InvalidFrameData {
            expected: frame.resolution().byte_len(),
            actual: frame.data.len(),
        });
    }

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode(&frame.data, frame.width, frame.height, ExtendedColorType::Rgb8)
        .map_err(|e| MediaError::EncodingFailed {
            reason: e.to_string(),
        })?;

    Ok(STANDARD.encode(&jpeg))
}
