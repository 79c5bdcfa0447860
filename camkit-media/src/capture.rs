//! Camera capture lifecycle management
//!
//! [`MediaCapture`] owns one capture session at a time: it acquires a camera
//! stream from the injected provider, binds it to the output sink, drives
//! the periodic frame sampler, and tears everything down on release or
//! camera switch.

use crate::config::CaptureConfig;
use crate::device::{CameraStream, StreamConstraints, StreamProvider};
use crate::frame::{Facing, Resolution};
use crate::sampler::{FrameConsumer, FrameSampler, SamplerStats};
use crate::sink::VideoSink;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Capture lifecycle events
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// A stream was acquired and attached
    Acquired {
        /// Camera facing of the new stream
        facing: Facing,
        /// Native resolution of the new stream
        resolution: Resolution,
    },
    /// The stream was released and detached
    Released,
    /// The session switched to the other physical camera
    FacingSwitched {
        /// Facing now in use
        facing: Facing,
    },
    /// Frame sampling started
    SamplerStarted,
    /// Frame sampling stopped
    SamplerStopped,
    /// A sample tick failed to encode its frame
    SampleEncodingFailed {
        /// Failure reason
        reason: String,
    },
}

/// Mutable capture session state, shared with the sampler task
pub(crate) struct Session {
    pub(crate) stream: Option<Arc<dyn CameraStream>>,
    pub(crate) sink: Option<Arc<dyn VideoSink>>,
    pub(crate) active: bool,
    pub(crate) facing: Facing,
    pub(crate) acquiring: bool,
    pub(crate) sampler: Option<FrameSampler>,
    pub(crate) consumer: Option<FrameConsumer>,
    pub(crate) stats: SamplerStats,
}

impl Session {
    fn new() -> Self {
        Self {
            stream: None,
            sink: None,
            active: false,
            facing: Facing::Front,
            acquiring: false,
            sampler: None,
            consumer: None,
            stats: SamplerStats::default(),
        }
    }
}

/// Camera capture manager
///
/// Cloning yields another handle to the same session; the acquisition guard
/// keeps overlapping `acquire` calls from racing each other.
#[derive(Clone)]
pub struct MediaCapture {
    provider: Arc<dyn StreamProvider>,
    config: CaptureConfig,
    session: Arc<Mutex<Session>>,
    event_tx: broadcast::Sender<CaptureEvent>,
}

impl MediaCapture {
    /// Create a capture manager with the default configuration
    pub fn new(provider: Arc<dyn StreamProvider>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            provider,
            config: CaptureConfig::default(),
            session: Arc::new(Mutex::new(Session::new())),
            event_tx,
        }
    }

    /// Create a capture manager with a custom configuration
    pub fn with_config(
        provider: Arc<dyn StreamProvider>,
        config: CaptureConfig,
    ) -> crate::error::MediaResult<Self> {
        config.validate()?;
        let mut capture = Self::new(provider);
        capture.config = config;
        Ok(capture)
    }

    /// Record the output sink for stream attachment
    ///
    /// Binding is independent of the stream lifecycle: a sink bound once is
    /// reused across stream restarts. A sink bound while a stream is already
    /// live is attached and shown immediately.
    pub fn bind(&self, sink: Arc<dyn VideoSink>) {
        let stream = {
            let mut session = self.session.lock();
            session.sink = Some(sink.clone());
            session.stream.clone()
        };

        if let Some(stream) = stream {
            sink.attach(stream);
            sink.show();
            debug!("output sink bound and attached to live stream");
        } else {
            debug!("output sink bound");
        }
    }

    /// Acquire a camera stream with the given facing
    ///
    /// On success any previously held stream is fully released first, the
    /// new stream is attached to the bound sink, and the session becomes
    /// active. Acquisition failures are logged and reported as `false`;
    /// prior state is left untouched. A call made while another acquisition
    /// is still negotiating is rejected.
    pub async fn acquire(&self, facing: Facing) -> bool {
        {
            let mut session = self.session.lock();
            if session.acquiring {
                warn!(%facing, "stream acquisition already in progress, rejecting");
                return false;
            }
            session.acquiring = true;
        }

        let constraints = StreamConstraints {
            resolution: self.config.resolution,
            facing,
        };

        let stream = match self.provider.acquire(&constraints).await {
            Ok(stream) => stream,
            Err(e) => {
                error!(error = %e, %facing, "error accessing camera");
                self.session.lock().acquiring = false;
                return false;
            }
        };

        // Swap the new stream in; the old stream and its sampler are torn
        // down first, keeping the consumer registration.
        let (old_stream, old_sampler, sink) = {
            let mut session = self.session.lock();
            let old_stream = session.stream.take();
            let old_sampler = if old_stream.is_some() {
                session.sampler.take()
            } else {
                None
            };
            session.stream = Some(stream.clone());
            session.active = true;
            session.facing = facing;
            session.acquiring = false;
            (old_stream, old_sampler, session.sink.clone())
        };

        drop(old_sampler);
        if let Some(old) = old_stream {
            old.stop();
        }

        if let Some(sink) = sink {
            sink.attach(stream.clone());
            sink.show();
        }

        let resolution = stream.resolution();
        info!(%facing, %resolution, "camera stream acquired");
        self.emit(CaptureEvent::Acquired { facing, resolution });
        true
    }

    /// Switch to the opposite camera facing
    ///
    /// Returns `false` without touching state when no stream is active.
    /// Otherwise fully releases the current stream and re-acquires with the
    /// opposite facing; if a frame consumer was registered, sampling resumes
    /// automatically with that consumer.
    pub async fn switch_facing(&self) -> bool {
        let facing = {
            let session = self.session.lock();
            if !session.active || session.acquiring {
                return false;
            }
            session.facing.opposite()
        };

        self.release();
        let success = self.acquire(facing).await;

        if success {
            let consumer = self.session.lock().consumer.clone();
            if let Some(consumer) = consumer {
                self.start_sampling(consumer);
            }
            self.emit(CaptureEvent::FacingSwitched { facing });
        }
        success
    }

    /// Release the held stream and all session resources
    ///
    /// Idempotent: stops the stream's tracks, detaches and hides the bound
    /// sink, cancels the sampler, and marks the session inactive. The
    /// registered consumer is kept so a camera switch can resume sampling.
    pub fn release(&self) {
        let (stream, sampler, sink, had_session) = {
            let mut session = self.session.lock();
            let stream = session.stream.take();
            let sampler = session.sampler.take();
            let had_session = session.active || stream.is_some() || sampler.is_some();
            session.active = false;
            (stream, sampler, session.sink.clone(), had_session)
        };

        if let Some(mut sampler) = sampler {
            sampler.cancel();
            self.emit(CaptureEvent::SamplerStopped);
        }

        if let Some(stream) = stream {
            stream.stop();
        }

        if let Some(sink) = sink {
            sink.detach();
            sink.hide();
        }

        if had_session {
            info!("capture session released");
            self.emit(CaptureEvent::Released);
        }
    }

    /// Register a frame consumer and begin periodic sampling
    ///
    /// Each tick delivers one base64 JPEG payload; ticks where the stream or
    /// sink is absent are skipped silently. Restarting replaces the previous
    /// timer, so at most one sampler runs per session.
    pub fn start_sampling(&self, consumer: FrameConsumer) {
        let previous = {
            let mut session = self.session.lock();
            session.consumer = Some(consumer.clone());
            session.stats = SamplerStats::default();
            session.sampler.take()
        };
        if let Some(mut previous) = previous {
            previous.cancel();
        }

        let sampler = FrameSampler::spawn(
            Arc::clone(&self.session),
            consumer,
            self.config.sample_interval,
            self.config.jpeg_quality,
            self.event_tx.clone(),
        );
        self.session.lock().sampler = Some(sampler);

        debug!(interval = ?self.config.sample_interval, "frame sampling started");
        self.emit(CaptureEvent::SamplerStarted);
    }

    /// Stop periodic sampling
    ///
    /// Idempotent. The consumer registration is kept so that a camera switch
    /// can restart sampling with the same consumer.
    pub fn stop_sampling(&self) {
        let sampler = self.session.lock().sampler.take();
        if let Some(mut sampler) = sampler {
            sampler.cancel();
            debug!("frame sampling stopped");
            self.emit(CaptureEvent::SamplerStopped);
        }
    }

    /// Whether a stream is currently active
    pub fn is_active(&self) -> bool {
        self.session.lock().active
    }

    /// Facing of the current (or most recent) stream
    pub fn facing(&self) -> Facing {
        self.session.lock().facing
    }

    /// Whether a sampler timer is currently running
    pub fn is_sampling(&self) -> bool {
        self.session.lock().sampler.is_some()
    }

    /// Counters for the current sampling run
    pub fn stats(&self) -> SamplerStats {
        self.session.lock().stats.clone()
    }

    /// Capture configuration in use
    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }

    /// Subscribe to capture lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<CaptureEvent> {
        self.event_tx.subscribe()
    }

    fn emit(&self, event: CaptureEvent) {
        let _ = self.event_tx.send(event);
    }
}
