//! Timing tests for the periodic frame sampler
//!
//! Runs against a paused tokio clock so each 500 ms tick is driven
//! explicitly with `tokio::time::advance`.

mod common;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use camkit_media::{CaptureConfig, Facing, FrameConsumer, MediaCapture, Resolution};
use common::{FakeProvider, FakeSink};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

const TICK: Duration = Duration::from_millis(500);

fn small_config() -> CaptureConfig {
    CaptureConfig {
        resolution: Resolution::new(64, 48),
        ..CaptureConfig::default()
    }
}

fn collector() -> (FrameConsumer, Arc<Mutex<Vec<String>>>) {
    let samples = Arc::new(Mutex::new(Vec::new()));
    let store = Arc::clone(&samples);
    let consumer: FrameConsumer = Arc::new(move |payload: String| {
        store.lock().push(payload);
    });
    (consumer, samples)
}

/// Let woken tasks run their tick bodies
async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}

async fn active_capture(provider: Arc<FakeProvider>, sink: Arc<FakeSink>) -> MediaCapture {
    let capture = MediaCapture::with_config(provider, small_config()).unwrap();
    capture.bind(sink);
    assert!(capture.acquire(Facing::Front).await);
    capture
}

#[tokio::test(start_paused = true)]
async fn test_stop_before_first_tick_produces_no_samples() {
    let capture = active_capture(Arc::new(FakeProvider::new()), Arc::new(FakeSink::new())).await;
    let (consumer, samples) = collector();

    capture.start_sampling(consumer);
    tokio::time::advance(TICK - Duration::from_millis(1)).await;
    settle().await;
    capture.stop_sampling();

    tokio::time::advance(TICK * 4).await;
    settle().await;
    assert!(samples.lock().is_empty());
    assert!(!capture.is_sampling());
}

#[tokio::test(start_paused = true)]
async fn test_one_sample_per_tick() {
    let capture = active_capture(Arc::new(FakeProvider::new()), Arc::new(FakeSink::new())).await;
    let (consumer, samples) = collector();

    capture.start_sampling(consumer);
    tokio::time::advance(TICK).await;
    settle().await;
    assert_eq!(samples.lock().len(), 1);

    tokio::time::advance(TICK).await;
    settle().await;
    assert_eq!(samples.lock().len(), 2);

    // Payloads are bare base64 JPEG, no data-URI prefix.
    for payload in samples.lock().iter() {
        assert!(!payload.is_empty());
        assert!(!payload.starts_with("data:"));
        let jpeg = STANDARD.decode(payload).unwrap();
        assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    }

    assert_eq!(capture.stats().samples_emitted, 2);
}

#[tokio::test(start_paused = true)]
async fn test_ticks_skip_until_stream_exists() {
    let provider = Arc::new(FakeProvider::new());
    let sink = Arc::new(FakeSink::new());
    let capture = MediaCapture::with_config(provider.clone(), small_config()).unwrap();
    capture.bind(sink);
    let (consumer, samples) = collector();

    // Sampling before any stream exists: ticks are skipped, not errors.
    capture.start_sampling(consumer);
    tokio::time::advance(TICK).await;
    settle().await;
    tokio::time::advance(TICK).await;
    settle().await;
    assert!(samples.lock().is_empty());
    assert!(capture.stats().ticks_skipped >= 2);

    // Once a stream arrives the same timer starts emitting.
    assert!(capture.acquire(Facing::Front).await);
    tokio::time::advance(TICK).await;
    settle().await;
    assert_eq!(samples.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_restart_replaces_previous_timer() {
    let capture = active_capture(Arc::new(FakeProvider::new()), Arc::new(FakeSink::new())).await;
    let (first_consumer, first_samples) = collector();
    let (second_consumer, second_samples) = collector();

    capture.start_sampling(first_consumer);
    capture.start_sampling(second_consumer);

    tokio::time::advance(TICK).await;
    settle().await;

    assert!(first_samples.lock().is_empty());
    assert_eq!(second_samples.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_release_stops_sampling() {
    let capture = active_capture(Arc::new(FakeProvider::new()), Arc::new(FakeSink::new())).await;
    let (consumer, samples) = collector();

    capture.start_sampling(consumer);
    tokio::time::advance(TICK).await;
    settle().await;
    assert_eq!(samples.lock().len(), 1);

    capture.release();
    assert!(!capture.is_sampling());

    tokio::time::advance(TICK * 4).await;
    settle().await;
    assert_eq!(samples.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_switch_facing_resumes_sampling_with_same_consumer() {
    let provider = Arc::new(FakeProvider::new());
    let capture = active_capture(provider.clone(), Arc::new(FakeSink::new())).await;
    let (consumer, samples) = collector();

    capture.start_sampling(consumer);
    tokio::time::advance(TICK).await;
    settle().await;
    assert_eq!(samples.lock().len(), 1);

    assert!(capture.switch_facing().await);
    assert!(capture.is_sampling());

    tokio::time::advance(TICK).await;
    settle().await;
    assert_eq!(samples.lock().len(), 2);
    assert_eq!(provider.requests(), vec![Facing::Front, Facing::Back]);
}

#[tokio::test(start_paused = true)]
async fn test_stop_sampling_keeps_consumer_for_switch() {
    let capture = active_capture(Arc::new(FakeProvider::new()), Arc::new(FakeSink::new())).await;
    let (consumer, samples) = collector();

    capture.start_sampling(consumer);
    capture.stop_sampling();
    assert!(!capture.is_sampling());

    // The registration survives, so a camera switch resumes sampling.
    assert!(capture.switch_facing().await);
    assert!(capture.is_sampling());

    tokio::time::advance(TICK).await;
    settle().await;
    assert_eq!(samples.lock().len(), 1);
}
