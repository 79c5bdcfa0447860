//! Frame sampling demo using the synthetic test-pattern provider.
//!
//! Acquires a stream, samples frames for a few seconds, switches cameras,
//! and tears down. Run with: cargo run --example sampling_demo

use camkit_media::{Facing, MediaCapture, NullVideoSink, TestPatternProvider};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let capture = MediaCapture::new(Arc::new(TestPatternProvider));
    capture.bind(Arc::new(NullVideoSink::new()));

    if !capture.acquire(Facing::Front).await {
        eprintln!("no camera stream available");
        return;
    }

    capture.start_sampling(Arc::new(|payload: String| {
        println!("sampled frame: {} base64 bytes", payload.len());
    }));

    tokio::time::sleep(Duration::from_secs(2)).await;

    if capture.switch_facing().await {
        println!("switched to {} camera", capture.facing());
    }

    tokio::time::sleep(Duration::from_secs(2)).await;

    capture.release();
    let stats = capture.stats();
    println!(
        "done: {} samples, {} skipped ticks",
        stats.samples_emitted, stats.ticks_skipped
    );
}
