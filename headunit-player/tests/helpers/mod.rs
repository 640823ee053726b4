//! Shared test helpers: WAV fixture synthesis and event waiting
#![allow(dead_code)]

use headunit_common::events::PlayerEvent;
use headunit_player::PlayerSession;
use std::f32::consts::TAU;
use std::path::Path;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedReceiver;

pub const SAMPLE_RATE: u32 = 44_100;

/// Write a mono 16-bit sine-tone WAV of the given duration
pub fn write_sine_wav(path: &Path, duration_ms: u64) {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(path, spec).expect("create wav");
    let total_samples = SAMPLE_RATE as u64 * duration_ms / 1000;
    for n in 0..total_samples {
        let t = n as f32 / SAMPLE_RATE as f32;
        let sample = (t * 440.0 * TAU).sin();
        writer
            .write_sample((sample * i16::MAX as f32 * 0.5) as i16)
            .expect("write sample");
    }
    writer.finalize().expect("finalize wav");
}

/// Register a fresh event subscriber against the session
pub fn subscribe(session: &PlayerSession) -> UnboundedReceiver<PlayerEvent> {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
    session.register_callback(tx);
    rx
}

/// Await the next event, failing the test after five seconds
pub async fn next_event(rx: &mut UnboundedReceiver<PlayerEvent>) -> PlayerEvent {
    tokio::time::timeout(Duration::from_secs(5), rx.recv())
        .await
        .expect("timed out waiting for event")
        .expect("event channel closed")
}

/// Await an event of the given type, skipping others
pub async fn next_event_of(
    rx: &mut UnboundedReceiver<PlayerEvent>,
    event_type: &str,
) -> PlayerEvent {
    loop {
        let event = next_event(rx).await;
        if event.event_type() == event_type {
            return event;
        }
    }
}

/// Poll `predicate` until it holds, failing the test after five seconds
pub async fn wait_until(mut predicate: impl FnMut() -> bool) {
    for _ in 0..250 {
        if predicate() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("timed out waiting for condition");
}
