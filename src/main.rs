//! ADS-B capture replay decoder
//!
//! Loads a complex-sample capture, feeds it chunk by chunk through the
//! Mode S decode pipeline, and writes validated messages as JSON lines.

use std::sync::atomic::Ordering;
use std::thread;

use anyhow::{Context, Result};
use crossbeam_channel::bounded;
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use adsb_decode::adsb::DecodedMessage;
use adsb_decode::capture;
use adsb_decode::config::Config;
use adsb_decode::pipeline::DecodePipeline;
use adsb_decode::sink::{JsonLinesSink, MessageSink};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("===========================================");
    info!("   ADS-B Decode - capture replay");
    info!("===========================================");

    let config = Config::from_env();
    info!("Configuration:");
    info!("  Capture path: {:?}", config.capture_path);
    info!("  Sample rate: {} MSPS", config.sample_rate / 1_000_000.0);
    info!("  Chunk size: {} samples", config.chunk_samples);

    let samples = capture::load(&config.capture_path)
        .with_context(|| format!("failed to load capture {:?}", config.capture_path))?;
    info!("Loaded {} samples", samples.len());

    // Producer thread: replay the capture as bounded chunks
    let (chunk_tx, chunk_rx) = bounded(8);
    let chunk_samples = config.chunk_samples;
    let producer = thread::Builder::new()
        .name("replay".to_string())
        .spawn(move || {
            for chunk in samples.chunks(chunk_samples) {
                if chunk_tx.send(chunk.to_vec()).is_err() {
                    break;
                }
            }
        })
        .context("Failed to spawn replay thread")?;

    let pipeline = DecodePipeline::new(config.decoder());
    let message_rx = pipeline.start(chunk_rx)?;

    // Async sink task: JSON lines on stdout
    let (sink_tx, mut sink_rx) = mpsc::channel::<DecodedMessage>(1000);
    let sink_handle = tokio::spawn(async move {
        let mut sink = JsonLinesSink::stdout();
        while let Some(message) = sink_rx.recv().await {
            if let Err(e) = sink.publish(&message) {
                warn!("Failed to publish message: {e}");
            }
        }
    });

    // Forward decoded messages until the pipeline drains. The crossbeam
    // receiver blocks, so the drain runs off the async executor.
    let forward = tokio::task::spawn_blocking(move || {
        let mut accepted = 0u64;
        while let Ok(message) = message_rx.recv() {
            accepted += 1;
            info!(
                ">>> DF={:02} *{};",
                message.downlink_format, message.hex
            );
            if sink_tx.blocking_send(message).is_err() {
                warn!("Sink task stopped, ending replay");
                break;
            }
        }
        accepted
    });

    // The decode thread drops its sender when the replay ends, which
    // disconnects the drain loop above.
    let accepted = forward.await?;
    pipeline.stop();
    let _ = sink_handle.await;
    let _ = producer.join();

    let stats = pipeline.stats();
    info!(
        "Replay complete: {} messages accepted | {} preambles | {} CRC failures | {} rejected | {} samples scanned",
        accepted,
        stats.preambles_detected.load(Ordering::Relaxed),
        stats.crc_failures.load(Ordering::Relaxed),
        stats.candidates_rejected.load(Ordering::Relaxed),
        stats.samples_scanned.load(Ordering::Relaxed),
    );

    Ok(())
}
