//! Streaming decode pipeline
//!
//! Buffers arrive as chunks from whatever produces samples (a replay
//! thread here, a radio front-end elsewhere). Each pass scans the
//! carried-forward tail plus the new chunk, so messages straddling a
//! chunk boundary are still recovered. One producer, one consumer, no
//! locks: the decoder owns its buffer for the duration of a pass.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, error, info};

use crate::adsb::DecodedMessage;
use crate::capture::IqSample;
use crate::config::DecoderConfig;
use crate::sdr::{DecodeError, DecodeStats, Decoder};

/// Default bound on in-flight decoded messages.
const MESSAGE_CHANNEL_CAPACITY: usize = 1000;

/// Chunk-at-a-time decoder that carries the leftover buffer tail
/// between passes.
pub struct StreamDecoder {
    decoder: Decoder,
    tail: Vec<f64>,
}

impl StreamDecoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self::with_stats(config, DecodeStats::new())
    }

    pub fn with_stats(config: DecoderConfig, stats: Arc<DecodeStats>) -> Self {
        Self {
            decoder: Decoder::with_stats(config, stats),
            tail: Vec::new(),
        }
    }

    /// Feed one chunk of complex samples; returns the messages the
    /// combined tail + chunk buffer produced.
    pub fn push(&mut self, chunk: &[IqSample]) -> Result<Vec<DecodedMessage>, DecodeError> {
        self.tail.extend(chunk.iter().map(|s| s.norm()));
        self.run_pass()
    }

    /// Same as [`push`](Self::push) for already-converted amplitudes.
    pub fn push_amplitudes(&mut self, amplitudes: &[f64]) -> Result<Vec<DecodedMessage>, DecodeError> {
        self.tail.extend_from_slice(amplitudes);
        self.run_pass()
    }

    /// Samples retained for the next pass.
    pub fn tail_len(&self) -> usize {
        self.tail.len()
    }

    fn run_pass(&mut self) -> Result<Vec<DecodedMessage>, DecodeError> {
        let outcome = self.decoder.scan(&self.tail)?;
        self.tail.drain(..outcome.cursor);
        Ok(outcome.messages)
    }
}

/// Pipeline controller: spawns the decode thread and hands back the
/// message receiver.
pub struct DecodePipeline {
    config: DecoderConfig,
    running: Arc<AtomicBool>,
    stats: Arc<DecodeStats>,
}

impl DecodePipeline {
    pub fn new(config: DecoderConfig) -> Self {
        Self {
            config,
            running: Arc::new(AtomicBool::new(false)),
            stats: DecodeStats::new(),
        }
    }

    /// Start decoding chunks from `chunk_rx`; decoded messages appear
    /// on the returned channel. The thread exits when the chunk channel
    /// disconnects or [`stop`](Self::stop) is called.
    pub fn start(&self, chunk_rx: Receiver<Vec<IqSample>>) -> Result<Receiver<DecodedMessage>> {
        self.start_with_capacity(chunk_rx, MESSAGE_CHANNEL_CAPACITY)
    }

    /// [`start`](Self::start) with an explicit message channel capacity.
    /// The decode thread blocks when the channel fills, so a slow
    /// consumer throttles the pass instead of losing messages.
    pub fn start_with_capacity(
        &self,
        chunk_rx: Receiver<Vec<IqSample>>,
        capacity: usize,
    ) -> Result<Receiver<DecodedMessage>> {
        let (message_tx, message_rx) = bounded::<DecodedMessage>(capacity);

        let config = self.config.clone();
        let running = self.running.clone();
        let stats = self.stats.clone();

        running.store(true, Ordering::SeqCst);

        thread::Builder::new()
            .name("decode".to_string())
            .spawn(move || {
                let result = run_decode(config, &running, stats, chunk_rx, message_tx);
                // The flag must clear on every exit path, or a caller
                // polling is_running() waits on a dead thread.
                running.store(false, Ordering::SeqCst);
                if let Err(e) = result {
                    error!("Decode pipeline error: {e}");
                }
            })
            .context("Failed to spawn decode thread")?;

        Ok(message_rx)
    }

    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn stats(&self) -> &Arc<DecodeStats> {
        &self.stats
    }
}

/// Decode loop (runs in the dedicated thread)
fn run_decode(
    config: DecoderConfig,
    running: &AtomicBool,
    stats: Arc<DecodeStats>,
    chunk_rx: Receiver<Vec<IqSample>>,
    message_tx: Sender<DecodedMessage>,
) -> Result<()> {
    let mut stream = StreamDecoder::with_stats(config, stats.clone());
    let mut last_stats_time = Instant::now();

    'decode: while running.load(Ordering::SeqCst) {
        match chunk_rx.recv_timeout(Duration::from_millis(100)) {
            Ok(chunk) => {
                let messages = stream.push(&chunk)?;

                for message in messages {
                    debug!(
                        ">>> DF={:02} *{};",
                        message.downlink_format, message.hex
                    );
                    // A full channel is backpressure, not a reason to
                    // drop a validated message.
                    if message_tx.send(message).is_err() {
                        debug!("Message channel disconnected, stopping decode");
                        break 'decode;
                    }
                }

                if last_stats_time.elapsed() >= Duration::from_secs(5) {
                    info!(
                        "[Decode] Samples: {} | Preambles: {} | Accepted: {} | CRC failures: {} | Rejected: {} | Empty: {}",
                        stats.samples_scanned.load(Ordering::Relaxed),
                        stats.preambles_detected.load(Ordering::Relaxed),
                        stats.messages_accepted.load(Ordering::Relaxed),
                        stats.crc_failures.load(Ordering::Relaxed),
                        stats.candidates_rejected.load(Ordering::Relaxed),
                        stats.empty_candidates.load(Ordering::Relaxed),
                    );
                    last_stats_time = Instant::now();
                }
            }
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    info!(
        "Decode loop finished. Samples: {}, preambles: {}, accepted: {}, empty candidates: {}, tail retained: {}",
        stats.samples_scanned.load(Ordering::Relaxed),
        stats.preambles_detected.load(Ordering::Relaxed),
        stats.messages_accepted.load(Ordering::Relaxed),
        stats.empty_candidates.load(Ordering::Relaxed),
        stream.tail_len(),
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MESSAGE_SAMPLES, PREAMBLE, PREAMBLE_SAMPLES};

    fn hex_to_bits(hex: &str) -> Vec<u8> {
        hex::decode(hex)
            .unwrap()
            .iter()
            .flat_map(|byte| (0..8).rev().map(move |k| (byte >> k) & 1))
            .collect()
    }

    fn embed_message(hex: &str, at: usize, len: usize) -> Vec<f64> {
        let mut buffer = vec![0.0; len];
        buffer[at..at + PREAMBLE_SAMPLES].copy_from_slice(&PREAMBLE);
        let mut pos = at + PREAMBLE_SAMPLES;
        for bit in hex_to_bits(hex) {
            if bit == 1 {
                buffer[pos] = 1.0;
            } else {
                buffer[pos + 1] = 1.0;
            }
            pos += 2;
        }
        buffer
    }

    #[test]
    fn test_message_straddling_chunk_boundary() {
        let hex = "5D4840D6A0B1C2";
        let buffer = embed_message(hex, 300, 1000);

        // Split in the middle of the embedded message
        let mut stream = StreamDecoder::new(DecoderConfig::default());
        let first = stream.push_amplitudes(&buffer[..350]).unwrap();
        assert!(first.is_empty());
        assert!(stream.tail_len() > 0);

        let second = stream.push_amplitudes(&buffer[350..]).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(second[0].hex, hex);
        assert_eq!(second[0].downlink_format, 11);
    }

    #[test]
    fn test_sub_message_chunks_accumulate() {
        let mut stream = StreamDecoder::new(DecoderConfig::default());
        // Chunks shorter than one message never error, they accumulate
        for _ in 0..4 {
            let messages = stream.push_amplitudes(&[0.0; 100]).unwrap();
            assert!(messages.is_empty());
        }
        // A silent scan always leaves one message-length of tail behind
        assert_eq!(stream.tail_len(), MESSAGE_SAMPLES - 1);
    }

    #[test]
    fn test_pipeline_decodes_chunked_capture() {
        let hex = "8D4840D6202CC371C32CE0576098";
        let buffer = embed_message(hex, 500, 4000);
        let samples: Vec<IqSample> = buffer.iter().map(|&a| IqSample::new(a, 0.0)).collect();

        let (chunk_tx, chunk_rx) = bounded(8);
        let pipeline = DecodePipeline::new(DecoderConfig::default());
        let message_rx = pipeline.start(chunk_rx).unwrap();

        for chunk in samples.chunks(700) {
            chunk_tx.send(chunk.to_vec()).unwrap();
        }
        drop(chunk_tx);

        let message = message_rx
            .recv_timeout(Duration::from_secs(5))
            .expect("pipeline should produce one message");
        assert_eq!(message.hex, hex);
        assert_eq!(message.downlink_format, 17);
        assert!(message_rx.recv_timeout(Duration::from_millis(200)).is_err());
    }

    #[test]
    fn test_running_flag_clears_after_decode_error() {
        // At 3 MSPS the noise window (300 samples) exceeds one message
        // span, so a 250-sample buffer reaches the estimator and fails
        // the pass
        let config = DecoderConfig {
            sample_rate: 3_000_000.0,
            ..DecoderConfig::default()
        };

        let (chunk_tx, chunk_rx) = bounded(1);
        let pipeline = DecodePipeline::new(config);
        let message_rx = pipeline.start(chunk_rx).unwrap();

        chunk_tx
            .send(vec![IqSample::new(0.0, 0.0); 250])
            .unwrap();

        // The decode thread dies on the error and drops its sender
        assert!(message_rx.recv_timeout(Duration::from_secs(2)).is_err());

        let deadline = Instant::now() + Duration::from_secs(2);
        while pipeline.is_running() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        assert!(
            !pipeline.is_running(),
            "decode thread exit must clear the running flag"
        );
    }

    #[test]
    fn test_slow_consumer_does_not_lose_messages() {
        let short = "20001122AB7542";
        let long = "8D4840D6202CC371C32CE0576098";
        let mut buffer = embed_message(short, 250, 1500);
        let second = embed_message(long, 700, 1500);
        for (dst, src) in buffer.iter_mut().zip(second) {
            *dst = dst.max(src);
        }
        let samples: Vec<IqSample> = buffer.iter().map(|&a| IqSample::new(a, 0.0)).collect();

        let (chunk_tx, chunk_rx) = bounded(1);
        let pipeline = DecodePipeline::new(DecoderConfig::default());
        // Capacity 1: the second message blocks until the first is read
        let message_rx = pipeline.start_with_capacity(chunk_rx, 1).unwrap();

        chunk_tx.send(samples).unwrap();
        drop(chunk_tx);

        // Leave the decode thread parked on the full channel for a while
        thread::sleep(Duration::from_millis(300));

        let first = message_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        let next = message_rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(first.hex, short);
        assert_eq!(next.hex, long);
        assert!(message_rx.recv_timeout(Duration::from_millis(200)).is_err());
    }
}
