//! Preamble detection and the buffer scan loop
//!
//! Mode S preamble at 2 MSPS (0.5 µs per slot):
//! pulses at slots 0, 2, 7, 9 of a 16-slot window.
//!
//! The scan owns the only mutable state in the pipeline: a cursor that
//! advances one sample on a miss and jumps past the consumed data block
//! on any candidate, accepted or not.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, trace};

use crate::adsb::{fields, validate, DecodedMessage, Validation};
use crate::config::{DecoderConfig, DATA_SAMPLES, MESSAGE_SAMPLES, PREAMBLE_SAMPLES};
use crate::sdr::demod::demodulate;
use crate::sdr::noise::noise_floor;
use crate::sdr::DecodeError;

/// Scan counters (atomic for cross-thread reporting)
#[derive(Debug, Default)]
pub struct DecodeStats {
    pub samples_scanned: AtomicU64,
    pub preambles_detected: AtomicU64,
    pub messages_accepted: AtomicU64,
    pub crc_failures: AtomicU64,
    pub candidates_rejected: AtomicU64,
    pub empty_candidates: AtomicU64,
}

impl DecodeStats {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }
}

/// True iff the 16 slots match the reference pattern within the
/// per-slot amplitude tolerance. Any length mismatch is a plain miss.
pub fn preamble_match(slice: &[f64], config: &DecoderConfig) -> bool {
    if slice.len() != PREAMBLE_SAMPLES {
        return false;
    }

    slice
        .iter()
        .zip(config.preamble.iter())
        .all(|(sample, reference)| (sample - reference).abs() <= config.preamble_tolerance)
}

/// Result of one scan pass over an amplitude buffer.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Accepted messages, in buffer order.
    pub messages: Vec<DecodedMessage>,

    /// Final cursor position; samples past it are the leftover tail a
    /// streaming caller carries into the next pass.
    pub cursor: usize,
}

/// Buffer scanner: applies noise-floor gating, preamble correlation,
/// demodulation and validation end to end over one amplitude buffer.
pub struct Decoder {
    config: DecoderConfig,
    stats: Arc<DecodeStats>,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self::with_stats(config, DecodeStats::new())
    }

    pub fn with_stats(config: DecoderConfig, stats: Arc<DecodeStats>) -> Self {
        Self { config, stats }
    }

    pub fn stats(&self) -> &Arc<DecodeStats> {
        &self.stats
    }

    /// Decode one buffer to completion and return the accepted messages.
    pub fn decode(&self, amplitudes: &[f64]) -> Result<Vec<DecodedMessage>, DecodeError> {
        Ok(self.scan(amplitudes)?.messages)
    }

    /// Scan one buffer, also reporting where the pass stopped.
    ///
    /// A buffer too short to hold a single message yields no messages
    /// and a zero cursor, without error. No candidate found during the
    /// scan can fail the pass; only degenerate pass input can.
    pub fn scan(&self, amplitudes: &[f64]) -> Result<ScanOutcome, DecodeError> {
        let len = amplitudes.len();
        if len < MESSAGE_SAMPLES {
            return Ok(ScanOutcome {
                messages: Vec::new(),
                cursor: 0,
            });
        }

        let floor = noise_floor(amplitudes, &self.config)?;
        let min_signal = self.config.snr_factor * floor;
        trace!("noise floor {floor:.6}, minimum signal {min_signal:.6}");

        let mut messages = Vec::new();
        let limit = len - MESSAGE_SAMPLES;
        let mut cursor = 0;

        while cursor <= limit {
            if amplitudes[cursor] < min_signal {
                cursor += 1;
                continue;
            }

            if !preamble_match(&amplitudes[cursor..cursor + PREAMBLE_SAMPLES], &self.config) {
                cursor += 1;
                continue;
            }

            self.stats.preambles_detected.fetch_add(1, Ordering::Relaxed);

            let data_start = cursor + PREAMBLE_SAMPLES;
            let data = &amplitudes[data_start..data_start + DATA_SAMPLES];
            let demodulated = demodulate(data, self.config.eom_factor);

            // Jump past whatever the demodulator consumed, at least one
            // sample forward so the scan always makes progress.
            let next = (data_start + demodulated.consumed).max(cursor + 1);

            if demodulated.bits.is_empty() {
                self.stats.empty_candidates.fetch_add(1, Ordering::Relaxed);
                cursor = next;
                continue;
            }

            let hex = fields::pack_hex(&demodulated.bits);
            match validate(&hex) {
                Validation::Accepted(df) => {
                    debug!("accepted DF{df:02} *{hex}; at sample {cursor}");
                    self.stats.messages_accepted.fetch_add(1, Ordering::Relaxed);
                    messages.push(DecodedMessage {
                        hex,
                        downlink_format: df,
                        timestamp_ms: chrono::Utc::now().timestamp_millis() as u64,
                    });
                }
                Validation::BadChecksum => {
                    trace!("checksum failure *{hex}; at sample {cursor}");
                    self.stats.crc_failures.fetch_add(1, Ordering::Relaxed);
                }
                Validation::Rejected => {
                    trace!("rejected candidate *{hex}; at sample {cursor}");
                    self.stats.candidates_rejected.fetch_add(1, Ordering::Relaxed);
                }
            }

            cursor = next;
        }

        self.stats
            .samples_scanned
            .fetch_add(cursor as u64, Ordering::Relaxed);

        Ok(ScanOutcome { messages, cursor })
    }
}
