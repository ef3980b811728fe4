//! Configuration: env-driven application settings and the protocol
//! constants handed to the decode pipeline.

use std::path::PathBuf;

/// Samples per microsecond divisor (1 µs slot base).
pub const MICROSECOND: f64 = 1e6;

/// Noise window span in microseconds (100 µs per averaging window).
pub const NOISE_WINDOW_MICROS: usize = 100;

/// The preamble is 8 µs with 0.5 µs slots = 16 amplitude slots.
pub const PREAMBLE_SAMPLES: usize = 16;

/// Extended squitter payload length in bits (short frames stop early).
pub const DATA_BITS: usize = 112;

/// Pulse-position modulation: one bit per 1 µs pair of samples.
pub const SAMPLES_PER_BIT: usize = 2;

/// Data block span following the preamble, one spare pair included
/// so a full-length frame is always followed by a terminating pair.
pub const DATA_SAMPLES: usize = (DATA_BITS + 1) * SAMPLES_PER_BIT;

/// Smallest buffer span that can hold a complete message.
pub const MESSAGE_SAMPLES: usize = PREAMBLE_SAMPLES + DATA_SAMPLES;

/// Fixed Mode S preamble reference pattern: pulses at 0, 1, 3.5 and
/// 4.5 µs, quiet everywhere else.
pub const PREAMBLE: [f64; PREAMBLE_SAMPLES] = [
    1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];

/// Decode pipeline tuning, immutable for the lifetime of a decoder.
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Input sample rate in samples per second.
    pub sample_rate: f64,

    /// Reference amplitude pattern the preamble correlator matches against.
    pub preamble: [f64; PREAMBLE_SAMPLES],

    /// Per-slot amplitude tolerance between a candidate and the reference.
    pub preamble_tolerance: f64,

    /// Multiplier applied to the noise floor to derive the minimum
    /// signal amplitude (3.162 = 10 dB SNR).
    pub snr_factor: f64,

    /// Fraction of the data block's peak amplitude below which a sample
    /// pair is read as end-of-message.
    pub eom_factor: f64,

    /// Sanity cap on the noise floor against abnormally flat input.
    pub noise_floor_ceiling: f64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            sample_rate: 2_000_000.0, // 2 MSPS (required for Mode S timing)
            preamble: PREAMBLE,
            preamble_tolerance: 0.8,
            snr_factor: 3.162,
            eom_factor: 0.25,
            noise_floor_ceiling: 1e6,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the capture file to replay
    pub capture_path: PathBuf,

    /// Sample rate of the capture in samples per second
    pub sample_rate: f64,

    /// Samples per chunk fed into the decode pipeline
    pub chunk_samples: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            capture_path: std::env::var("CAPTURE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("capture.txt")),

            sample_rate: std::env::var("SAMPLE_RATE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2_000_000.0),

            chunk_samples: std::env::var("CHUNK_SAMPLES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(128 * 1024),
        }
    }

    /// Pipeline configuration for this capture's sample rate
    pub fn decoder(&self) -> DecoderConfig {
        DecoderConfig {
            sample_rate: self.sample_rate,
            ..DecoderConfig::default()
        }
    }
}
