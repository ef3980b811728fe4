//! The sample-to-message signal path:
//! 1. Estimate the noise floor over fixed 100 µs windows
//! 2. Correlate the 16-slot Mode S preamble pattern
//! 3. Demodulate pulse-position bit pairs after each preamble
//! 4. Hand candidate frames to the protocol validator

use thiserror::Error;

pub mod demod;
pub mod detect;
pub mod noise;

pub use demod::{demodulate, Demodulated};
pub use detect::{preamble_match, DecodeStats, Decoder, ScanOutcome};
pub use noise::noise_floor;

/// Fatal input errors for a decode pass. Candidate-level failures
/// (no preamble, truncated demodulation, validator rejection) are
/// ordinary scan outcomes, not errors.
#[derive(Debug, Error, PartialEq)]
pub enum DecodeError {
    #[error("amplitude buffer is empty")]
    EmptyBuffer,

    #[error("sample rate {0} does not yield a usable noise window")]
    InvalidSampleRate(f64),

    #[error("buffer of {len} samples is shorter than one noise window of {window}")]
    BufferTooShort { len: usize, window: usize },
}
