//! Noise floor estimation
//!
//! The buffer is cut into fixed windows of 100 µs worth of samples and
//! the floor is the mean of the quietest complete window. Taking the
//! minimum biases the estimate toward the calmest stretch of the
//! capture, which is what a fixed-threshold correlator needs in bursty
//! RF noise.

use crate::config::{DecoderConfig, MICROSECOND, NOISE_WINDOW_MICROS};
use crate::sdr::DecodeError;

/// Estimate the noise floor amplitude of a capture buffer.
///
/// The result is capped at the configured ceiling. Fails on an empty
/// buffer, a degenerate sample rate, or a buffer shorter than one
/// complete window; a trailing partial window is discarded.
pub fn noise_floor(amplitudes: &[f64], config: &DecoderConfig) -> Result<f64, DecodeError> {
    if amplitudes.is_empty() {
        return Err(DecodeError::EmptyBuffer);
    }

    if config.sample_rate <= 0.0 {
        return Err(DecodeError::InvalidSampleRate(config.sample_rate));
    }

    let window = (config.sample_rate / MICROSECOND) as usize * NOISE_WINDOW_MICROS;
    if window == 0 {
        return Err(DecodeError::InvalidSampleRate(config.sample_rate));
    }

    if amplitudes.len() < window {
        return Err(DecodeError::BufferTooShort {
            len: amplitudes.len(),
            window,
        });
    }

    let floor = amplitudes
        .chunks_exact(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .fold(f64::INFINITY, f64::min);

    Ok(floor.min(config.noise_floor_ceiling))
}
