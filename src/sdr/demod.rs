//! Pulse-position demodulation
//!
//! Each bit occupies a 1 µs pair of samples; the bit value is carried by
//! which half holds the pulse. Comparing the two halves of each pair
//! (instead of testing against an absolute level) keeps demodulation
//! robust to slow gain drift across one message.

use crate::config::SAMPLES_PER_BIT;

/// Result of demodulating one candidate data block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Demodulated {
    /// Decoded bits, possibly fewer than a full frame. A short sequence
    /// means the signal dropped below the end-of-message threshold.
    pub bits: Vec<u8>,

    /// Samples consumed from the data block, for the scan cursor jump.
    pub consumed: usize,
}

/// Demodulate the data block that follows a confirmed preamble.
///
/// A pair with both halves below `peak * eom_factor` ends the message,
/// as does running out of complete pairs; neither is an error.
pub fn demodulate(data: &[f64], eom_factor: f64) -> Demodulated {
    let peak = data.iter().copied().fold(0.0_f64, f64::max);
    let threshold = peak * eom_factor;

    let mut bits = Vec::with_capacity(data.len() / SAMPLES_PER_BIT);
    let mut consumed = 0;

    while consumed + SAMPLES_PER_BIT <= data.len() {
        let first = data[consumed];
        let second = data[consumed + 1];

        if first < threshold && second < threshold {
            break;
        }

        bits.push(u8::from(first >= second));
        consumed += SAMPLES_PER_BIT;
    }

    Demodulated { bits, consumed }
}
