//! Mode S / ADS-B sample-to-message decoder.
//!
//! Turns a stream of 1090 MHz complex baseband samples into validated
//! squitter frames:
//! 1. Convert IQ samples to amplitude magnitudes
//! 2. Estimate the noise floor (quietest 100 µs window)
//! 3. Correlate the fixed 16-slot preamble pattern
//! 4. Demodulate pulse-position bit pairs
//! 5. Validate downlink format, length and CRC-24
//!
//! Acquisition of samples and publishing of messages stay outside the
//! crate; see [`capture`] for the replay fixture format and [`sink`]
//! for the outbound seam.

pub mod adsb;
pub mod capture;
pub mod config;
pub mod pipeline;
pub mod sdr;
pub mod sink;

pub use adsb::{DecodedMessage, DownlinkFormat};
pub use capture::IqSample;
pub use config::{Config, DecoderConfig};
pub use pipeline::{DecodePipeline, StreamDecoder};
pub use sdr::{DecodeError, DecodeStats, Decoder};
