//! Offline capture files: complex baseband samples persisted one per
//! line as `real,imag`, the reproducible fixture format for replay.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use num_complex::Complex;
use thiserror::Error;

/// One complex baseband sample (in-phase / quadrature pair).
pub type IqSample = Complex<f64>;

/// Capture file errors
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("capture I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed sample on line {line}: {text:?}")]
    Malformed { line: usize, text: String },
}

/// Convert complex samples to the amplitude buffer the decoder scans.
pub fn magnitudes(samples: &[IqSample]) -> Vec<f64> {
    samples.iter().map(|s| s.norm()).collect()
}

/// Parse one `real,imag` line. Returns `None` on anything else.
pub fn parse_sample(text: &str) -> Option<IqSample> {
    let (re, im) = text.split_once(',')?;
    Some(Complex::new(
        re.trim().parse().ok()?,
        im.trim().parse().ok()?,
    ))
}

/// Load a capture file. Blank lines are skipped; any other unparsable
/// line fails the load.
pub fn load(path: &Path) -> Result<Vec<IqSample>, CaptureError> {
    let reader = BufReader::new(File::open(path)?);
    let mut samples = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let sample = parse_sample(text).ok_or_else(|| CaptureError::Malformed {
            line: idx + 1,
            text: text.to_string(),
        })?;
        samples.push(sample);
    }

    Ok(samples)
}

/// Write samples in the same `real,imag` per line format.
pub fn save(path: &Path, samples: &[IqSample]) -> Result<(), CaptureError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for sample in samples {
        writeln!(writer, "{},{}", sample.re, sample.im)?;
    }
    writer.flush()?;
    Ok(())
}
