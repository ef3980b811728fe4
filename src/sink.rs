//! Message sinks - the seam where decoded messages leave the pipeline.
//!
//! Publishing to a queue or gateway lives behind this trait; the crate
//! itself only ships a JSON-lines writer.

use std::io::{self, Write};

use anyhow::Result;

use crate::adsb::DecodedMessage;

/// Downstream consumer of validated messages.
pub trait MessageSink {
    fn publish(&mut self, message: &DecodedMessage) -> Result<()>;
}

/// Writes one JSON object per message per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl JsonLinesSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> MessageSink for JsonLinesSink<W> {
    fn publish(&mut self, message: &DecodedMessage) -> Result<()> {
        serde_json::to_writer(&mut self.writer, message)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Collecting sink for tests and batch callers.
impl MessageSink for Vec<DecodedMessage> {
    fn publish(&mut self, message: &DecodedMessage) -> Result<()> {
        self.push(message.clone());
        Ok(())
    }
}
