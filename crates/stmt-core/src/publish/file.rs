//! File-backed sinks.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use super::Sink;
use crate::error::Result;
use crate::models::Block;

/// Write a whole extraction as pretty-printed JSON (local mode).
pub fn write_local(blocks: &[Block], path: &Path) -> Result<usize> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, blocks)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    let records = blocks.iter().map(Block::len).sum();
    info!("Local mode: {} record(s) saved to {}", records, path.display());
    Ok(records)
}

/// Sink writing one payload per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    lines: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, lines: 0 }
    }

    /// Flush and return the underlying writer.
    pub fn into_inner(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> Sink for JsonLinesSink<W> {
    fn publish(&mut self, payload: &[u8]) -> Result<String> {
        self.writer.write_all(payload)?;
        self.writer.write_all(b"\n")?;
        self.lines += 1;
        Ok(self.lines.to_string())
    }
}
