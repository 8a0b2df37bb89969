//! Payload encoding and delivery of extracted blocks.
//!
//! An extraction is published either as a single payload holding every block or
//! as one payload per record. Payloads go to a [`Sink`]; consumers decode them
//! back with [`decode_blocks`] and [`flatten`].

mod file;

pub use file::{write_local, JsonLinesSink};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Block, PayloadMode, Record};

/// Destination for encoded payloads.
pub trait Sink {
    /// Deliver one payload and return its message id.
    fn publish(&mut self, payload: &[u8]) -> Result<String>;
}

/// Outcome of publishing one extraction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishSummary {
    /// Blocks in the extraction.
    pub blocks: usize,
    /// Records published.
    pub messages: usize,
}

/// Encode blocks as payloads for the given mode.
pub fn encode_payloads(blocks: &[Block], mode: PayloadMode) -> Result<Vec<Vec<u8>>> {
    match mode {
        PayloadMode::PerExtraction => Ok(vec![serde_json::to_vec(blocks)?]),
        PayloadMode::PerRecord => blocks
            .iter()
            .flat_map(Block::iter)
            .map(|record| serde_json::to_vec(record).map_err(Into::into))
            .collect(),
    }
}

/// Encode and publish an extraction.
///
/// Nothing is published for an extraction without blocks.
pub fn publish_extraction<S: Sink + ?Sized>(
    sink: &mut S,
    blocks: &[Block],
    mode: PayloadMode,
) -> Result<PublishSummary> {
    let summary = PublishSummary {
        blocks: blocks.len(),
        messages: blocks.iter().map(Block::len).sum(),
    };
    if blocks.is_empty() {
        debug!("No blocks to publish");
        return Ok(summary);
    }

    for payload in encode_payloads(blocks, mode)? {
        let message_id = sink.publish(&payload)?;
        debug!("Published {} bytes, message id {}", payload.len(), message_id);
    }

    info!(
        "Published {} block(s), {} record(s) ({:?})",
        summary.blocks, summary.messages, mode
    );
    Ok(summary)
}

/// Decode a per-extraction payload into blocks.
pub fn decode_blocks(payload: &[u8]) -> Result<Vec<Block>> {
    Ok(serde_json::from_slice(payload)?)
}

/// Flatten blocks into a single record list, preserving order.
pub fn flatten(blocks: Vec<Block>) -> Vec<Record> {
    blocks.into_iter().flat_map(|block| block.records).collect()
}

/// Sink that keeps payloads in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    pub payloads: Vec<Vec<u8>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for MemorySink {
    fn publish(&mut self, payload: &[u8]) -> Result<String> {
        self.payloads.push(payload.to_vec());
        Ok(self.payloads.len().to_string())
    }
}
