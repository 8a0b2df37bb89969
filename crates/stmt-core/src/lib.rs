//! Core library for spreadsheet statement extraction.
//!
//! This crate provides:
//! - Spreadsheet reading (xlsx, xlsm, xlsb, xls, ods) into in-memory sheets
//! - Block scanning of repeated "header + rows" sections
//! - Date and currency normalization for Brazilian-formatted statements
//! - Deterministic row ids for idempotent re-ingestion
//! - Payload encoding, sinks and account routing

pub mod account;
pub mod error;
pub mod models;
pub mod publish;
pub mod statement;
pub mod workbook;

pub use account::AccountRouter;
pub use error::{AccountError, Result, StmtError, WorkbookError};
pub use models::{
    Block, Cell, FieldValue, Header, PayloadMode, Record, Row, Sheet, StmtConfig, ACCOUNT_KEY,
    ID_KEY,
};
pub use publish::{
    decode_blocks, encode_payloads, flatten, publish_extraction, write_local, JsonLinesSink,
    MemorySink, PublishSummary, Sink,
};
pub use statement::{
    compute_id, fingerprint, BlockScanner, Extraction, FieldNormalizer, StatementExtractor,
    StatementParser,
};
pub use workbook::{MemoryWorkbook, SheetSource, WorkbookReader};
