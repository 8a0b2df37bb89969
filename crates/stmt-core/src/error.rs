//! Error types for the stmt-core library.

use thiserror::Error;

/// Main error type for the stmt library.
#[derive(Error, Debug)]
pub enum StmtError {
    /// The spreadsheet document could not be opened or read.
    #[error("workbook error: {0}")]
    Workbook(#[from] WorkbookError),

    /// The account for an extraction could not be resolved.
    #[error("account error: {0}")]
    Account(#[from] AccountError),

    /// A payload could not be encoded or decoded.
    #[error("payload error: {0}")]
    Payload(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors raised while opening a workbook and materializing a sheet.
#[derive(Error, Debug)]
pub enum WorkbookError {
    /// The document could not be opened or its container is corrupt.
    #[error("failed to open workbook: {0}")]
    Open(String),

    /// The file extension is not a spreadsheet format we can read.
    #[error("unsupported spreadsheet format: {0}")]
    UnsupportedFormat(String),

    /// The workbook has no worksheets.
    #[error("workbook has no sheets")]
    NoSheets,

    /// The requested sheet name does not exist.
    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    /// The sheet exists but its cells could not be read.
    #[error("failed to read sheet {sheet}: {reason}")]
    Read { sheet: String, reason: String },
}

/// Errors raised while routing an uploaded object to an account.
#[derive(Error, Debug)]
pub enum AccountError {
    /// The object path has no folder segment.
    #[error("object path is empty")]
    EmptyPath,

    /// The folder is not mapped to any account.
    #[error("invalid folder name: {0}")]
    UnknownFolder(String),
}

/// Result type for the stmt library.
pub type Result<T> = std::result::Result<T, StmtError>;
