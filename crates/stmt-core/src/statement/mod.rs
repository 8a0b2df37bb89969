//! Statement extraction: block scanning, field normalization and row identity.

mod extractor;
pub mod identity;
pub mod rules;
pub mod scanner;

pub use extractor::{build_record, Extraction, StatementExtractor};
pub use identity::{compute_id, fingerprint};
pub use rules::{AmountOutcome, DateOutcome, FieldNormalizer};
pub use scanner::{BlockScanner, RowClass, ScanAction, ScanState};

use crate::models::{Block, Sheet};

/// Trait for statement parsers.
pub trait StatementParser {
    /// Segment `sheet` into blocks of records stamped with `account`.
    fn parse(&self, sheet: &Sheet, account: &str) -> Vec<Block>;
}
