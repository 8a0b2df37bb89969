//! Statement extractor driving the scanner, normalizers and row identity.

use std::path::Path;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::Result;
use crate::models::config::StmtConfig;
use crate::models::{ACCOUNT_KEY, Block, Cell, FieldValue, Header, ID_KEY, Record, Row, Sheet};
use crate::workbook::{SheetSource, WorkbookReader};

use super::identity::compute_id;
use super::rules::FieldNormalizer;
use super::scanner::{BlockScanner, ScanAction};
use super::StatementParser;

/// Result of extracting one sheet.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    /// Account stamped on every record.
    pub account: String,
    /// Blocks in sheet order.
    pub blocks: Vec<Block>,
    /// Rows visited before the sheet ended or scanning stopped.
    pub rows_scanned: usize,
    /// Whether scanning stopped on the noise-row limit before the last row.
    pub stopped_early: bool,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

impl Extraction {
    /// Total number of records over all blocks.
    pub fn record_count(&self) -> usize {
        self.blocks.iter().map(Block::len).sum()
    }

    /// Block sizes in order.
    pub fn block_sizes(&self) -> Vec<usize> {
        self.blocks.iter().map(Block::len).collect()
    }
}

/// Elapsed-time counter. `std::time::Instant` panics on wasm32, where zero is reported.
struct Stopwatch {
    #[cfg(not(target_arch = "wasm32"))]
    start: Instant,
}

impl Stopwatch {
    fn start() -> Self {
        Self {
            #[cfg(not(target_arch = "wasm32"))]
            start: Instant::now(),
        }
    }

    fn elapsed_ms(&self) -> u64 {
        #[cfg(not(target_arch = "wasm32"))]
        return self.start.elapsed().as_millis() as u64;
        #[cfg(target_arch = "wasm32")]
        return 0;
    }
}

/// A block that is still collecting records.
struct OpenBlock {
    header: Header,
    block: Block,
}

/// Statement extractor with configurable scanner and normalizers.
#[derive(Debug, Clone, Default)]
pub struct StatementExtractor {
    config: StmtConfig,
}

impl StatementExtractor {
    /// Create an extractor with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an extractor from a full configuration.
    pub fn with_config(config: StmtConfig) -> Self {
        Self { config }
    }

    /// Set the noise-row limit between blocks.
    pub fn with_max_noise_rows(mut self, rows: usize) -> Self {
        self.config.scanner.max_noise_rows = rows;
        self
    }

    /// Set the header marker.
    pub fn with_header_marker(mut self, marker: impl Into<String>) -> Self {
        self.config.scanner.header_marker = marker.into();
        self
    }

    /// Set the sheet to read from workbooks.
    pub fn with_sheet(mut self, sheet: Option<String>) -> Self {
        self.config.workbook.sheet = sheet;
        self
    }

    pub fn config(&self) -> &StmtConfig {
        &self.config
    }

    /// Extract blocks from a materialized sheet.
    pub fn extract(&self, sheet: &Sheet, account: &str) -> Extraction {
        let stopwatch = Stopwatch::start();
        let normalizer = FieldNormalizer::new(&self.config.fields);
        let mut scanner = BlockScanner::new(&self.config.scanner);

        let mut blocks = Vec::new();
        let mut open: Option<OpenBlock> = None;
        let mut rows_scanned = 0;
        let mut stopped_early = false;

        for (index, row) in sheet.rows().iter().enumerate() {
            rows_scanned += 1;
            match scanner.step(row) {
                ScanAction::StartBlock => {
                    let header = Header::from_row(row);
                    debug!("Header at row {}: {:?}", index + 1, header.columns());
                    open = Some(OpenBlock {
                        header,
                        block: Block::new(),
                    });
                }
                ScanAction::AppendRecord => {
                    if let Some(open) = open.as_mut() {
                        let record = build_record(row, &open.header, account, &normalizer);
                        open.block.push(record);
                    }
                }
                ScanAction::EndBlock => {
                    if let Some(finished) = open.take() {
                        emit(&mut blocks, finished.block, index + 1);
                    }
                }
                ScanAction::Skip | ScanAction::CountNoise => {}
                ScanAction::Stop => {
                    stopped_early = index + 1 < sheet.rows().len();
                    debug!("Stopped scanning at row {} after too many non-header rows", index + 1);
                    break;
                }
            }
        }

        if scanner.in_block() {
            if let Some(finished) = open.take() {
                emit(&mut blocks, finished.block, rows_scanned);
            }
        }

        let extraction = Extraction {
            account: account.to_string(),
            blocks,
            rows_scanned,
            stopped_early,
            processing_time_ms: stopwatch.elapsed_ms(),
        };

        info!(
            "Extracted {} block(s), {} record(s) from sheet '{}' for account={}",
            extraction.blocks.len(),
            extraction.record_count(),
            sheet.name,
            account
        );

        extraction
    }

    /// Open a spreadsheet file and extract the configured sheet.
    pub fn extract_path(&self, path: &Path, account: &str) -> Result<Extraction> {
        info!("Processing file: {}", path.display());
        let mut reader = WorkbookReader::open(path)?;
        let sheet = reader.sheet(self.config.workbook.sheet.as_deref())?;
        Ok(self.extract(&sheet, account))
    }

    /// Extract the configured sheet from an in-memory spreadsheet.
    pub fn extract_bytes(&self, data: &[u8], account: &str) -> Result<Extraction> {
        let mut reader = WorkbookReader::from_bytes(data.to_vec())?;
        let sheet = reader.sheet(self.config.workbook.sheet.as_deref())?;
        Ok(self.extract(&sheet, account))
    }
}

impl StatementParser for StatementExtractor {
    fn parse(&self, sheet: &Sheet, account: &str) -> Vec<Block> {
        self.extract(sheet, account).blocks
    }
}

fn emit(blocks: &mut Vec<Block>, block: Block, row: usize) {
    if block.is_empty() {
        debug!("Discarding empty block ending at row {}", row);
    } else {
        debug!("Block {} ends at row {} with {} record(s)", blocks.len() + 1, row, block.len());
        blocks.push(block);
    }
}

/// Build one record: zip header columns with cells, normalize, stamp account and id.
pub fn build_record(row: &Row, header: &Header, account: &str, normalizer: &FieldNormalizer) -> Record {
    let mut record = Record::new();
    for (index, column) in header.named() {
        let cell = row.get(index).unwrap_or(&Cell::Empty);
        record.insert(column, normalizer.normalize(column, cell));
    }

    record.insert(ACCOUNT_KEY, FieldValue::Text(account.to_string()));
    let id = compute_id(&record, header, account);
    record.insert(ID_KEY, FieldValue::Text(id));
    record
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn two_block_sheet() -> Sheet {
        Sheet::from_rows(vec![
            vec![Some("date"), Some("amount"), Some("description")],
            vec![Some("01/01/2024"), Some("R$ 1.234,56"), Some("Test 1")],
            vec![Some("02/01/2024"), Some("R$ 2.345,67"), Some("Test 2")],
            vec![None, None, None],
            vec![Some("date"), Some("amount"), Some("description")],
            vec![Some("03/01/2024"), Some("R$ 3.456,78"), Some("Test 3")],
            vec![None, None, None],
        ])
    }

    #[test]
    fn test_two_blocks() {
        let extraction = StatementExtractor::new().extract(&two_block_sheet(), "ITAU_CARD");

        assert_eq!(extraction.block_sizes(), vec![2, 1]);
        assert!(!extraction.stopped_early);

        let first = &extraction.blocks[0].records[0];
        assert_eq!(
            first.get("date"),
            Some(&FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()))
        );
        assert_eq!(
            first.get("amount"),
            Some(&FieldValue::Amount(Decimal::from_str("1234.56").unwrap()))
        );
        assert_eq!(first.get("description"), Some(&FieldValue::Text("Test 1".into())));
        assert_eq!(first.account(), Some("ITAU_CARD"));
        assert_eq!(first.id().map(str::len), Some(32));
        assert_eq!(
            first.keys().collect::<Vec<_>>(),
            vec!["date", "amount", "description", "account", "id"]
        );
    }

    #[test]
    fn test_last_block_flushed_at_end_of_sheet() {
        let sheet = Sheet::from_rows(vec![
            vec![Some("Statement")],
            vec![Some("DATE"), Some("Amount")],
            vec![Some("01/02/2024"), Some("10,00")],
        ]);
        let extraction = StatementExtractor::new().extract(&sheet, "acc");
        assert_eq!(extraction.block_sizes(), vec![1]);
    }

    #[test]
    fn test_empty_blocks_are_discarded() {
        let sheet = Sheet::from_rows(vec![
            vec![Some("date"), Some("amount")],
            vec![None, None],
            vec![Some("date"), Some("amount")],
            vec![Some("01/01/2024"), Some("1,00")],
        ]);
        let extraction = StatementExtractor::new().extract(&sheet, "acc");
        assert_eq!(extraction.block_sizes(), vec![1]);
    }

    #[test]
    fn test_no_header_yields_no_blocks() {
        let sheet = Sheet::from_rows((0..8).map(|i| vec![Some(format!("row {}", i))]));
        let extraction = StatementExtractor::new().extract(&sheet, "acc");
        assert!(extraction.blocks.is_empty());
        assert_eq!(extraction.rows_scanned, 8);
    }

    #[test]
    fn test_noise_limit_truncates_later_blocks() {
        let mut rows: Vec<Vec<Option<String>>> = vec![
            vec![Some("date".into()), Some("amount".into())],
            vec![Some("01/01/2024".into()), Some("1,00".into())],
            vec![None, None],
        ];
        rows.extend((0..6).map(|_| vec![Some("footer".to_string()), None]));
        rows.push(vec![Some("date".into()), Some("amount".into())]);
        rows.push(vec![Some("02/01/2024".into()), Some("2,00".into())]);
        let sheet = Sheet::from_rows(rows);

        let extraction = StatementExtractor::new().extract(&sheet, "acc");
        assert_eq!(extraction.block_sizes(), vec![1]);
        assert!(extraction.stopped_early);

        let relaxed = StatementExtractor::new()
            .with_max_noise_rows(10)
            .extract(&sheet, "acc");
        assert_eq!(relaxed.block_sizes(), vec![1, 1]);
    }

    #[test]
    fn test_row_alignment() {
        let sheet = Sheet::from_rows(vec![
            vec![Some("date"), None, Some("amount")],
            vec![Some("01/01/2024"), Some("ignored"), Some("5,00"), Some("extra")],
            vec![Some("02/01/2024")],
        ]);
        let extraction = StatementExtractor::new().extract(&sheet, "acc");
        let records = &extraction.blocks[0].records;

        assert_eq!(
            records[0].keys().collect::<Vec<_>>(),
            vec!["date", "amount", "account", "id"]
        );
        assert_eq!(
            records[0].get("amount"),
            Some(&FieldValue::Amount(Decimal::from_str("5.00").unwrap()))
        );
        assert_eq!(records[1].get("amount"), Some(&FieldValue::Empty));
    }

    #[test]
    fn test_field_failures_do_not_abort() {
        let sheet = Sheet::from_rows(vec![
            vec![Some("date"), Some("amount")],
            vec![Some("not a date"), Some("not an amount")],
        ]);
        let extraction = StatementExtractor::new().extract(&sheet, "acc");
        let record = &extraction.blocks[0].records[0];

        assert_eq!(record.get("date"), Some(&FieldValue::Text("not a date".into())));
        assert_eq!(record.get("amount"), Some(&FieldValue::Invalid));
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let extractor = StatementExtractor::new();
        let first = serde_json::to_string(&extractor.extract(&two_block_sheet(), "X").blocks).unwrap();
        let second = serde_json::to_string(&extractor.extract(&two_block_sheet(), "X").blocks).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_same_row_same_id_across_blocks() {
        let sheet = Sheet::from_rows(vec![
            vec![Some("date"), Some("amount")],
            vec![Some("01/01/2024"), Some("1,00")],
            vec![None, None],
            vec![Some("date"), Some("amount")],
            vec![Some("01/01/2024"), Some("1,00")],
        ]);
        let extraction = StatementExtractor::new().extract(&sheet, "acc");
        assert_eq!(
            extraction.blocks[0].records[0].id(),
            extraction.blocks[1].records[0].id()
        );
    }
}
