//! Spreadsheet reading module.

mod reader;

pub use reader::{cell_from_data, range_to_sheet, WorkbookReader};

use crate::error::WorkbookError;
use crate::models::Sheet;

/// Spreadsheet extensions the reader accepts.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "xla", "xlam", "ods"];

/// Result type for workbook operations.
pub type Result<T> = std::result::Result<T, WorkbookError>;

/// Trait for anything that can hand out materialized sheets.
pub trait SheetSource {
    /// Names of all sheets in workbook order.
    fn sheet_names(&self) -> Vec<String>;

    /// Materialize a sheet by name, or the first sheet when `name` is `None`.
    fn sheet(&mut self, name: Option<&str>) -> Result<Sheet>;
}

/// Resolve which sheet to read.
pub fn select_sheet(names: &[String], requested: Option<&str>) -> Result<String> {
    match requested {
        Some(name) => names
            .iter()
            .find(|n| n.as_str() == name)
            .cloned()
            .ok_or_else(|| WorkbookError::SheetNotFound(name.to_string())),
        None => names.first().cloned().ok_or(WorkbookError::NoSheets),
    }
}

/// Whether `ext` names a readable spreadsheet format (case-insensitive).
pub fn is_supported_extension(ext: &str) -> bool {
    let ext = ext.to_ascii_lowercase();
    SUPPORTED_EXTENSIONS.contains(&ext.as_str())
}

/// In-memory sheet source, mostly useful for tests and callers that build rows themselves.
#[derive(Debug, Clone, Default)]
pub struct MemoryWorkbook {
    sheets: Vec<Sheet>,
}

impl MemoryWorkbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }
}

impl SheetSource for MemoryWorkbook {
    fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    fn sheet(&mut self, name: Option<&str>) -> Result<Sheet> {
        let selected = select_sheet(&self.sheet_names(), name)?;
        self.sheets
            .iter()
            .find(|s| s.name == selected)
            .cloned()
            .ok_or(WorkbookError::SheetNotFound(selected))
    }
}
