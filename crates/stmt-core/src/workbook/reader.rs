//! Workbook reading using calamine.

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, trace};

use super::{is_supported_extension, select_sheet, Result, SheetSource};
use crate::error::WorkbookError;
use crate::models::{Cell, Row, Sheet};

/// Spreadsheet reader over any calamine-supported format.
pub struct WorkbookReader<RS> {
    workbook: Sheets<RS>,
}

impl WorkbookReader<BufReader<File>> {
    /// Open a workbook file, choosing the format from its extension.
    pub fn open(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();
        if !is_supported_extension(ext) {
            return Err(WorkbookError::UnsupportedFormat(path.display().to_string()));
        }

        let workbook = open_workbook_auto(path)
            .map_err(|e| WorkbookError::Open(format!("{}: {}", path.display(), e)))?;
        debug!("Opened workbook {}", path.display());
        Ok(Self { workbook })
    }
}

impl WorkbookReader<Cursor<Vec<u8>>> {
    /// Open a workbook held in memory. The format is detected from the content.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        if data.is_empty() {
            return Err(WorkbookError::Open("empty document".to_string()));
        }
        let workbook = open_workbook_auto_from_rs(Cursor::new(data))
            .map_err(|e| WorkbookError::Open(e.to_string()))?;
        Ok(Self { workbook })
    }
}

impl<RS: Read + Seek> SheetSource for WorkbookReader<RS> {
    fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names()
    }

    fn sheet(&mut self, name: Option<&str>) -> Result<Sheet> {
        let selected = select_sheet(&self.sheet_names(), name)?;
        let range = self
            .workbook
            .worksheet_range(&selected)
            .map_err(|e| WorkbookError::Read {
                sheet: selected.clone(),
                reason: e.to_string(),
            })?;
        Ok(range_to_sheet(&selected, &range))
    }
}

/// Materialize a calamine range as a sheet anchored at A1.
///
/// Calamine ranges start at the first used cell; leading rows and columns are
/// padded with empty cells so that row 0 is row 1 and column 0 is column A.
pub fn range_to_sheet(name: &str, range: &Range<Data>) -> Sheet {
    let (row_offset, col_offset) = match range.start() {
        Some((row, col)) if !range.is_empty() => (row as usize, col as usize),
        _ => return Sheet::new(name, Vec::new()),
    };

    let mut rows = Vec::with_capacity(row_offset + range.height());
    rows.extend((0..row_offset).map(|_| Row::default()));
    for data in range.rows() {
        let mut cells = vec![Cell::Empty; col_offset];
        cells.extend(data.iter().map(cell_from_data));
        rows.push(Row::new(cells));
    }

    trace!(
        "Sheet '{}': {} rows, offset ({}, {})",
        name,
        rows.len(),
        row_offset,
        col_offset
    );
    Sheet::new(name, rows)
}

/// Convert one calamine value into a cell. Error cells read as empty.
pub fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::Bool(b) => Cell::Bool(*b),
        // durations (elapsed time) are not calendar dates
        Data::DateTime(dt) if dt.is_duration() => Cell::Number(dt.as_f64()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Cell::Date)
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
