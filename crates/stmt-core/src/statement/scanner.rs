//! Block scanner: the row-by-row state machine that segments a sheet into blocks.
//!
//! A statement sheet holds one or more tables, each opened by a header row whose
//! first cell is the header marker and closed by a row with a blank first cell.
//! Between tables the scanner tolerates a few unrelated rows; once too many of them
//! follow each other it assumes the data is over and stops.

use tracing::trace;

use crate::models::config::ScannerConfig;
use crate::models::{Cell, Row};

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Looking for the first header row.
    #[default]
    SearchingHeader,
    /// Inside a block; rows are data until a blank first cell.
    ReadingData,
    /// A block just ended; counting non-header rows until the next header.
    SearchingNextHeader { noise_rows: usize },
}

/// Classification of a row, based on its first cell only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    /// First cell is missing or blank.
    Blank,
    /// First cell equals the header marker.
    Marker,
    /// Any other first cell.
    Other,
}

/// What the extractor should do with the row that caused a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    /// Ignore the row.
    Skip,
    /// Capture the row as a header and open an empty block.
    StartBlock,
    /// Build a record from the row and append it to the open block.
    AppendRecord,
    /// Emit the open block if it has records, then drop its header.
    EndBlock,
    /// The row was noise between blocks.
    CountNoise,
    /// Too many noise rows in a row; stop scanning the sheet.
    Stop,
}

/// Pure transition function: `(state, row class)` to `(next state, action)`.
pub fn transition(state: ScanState, class: RowClass, max_noise_rows: usize) -> (ScanState, ScanAction) {
    match (state, class) {
        (ScanState::SearchingHeader, RowClass::Marker) => (ScanState::ReadingData, ScanAction::StartBlock),
        (ScanState::SearchingHeader, _) => (ScanState::SearchingHeader, ScanAction::Skip),

        (ScanState::ReadingData, RowClass::Blank) => (
            ScanState::SearchingNextHeader { noise_rows: 0 },
            ScanAction::EndBlock,
        ),
        (ScanState::ReadingData, _) => (ScanState::ReadingData, ScanAction::AppendRecord),

        (ScanState::SearchingNextHeader { .. }, RowClass::Marker) => {
            (ScanState::ReadingData, ScanAction::StartBlock)
        }
        (ScanState::SearchingNextHeader { noise_rows }, _) => {
            let noise_rows = noise_rows + 1;
            let action = if noise_rows >= max_noise_rows {
                ScanAction::Stop
            } else {
                ScanAction::CountNoise
            };
            (ScanState::SearchingNextHeader { noise_rows }, action)
        }
    }
}

/// Stateful driver around [`transition`].
#[derive(Debug, Clone)]
pub struct BlockScanner {
    marker: String,
    max_noise_rows: usize,
    state: ScanState,
}

impl BlockScanner {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            marker: config.header_marker.trim().to_lowercase(),
            max_noise_rows: config.max_noise_rows,
            state: ScanState::SearchingHeader,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Classify a row by its first cell, case-folded and trimmed.
    ///
    /// Only a missing cell, an empty cell or whitespace text is blank. Typed values
    /// are always present, so a first cell of numeric `0` or `FALSE` is a data row
    /// and keeps the block open; a truthiness test would end the block there.
    pub fn classify(&self, row: &Row) -> RowClass {
        match row.first() {
            None | Some(Cell::Empty) => RowClass::Blank,
            Some(Cell::Text(s)) => {
                let first = s.trim().to_lowercase();
                if first.is_empty() {
                    RowClass::Blank
                } else if first == self.marker {
                    RowClass::Marker
                } else {
                    RowClass::Other
                }
            }
            Some(_) => RowClass::Other,
        }
    }

    /// Advance over one row and return the action to take for it.
    pub fn step(&mut self, row: &Row) -> ScanAction {
        let class = self.classify(row);
        let (next, action) = transition(self.state, class, self.max_noise_rows);
        trace!("scanner {:?} --{:?}--> {:?} ({:?})", self.state, class, next, action);
        self.state = next;
        action
    }

    /// Whether rows ran out while a block was still open.
    pub fn in_block(&self) -> bool {
        self.state == ScanState::ReadingData
    }

    /// Return to the initial state.
    pub fn reset(&mut self) {
        self.state = ScanState::SearchingHeader;
    }
}

impl Default for BlockScanner {
    fn default() -> Self {
        Self::new(&ScannerConfig::default())
    }
}
