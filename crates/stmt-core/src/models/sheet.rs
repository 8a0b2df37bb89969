//! In-memory sheet representation handed to the extraction engine.

use std::fmt;

use chrono::NaiveDateTime;

/// A single typed cell value as read from a spreadsheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Blank cell (also used for spreadsheet error cells).
    #[default]
    Empty,
    /// Text cell.
    Text(String),
    /// Numeric cell (integers are widened to f64).
    Number(f64),
    /// Boolean cell.
    Bool(bool),
    /// Date or date-time cell.
    Date(NaiveDateTime),
}

impl Cell {
    /// Build a text cell.
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Returns true for blank cells and text cells containing only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Borrow the text of a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(true) => f.write_str("TRUE"),
            Cell::Bool(false) => f.write_str("FALSE"),
            Cell::Date(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Cell::Empty)
    }
}

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    cells: Vec<Cell>,
}

impl Row {
    pub fn new(cells: Vec<Cell>) -> Self {
        Self { cells }
    }

    /// Cell at `index`, or `None` past the end of the row.
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// First cell of the row, if any.
    pub fn first(&self) -> Option<&Cell> {
        self.cells.first()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<C: Into<Cell>> FromIterator<C> for Row {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Row::new(iter.into_iter().map(Into::into).collect())
    }
}

/// An ordered, fully materialized sheet.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Sheet {
    /// Sheet name as found in the workbook (empty for synthetic sheets).
    pub name: String,
    rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Build an unnamed sheet from rows of cell-convertible values.
    ///
    /// ```
    /// use stmt_core::Sheet;
    ///
    /// let sheet = Sheet::from_rows(vec![
    ///     vec![Some("date"), Some("amount")],
    ///     vec![Some("01/01/2024"), None],
    /// ]);
    /// assert_eq!(sheet.rows().len(), 2);
    /// ```
    pub fn from_rows<R, C>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = C>,
        C: Into<Cell>,
    {
        Self {
            name: String::new(),
            rows: rows.into_iter().map(|r| r.into_iter().collect()).collect(),
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
