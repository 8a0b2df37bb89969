//! Date normalization for statement cells (`DD/MM/YYYY`, `DD/MM/YY` to `YYYY-MM-DD`).

use chrono::NaiveDate;
use regex::Regex;

use super::patterns::{DATE_DMY_LONG, DATE_DMY_SHORT};
use crate::models::Cell;

/// Accepted date layouts, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePattern {
    /// `DD/MM/YYYY`
    DayMonthYear4,
    /// `DD/MM/YY`
    DayMonthYear2,
}

impl DatePattern {
    pub const ORDERED: [DatePattern; 2] = [DatePattern::DayMonthYear4, DatePattern::DayMonthYear2];

    fn regex(self) -> &'static Regex {
        match self {
            DatePattern::DayMonthYear4 => &DATE_DMY_LONG,
            DatePattern::DayMonthYear2 => &DATE_DMY_SHORT,
        }
    }

    /// Parse `s` (already trimmed) against this layout.
    pub fn parse(self, s: &str) -> Option<NaiveDate> {
        let caps = self.regex().captures(s)?;
        let day: u32 = caps[1].parse().ok()?;
        let month: u32 = caps[2].parse().ok()?;
        let year: i32 = match self {
            DatePattern::DayMonthYear4 => caps[3].parse().ok()?,
            DatePattern::DayMonthYear2 => expand_two_digit_year(caps[3].parse().ok()?),
        };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Outcome of [`normalize_date`].
#[derive(Debug, Clone, PartialEq)]
pub enum DateOutcome {
    /// Text matched an accepted layout.
    Parsed(NaiveDate),
    /// Not text, or text that matched no layout. The cell is kept as it was.
    Unchanged(Cell),
}

impl DateOutcome {
    pub fn parsed(&self) -> Option<NaiveDate> {
        match self {
            DateOutcome::Parsed(d) => Some(*d),
            DateOutcome::Unchanged(_) => None,
        }
    }
}

/// Normalize a locale-formatted date cell.
///
/// Never fails: anything that is not a recognizable date comes back untouched,
/// including its surrounding whitespace.
pub fn normalize_date(value: &Cell) -> DateOutcome {
    let Cell::Text(raw) = value else {
        return DateOutcome::Unchanged(value.clone());
    };

    let trimmed = raw.trim();
    DatePattern::ORDERED
        .iter()
        .find_map(|pattern| pattern.parse(trimmed))
        .map(DateOutcome::Parsed)
        .unwrap_or_else(|| DateOutcome::Unchanged(value.clone()))
}

/// Normalize date text to `YYYY-MM-DD`, returning the input when it is not a date.
pub fn normalize_date_str(s: &str) -> String {
    match normalize_date(&Cell::text(s)) {
        DateOutcome::Parsed(d) => d.format("%Y-%m-%d").to_string(),
        DateOutcome::Unchanged(_) => s.to_string(),
    }
}

// 00-68 are 20xx, 69-99 are 19xx
fn expand_two_digit_year(year: i32) -> i32 {
    if year < 69 { 2000 + year } else { 1900 + year }
}
