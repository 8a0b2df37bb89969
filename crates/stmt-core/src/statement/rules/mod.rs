//! Locale-aware field normalizers for statement cells.

pub mod amounts;
pub mod dates;
pub mod patterns;

pub use amounts::{
    format_br_amount, normalize_amount, parse_br_amount, AmountNormalizer, AmountOutcome,
};
pub use dates::{normalize_date, normalize_date_str, DateOutcome, DatePattern};

use crate::models::config::FieldConfig;
use crate::models::{Cell, FieldValue};

/// Applies the date and amount normalizers to the configured columns.
#[derive(Debug, Clone)]
pub struct FieldNormalizer {
    date_column: String,
    amount_column: String,
    amounts: AmountNormalizer,
}

impl FieldNormalizer {
    /// Column names are matched the way header cells are captured: trimmed and lower-cased.
    pub fn new(config: &FieldConfig) -> Self {
        Self {
            date_column: config.date_column.trim().to_lowercase(),
            amount_column: config.amount_column.trim().to_lowercase(),
            amounts: AmountNormalizer::from_config(config),
        }
    }

    /// Normalized value for `cell` under `column`.
    pub fn normalize(&self, column: &str, cell: &Cell) -> FieldValue {
        if column == self.date_column {
            match normalize_date(cell) {
                DateOutcome::Parsed(date) => FieldValue::Date(date),
                DateOutcome::Unchanged(cell) => FieldValue::from(&cell),
            }
        } else if column == self.amount_column {
            match self.amounts.normalize(cell) {
                AmountOutcome::Parsed(amount) => FieldValue::Amount(amount),
                AmountOutcome::Unchanged(cell) => FieldValue::from(&cell),
                AmountOutcome::Invalid => FieldValue::Invalid,
            }
        } else {
            FieldValue::from(cell)
        }
    }
}

impl Default for FieldNormalizer {
    fn default() -> Self {
        Self::new(&FieldConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_only_configured_columns_are_normalized() {
        let normalizer = FieldNormalizer::default();

        assert_eq!(
            normalizer.normalize("date", &Cell::text("01/01/2024")),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
        assert_eq!(
            normalizer.normalize("description", &Cell::text("01/01/2024")),
            FieldValue::Text("01/01/2024".to_string())
        );
        assert_eq!(normalizer.normalize("amount", &Cell::text("abc")), FieldValue::Invalid);
        assert_eq!(
            normalizer.normalize("amount", &Cell::Number(5.0)),
            FieldValue::Number(5.0)
        );
    }

    #[test]
    fn test_configured_columns_match_header_case() {
        let normalizer = FieldNormalizer::new(&FieldConfig {
            date_column: " Data ".to_string(),
            amount_column: "VALOR".to_string(),
            ..FieldConfig::default()
        });

        assert_eq!(
            normalizer.normalize("data", &Cell::text("02/01/24")),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
        );
        assert_eq!(normalizer.normalize("valor", &Cell::text("n/a")), FieldValue::Invalid);
    }
}
