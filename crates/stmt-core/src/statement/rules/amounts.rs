//! Amount normalization for statement cells (e.g. `R$ 1.234,56` to `1234.56`).

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::Cell;
use crate::models::config::FieldConfig;

/// Outcome of amount normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum AmountOutcome {
    /// Text parsed to an exact amount.
    Parsed(Decimal),
    /// Not text; numeric cells pass through as they are.
    Unchanged(Cell),
    /// Text that is not an amount. Distinct from a parsed zero.
    Invalid,
}

impl AmountOutcome {
    pub fn parsed(&self) -> Option<Decimal> {
        match self {
            AmountOutcome::Parsed(d) => Some(*d),
            _ => None,
        }
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, AmountOutcome::Invalid)
    }
}

/// Amount normalizer for `.`-grouped, `,`-decimal currency strings.
#[derive(Debug, Clone)]
pub struct AmountNormalizer {
    markers: Vec<String>,
}

impl AmountNormalizer {
    /// Create a normalizer stripping the given currency markers.
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut markers: Vec<String> = markers
            .into_iter()
            .map(Into::into)
            .filter(|m| !m.is_empty())
            .collect();
        // "US$" must win over "$"
        markers.sort_by(|a, b| b.len().cmp(&a.len()));
        Self { markers }
    }

    pub fn from_config(config: &FieldConfig) -> Self {
        Self::new(config.currency_markers.iter().cloned())
    }

    /// Normalize one cell. Never fails.
    pub fn normalize(&self, value: &Cell) -> AmountOutcome {
        match value {
            Cell::Text(raw) => self
                .parse(raw)
                .map(AmountOutcome::Parsed)
                .unwrap_or(AmountOutcome::Invalid),
            other => AmountOutcome::Unchanged(other.clone()),
        }
    }

    /// Parse amount text, `None` when it is not a number.
    pub fn parse(&self, raw: &str) -> Option<Decimal> {
        let mut s = raw.trim();
        let negative = s.starts_with('-');
        if negative {
            s = s[1..].trim_start();
        }
        if let Some(marker) = self.markers.iter().find(|m| s.starts_with(m.as_str())) {
            s = &s[marker.len()..];
        }

        let cleaned: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '.')
            .map(|c| if c == ',' { '.' } else { c })
            .collect();
        if cleaned.is_empty() {
            return None;
        }

        let amount = Decimal::from_str(&cleaned).ok()?;
        Some(if negative { -amount } else { amount })
    }
}

impl Default for AmountNormalizer {
    fn default() -> Self {
        Self::from_config(&FieldConfig::default())
    }
}

/// Normalize an amount cell with the default currency markers.
pub fn normalize_amount(value: &Cell) -> AmountOutcome {
    AmountNormalizer::default().normalize(value)
}

/// Parse a `1.234,56`-style amount with the default currency markers.
pub fn parse_br_amount(s: &str) -> Option<Decimal> {
    AmountNormalizer::default().parse(s)
}

/// Format an amount back in `1.234,56` style.
pub fn format_br_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if amount.is_sign_negative() && !amount.is_zero() {
        formatted.push('-');
    }
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}
