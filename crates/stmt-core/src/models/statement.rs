//! Statement data models: headers, records and blocks.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

use super::sheet::{Cell, Row};

/// Key stamped on every record with the caller-supplied account tag.
pub const ACCOUNT_KEY: &str = "account";

/// Key stamped on every record with the content hash.
pub const ID_KEY: &str = "id";

/// A normalized record value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Blank cell.
    #[default]
    Empty,
    /// Text value.
    Text(String),
    /// Numeric value read as-is from a numeric cell.
    Number(f64),
    /// Exact amount parsed from a locale-formatted currency string.
    Amount(Decimal),
    /// Calendar date.
    Date(NaiveDate),
    /// Date-time read from a date-typed cell.
    DateTime(NaiveDateTime),
    /// Amount text that could not be parsed. Serialized as `null`, never as zero.
    Invalid,
}

impl FieldValue {
    pub fn is_invalid(&self) -> bool {
        matches!(self, FieldValue::Invalid)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&Cell> for FieldValue {
    fn from(cell: &Cell) -> Self {
        match cell {
            Cell::Empty => FieldValue::Empty,
            Cell::Text(s) => FieldValue::Text(s.clone()),
            Cell::Number(n) => FieldValue::Number(*n),
            Cell::Bool(b) => FieldValue::Text(Cell::Bool(*b).to_string()),
            Cell::Date(dt) => FieldValue::DateTime(*dt),
        }
    }
}

/// Textual form used for row identity.
///
/// Matches the serialized value: a record decoded from a payload displays the
/// same text, so its id can be recomputed downstream.
impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Date(_) | FieldValue::DateTime(_) => f.write_str(&self.iso()),
            _ => match self.as_f64() {
                Some(n) => write!(f, "{}", n),
                None => Ok(()),
            },
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Text(s) => serializer.serialize_str(s),
            FieldValue::Date(_) | FieldValue::DateTime(_) => serializer.serialize_str(&self.iso()),
            _ => match self.as_f64() {
                Some(n) => serializer.serialize_f64(n),
                None => serializer.serialize_none(),
            },
        }
    }
}

impl FieldValue {
    /// Published number, `None` for blanks, invalid amounts and non-finite values.
    fn as_f64(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Number(n) => *n,
            FieldValue::Amount(d) => d.to_f64()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    fn iso(&self) -> String {
        match self {
            FieldValue::Date(d) => d.format("%Y-%m-%d").to_string(),
            FieldValue::DateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S").to_string(),
            _ => String::new(),
        }
    }
}

/// Untyped view of a decoded payload value.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawValue::deserialize(deserializer)? {
            RawValue::Null => FieldValue::Empty,
            RawValue::Bool(b) => FieldValue::Text(Cell::Bool(b).to_string()),
            RawValue::Number(n) => FieldValue::Number(n),
            RawValue::Text(s) => FieldValue::Text(s),
        })
    }
}

/// Normalized column names captured from a header row.
///
/// Blank header cells keep their position as `None` so data cells stay aligned.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Header {
    columns: Vec<Option<String>>,
}

impl Header {
    /// Capture a header row: non-blank cells are trimmed and lower-cased.
    pub fn from_row(row: &Row) -> Self {
        let columns = row
            .cells()
            .iter()
            .map(|cell| {
                let name = cell.to_string().trim().to_lowercase();
                (!cell.is_blank() && !name.is_empty()).then_some(name)
            })
            .collect();
        Self { columns }
    }

    pub fn new(columns: Vec<Option<String>>) -> Self {
        Self { columns }
    }

    /// All column slots, placeholders included.
    pub fn columns(&self) -> &[Option<String>] {
        &self.columns
    }

    /// Named columns with their cell index, in declared order.
    pub fn named(&self) -> impl Iterator<Item = (usize, &str)> {
        self.columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.as_deref().map(|name| (i, name)))
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A flat statement record: column name to normalized value, in header order.
///
/// Inserting an existing key replaces its value and keeps its original position.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`.
    pub fn insert(&mut self, key: impl Into<String>, value: FieldValue) {
        let key = key.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut FieldValue> {
        self.fields.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Account tag stamped on this record.
    pub fn account(&self) -> Option<&str> {
        self.get(ACCOUNT_KEY).and_then(FieldValue::as_str)
    }

    /// Content hash stamped on this record.
    pub fn id(&self) -> Option<&str> {
        self.get(ID_KEY).and_then(FieldValue::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a flat record object")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::new();
                while let Some((key, value)) = access.next_entry::<String, FieldValue>()? {
                    record.insert(key, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// Records sharing one header. Serialized as a plain array of records.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Block {
    pub records: Vec<Record>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::str::FromStr;

    #[test]
    fn test_header_from_row() {
        let row: Row = vec![Some(" Date "), None, Some("AMOUNT"), Some("   ")]
            .into_iter()
            .collect();
        let header = Header::from_row(&row);

        assert_eq!(
            header.columns(),
            &[Some("date".to_string()), None, Some("amount".to_string()), None]
        );
        assert_eq!(header.named().collect::<Vec<_>>(), vec![(0, "date"), (2, "amount")]);
    }

    #[test]
    fn test_record_insert_keeps_position() {
        let mut record = Record::new();
        record.insert("a", FieldValue::Text("1".into()));
        record.insert("b", FieldValue::Text("2".into()));
        record.insert("a", FieldValue::Text("3".into()));

        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.get("a"), Some(&FieldValue::Text("3".into())));
    }

    #[test]
    fn test_record_serializes_flat_json() {
        let mut record = Record::new();
        record.insert("date", FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        record.insert("amount", FieldValue::Amount(Decimal::from_str("1234.56").unwrap()));
        record.insert("fee", FieldValue::Invalid);
        record.insert("description", FieldValue::Text("Test 1".into()));

        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(
            json,
            r#"{"date":"2024-01-01","amount":1234.56,"fee":null,"description":"Test 1"}"#
        );
    }

    #[test]
    fn test_invalid_amount_is_not_zero() {
        let zero = FieldValue::Amount(Decimal::ZERO);
        assert_ne!(serde_json::to_value(&zero).unwrap(), serde_json::Value::Null);
        assert_eq!(
            serde_json::to_value(&FieldValue::Invalid).unwrap(),
            serde_json::Value::Null
        );
    }

    #[test]
    fn test_display_matches_published_value() {
        let values = [
            FieldValue::Amount(Decimal::from_str("10.00").unwrap()),
            FieldValue::Amount(Decimal::from_str("1234.50").unwrap()),
            FieldValue::Number(3.0),
            FieldValue::DateTime(
                NaiveDate::from_ymd_opt(2024, 1, 1)
                    .unwrap()
                    .and_hms_opt(8, 30, 0)
                    .unwrap(),
            ),
            FieldValue::Date(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()),
            FieldValue::Text("TRUE".into()),
            FieldValue::Invalid,
            FieldValue::Empty,
        ];

        for value in values {
            let json = serde_json::to_string(&value).unwrap();
            let decoded: FieldValue = serde_json::from_str(&json).unwrap();
            assert_eq!(decoded.to_string(), value.to_string(), "{:?}", value);
        }
        assert_eq!(FieldValue::Amount(Decimal::from_str("10.00").unwrap()).to_string(), "10");
        assert_eq!(FieldValue::Number(f64::NAN).to_string(), "");
    }

    #[test]
    fn test_block_decodes_from_array() {
        let json = r#"[{"date":"2024-01-01","amount":10.5,"account":"x","id":"abc"}]"#;
        let block: Block = serde_json::from_str(json).unwrap();

        assert_eq!(block.len(), 1);
        let record = &block.records[0];
        assert_eq!(record.account(), Some("x"));
        assert_eq!(record.id(), Some("abc"));
        assert_eq!(record.get("amount"), Some(&FieldValue::Number(10.5)));
    }
}
