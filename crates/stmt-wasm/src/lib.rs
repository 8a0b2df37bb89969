//! WASM bindings for spreadsheet statement extraction.
//!
//! This crate provides WebAssembly bindings for use in browsers and Node.js.

use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use stmt_core::publish::{decode_blocks, flatten};
use stmt_core::statement::rules::{normalize_date_str, parse_br_amount};
use stmt_core::{fingerprint, Extraction, StatementExtractor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Records become plain objects rather than `Map`s.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(to_js_error)
}

/// Extract blocks of records from spreadsheet bytes.
///
/// Returns an array of blocks, each an array of flat record objects.
#[wasm_bindgen]
pub fn extract_statement(data: &[u8], account: &str) -> Result<JsValue, JsValue> {
    let extraction = StatementExtractor::new()
        .extract_bytes(data, account)
        .map_err(to_js_error)?;

    to_js(&extraction.blocks)
}

/// Extract blocks and return them as a JSON string (the per-extraction payload).
#[wasm_bindgen]
pub fn extract_statement_json(data: &[u8], account: &str) -> Result<String, JsValue> {
    extract_json(&StatementExtractor::new(), data, account).map_err(to_js_error)
}

fn extract_json(extractor: &StatementExtractor, data: &[u8], account: &str) -> Result<String, String> {
    let extraction = extractor
        .extract_bytes(data, account)
        .map_err(|e| e.to_string())?;
    serde_json::to_string(&extraction.blocks).map_err(|e| e.to_string())
}

/// Normalize a `DD/MM/YYYY` or `DD/MM/YY` date to `YYYY-MM-DD`.
///
/// Anything else is returned unchanged.
#[wasm_bindgen]
pub fn normalize_date(value: &str) -> String {
    normalize_date_str(value)
}

/// Parse a Brazilian-formatted amount (e.g., "R$ 1.234,56").
#[wasm_bindgen]
pub fn parse_amount(value: &str) -> Option<f64> {
    parse_br_amount(value).and_then(|d| d.to_f64())
}

/// Compute a row id from an account and the row's values in column order.
#[wasm_bindgen]
pub fn row_id(account: &str, values: Vec<String>) -> String {
    fingerprint(account, values)
}

/// Flatten a per-extraction JSON payload into a single array of records.
#[wasm_bindgen]
pub fn flatten_payload(payload: &str) -> Result<JsValue, JsValue> {
    let blocks = decode_blocks(payload.as_bytes()).map_err(to_js_error)?;
    to_js(&flatten(blocks))
}

/// Statement extractor class for browser use.
#[wasm_bindgen]
pub struct StatementExtractorJs {
    extractor: StatementExtractor,
}

#[wasm_bindgen]
impl StatementExtractorJs {
    /// Create a new statement extractor.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            extractor: StatementExtractor::new(),
        }
    }

    /// Configure the header marker.
    #[wasm_bindgen]
    pub fn set_header_marker(&mut self, marker: &str) {
        self.extractor = self.extractor.clone().with_header_marker(marker);
    }

    /// Configure how many non-header rows end the scan.
    #[wasm_bindgen]
    pub fn set_max_noise_rows(&mut self, rows: usize) {
        self.extractor = self.extractor.clone().with_max_noise_rows(rows);
    }

    /// Configure the sheet to read.
    #[wasm_bindgen]
    pub fn set_sheet(&mut self, sheet: Option<String>) {
        self.extractor = self.extractor.clone().with_sheet(sheet);
    }

    /// Extract blocks from spreadsheet bytes.
    #[wasm_bindgen]
    pub fn extract(&self, data: &[u8], account: &str) -> Result<JsValue, JsValue> {
        let extraction = self
            .extractor
            .extract_bytes(data, account)
            .map_err(to_js_error)?;

        to_js(&extraction.blocks)
    }

    /// Get the extraction with its metadata.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, data: &[u8], account: &str) -> Result<JsValue, JsValue> {
        let extraction: Extraction = self
            .extractor
            .extract_bytes(data, account)
            .map_err(to_js_error)?;

        to_js(&extraction)
    }
}

impl Default for StatementExtractorJs {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_flatten_payload() {
        let records = flatten_payload(r#"[[{"id":"a"}],[{"id":"b"}]]"#).unwrap();
        assert!(js_sys::Array::is_array(&records));
    }

    #[wasm_bindgen_test]
    fn test_version() {
        assert!(!version().is_empty());
    }
}
