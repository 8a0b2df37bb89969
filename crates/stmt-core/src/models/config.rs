//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::StmtError;

/// Main configuration for the stmt pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StmtConfig {
    /// Block scanner configuration.
    pub scanner: ScannerConfig,

    /// Field normalization configuration.
    pub fields: FieldConfig,

    /// Workbook reading configuration.
    pub workbook: WorkbookConfig,

    /// Output and payload configuration.
    pub output: OutputConfig,

    /// Folder to account routing.
    pub accounts: AccountConfig,
}

/// Block scanner configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// First-cell text (case-insensitive) that opens a block.
    pub header_marker: String,

    /// Consecutive non-header rows after a block before scanning stops.
    pub max_noise_rows: usize,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            header_marker: "date".to_string(),
            max_noise_rows: 6,
        }
    }
}

/// Field normalization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Column whose values are normalized as dates.
    pub date_column: String,

    /// Column whose values are normalized as currency amounts.
    pub amount_column: String,

    /// Currency markers stripped from the front of amounts, longest first.
    pub currency_markers: Vec<String>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            date_column: "date".to_string(),
            amount_column: "amount".to_string(),
            currency_markers: vec![
                "R$".to_string(),
                "US$".to_string(),
                "$".to_string(),
                "€".to_string(),
            ],
        }
    }
}

/// Workbook reading configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkbookConfig {
    /// Sheet to read. The first sheet is used when unset.
    pub sheet: Option<String>,
}

/// How an extraction is split into payloads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PayloadMode {
    /// One payload holding every block.
    #[default]
    PerExtraction,
    /// One payload per record.
    PerRecord,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Payload split used when publishing.
    pub payload_mode: PayloadMode,

    /// File written in local mode.
    pub local_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            payload_mode: PayloadMode::PerExtraction,
            local_file: "transactions.json".to_string(),
        }
    }
}

/// Folder to account routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccountConfig {
    /// Top-level upload folder mapped to the account tag it carries.
    pub folders: BTreeMap<String, String>,

    /// Account used when neither the caller nor the folder supplies one.
    pub default_account: Option<String>,
}

impl Default for AccountConfig {
    fn default() -> Self {
        let folders = ["azul-visa", "itau-card"]
            .into_iter()
            .map(|f| (f.to_string(), f.to_string()))
            .collect();
        Self {
            folders,
            default_account: None,
        }
    }
}

impl StmtConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Reject settings the scanner and normalizer cannot work with.
    pub fn validate(&self) -> crate::Result<()> {
        if self.scanner.header_marker.trim().is_empty() {
            return Err(StmtError::Config("scanner.header_marker must not be blank".to_string()));
        }
        for (key, column) in [
            ("fields.date_column", &self.fields.date_column),
            ("fields.amount_column", &self.fields.amount_column),
        ] {
            if column.trim().is_empty() {
                return Err(StmtError::Config(format!("{} must not be blank", key)));
            }
        }
        Ok(())
    }
}
