pub mod batch;
pub mod config;
pub mod extract;
pub mod flatten;

use std::path::{Path, PathBuf};

use tracing::debug;

use stmt_core::models::StmtConfig;
use stmt_core::AccountRouter;

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("stmt")
        .join("config.json")
}

/// Load the configuration from `--config`, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<StmtConfig> {
    let config = match config_path {
        Some(path) => StmtConfig::from_file(Path::new(path))?,
        None => {
            let default_path = default_config_path();
            if default_path.exists() {
                debug!("Loading configuration from {}", default_path.display());
                StmtConfig::from_file(&default_path)?
            } else {
                StmtConfig::default()
            }
        }
    };
    config.validate()?;
    Ok(config)
}

/// Account for `path`: the explicit flag, then the parent folder, then the configured default.
pub fn account_for(
    router: &AccountRouter,
    explicit: Option<&str>,
    path: &Path,
) -> anyhow::Result<String> {
    let folder = path
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|f| f.to_str())
        .unwrap_or_default();
    let file = path.file_name().and_then(|f| f.to_str()).unwrap_or_default();

    router
        .choose(explicit, &format!("{}/{}", folder, file))
        .map_err(|e| anyhow::anyhow!("Cannot determine account for {}: {} (use --account)", path.display(), e))
}

/// Output format for extracted records.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON array of blocks
    Json,
    /// One record per line
    Jsonl,
    /// Flat CSV of all records
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}
