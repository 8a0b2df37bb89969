//! Routing of uploaded object paths to account tags.

use std::collections::BTreeMap;
use tracing::{debug, warn};

use crate::error::AccountError;
use crate::models::config::AccountConfig;

/// Maps the top-level folder of an object path to an account.
#[derive(Debug, Clone)]
pub struct AccountRouter {
    folders: BTreeMap<String, String>,
    default_account: Option<String>,
}

impl AccountRouter {
    pub fn new(config: &AccountConfig) -> Self {
        Self {
            folders: config.folders.clone(),
            default_account: config.default_account.clone(),
        }
    }

    /// Resolve `object_path` (e.g. `azul-visa/2024/fatura.xlsx`) to its account.
    ///
    /// Only the first path segment is looked up. Backslashes count as separators.
    pub fn resolve(&self, object_path: &str) -> Result<String, AccountError> {
        let normalized = object_path.replace('\\', "/");
        let folder = normalized
            .trim_start_matches('/')
            .split('/')
            .next()
            .unwrap_or_default();
        if folder.is_empty() {
            return Err(AccountError::EmptyPath);
        }

        match self.folders.get(folder) {
            Some(account) => {
                debug!("Routed {} to account {}", object_path, account);
                Ok(account.clone())
            }
            None => {
                warn!("Invalid folder name: {}", folder);
                Err(AccountError::UnknownFolder(folder.to_string()))
            }
        }
    }

    /// Pick an account: explicit value first, then folder routing, then the default.
    pub fn choose(&self, explicit: Option<&str>, object_path: &str) -> Result<String, AccountError> {
        if let Some(account) = explicit {
            return Ok(account.to_string());
        }
        match self.resolve(object_path) {
            Ok(account) => Ok(account),
            Err(err) => self.default_account.clone().ok_or(err),
        }
    }

    /// Folders that route to an account.
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.folders.keys().map(String::as_str)
    }
}

impl Default for AccountRouter {
    fn default() -> Self {
        Self::new(&AccountConfig::default())
    }
}
