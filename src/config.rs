//! Configuration for the Nominis service.
//!
//! Non-secret settings come from a TOML file; the EUIPO client id and
//! secret come from the environment (see [`crate::credentials`]).

use std::path::{Path, PathBuf};

use nominis_search::EuipoConfig;
use nominis_search::types::{MAX_PAGE_SIZE, MIN_PAGE_SIZE};
use serde::{Deserialize, Serialize};

use crate::credentials::LoadedCredentials;
use crate::error::{NominisError, Result};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_VAR: &str = "NOMINIS_CONFIG";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NominisConfig {
    /// Upstream endpoints, timeouts and the optional status filter.
    pub euipo: EuipoConfig,
    /// Defaults applied to queries that do not specify them.
    pub search: SearchDefaults,
}

/// Query defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    /// Page size used when a query does not set one.
    pub page_size: u32,
}

impl Default for SearchDefaults {
    fn default() -> Self {
        Self {
            page_size: MIN_PAGE_SIZE,
        }
    }
}

impl NominisConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| NominisError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// Secrets are never written.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| NominisError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `explicit`, else `$NOMINIS_CONFIG`, else the default path
    /// when it exists, else built-in defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a chosen file cannot be read or parsed. An
    /// absent default file is not an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        if let Some(path) = std::env::var_os(CONFIG_PATH_VAR) {
            return Self::from_file(Path::new(&path));
        }
        let default_path = Self::default_config_path();
        if default_path.is_file() {
            tracing::debug!(path = %default_path.display(), "loading default config");
            return Self::from_file(&default_path);
        }
        Ok(Self::default())
    }

    /// Returns the default config file path: `~/.config/nominis/config.toml`.
    pub fn default_config_path() -> PathBuf {
        if let Some(config) = std::env::var_os("XDG_CONFIG_HOME") {
            PathBuf::from(config).join("nominis").join("config.toml")
        } else if let Some(home) = std::env::var_os("HOME") {
            PathBuf::from(home)
                .join(".config")
                .join("nominis")
                .join("config.toml")
        } else {
            PathBuf::from("/tmp/nominis-config/config.toml")
        }
    }

    /// Check non-secret settings.
    ///
    /// # Errors
    ///
    /// Returns [`NominisError::Config`] for an out-of-range default page
    /// size, or the upstream config's own validation error.
    pub fn validate(&self) -> Result<()> {
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.search.page_size) {
            return Err(NominisError::Config(format!(
                "search.page_size must be between {MIN_PAGE_SIZE} and {MAX_PAGE_SIZE}"
            )));
        }
        self.euipo.validate()?;
        Ok(())
    }

    /// Upstream config with `credentials` applied.
    pub fn euipo_with(&self, credentials: &LoadedCredentials) -> EuipoConfig {
        self.euipo
            .clone()
            .with_credentials(&credentials.client_id, &credentials.client_secret)
    }
}
