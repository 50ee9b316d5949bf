//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (<config dir>/error-explain/config.toml)
//! 3. Working directory config (./config.toml)
//! 4. Project config (.error-explain/config.toml)
//! 5. Environment variables (ERROR_EXPLAIN_TIMEOUT_SECS, ERROR_EXPLAIN_MODE)
//!
//! The backend list may be written as `[[backends]]` or `[[providers]]`.
//! Using both keys across layers is reported as a duplicate field.

use directories::BaseDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

use tracing::debug;

use super::types::Config;
use crate::constants::config::{APP_DIR, ENV_PREFIX, FILE_NAME, PROJECT_DIR};
use crate::types::{ExplainError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → ./config.toml → project → env vars
    pub fn load() -> Result<Config> {
        Self::load_layers(Self::global_config_path(), &Self::project_config_paths())
    }

    /// Load defaults plus one explicit file
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(ExplainError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }

        debug!("Loading config from: {}", path.display());
        Self::extract(
            Figment::new()
                .merge(Self::defaults())
                .merge(Toml::file(path)),
        )
    }

    fn load_layers(global: Option<PathBuf>, project: &[PathBuf]) -> Result<Config> {
        let mut figment = Figment::new().merge(Self::defaults());

        if let Some(global_path) = global
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        for path in project.iter().filter(|path| path.exists()) {
            debug!("Loading project config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // Only scalar keys; `timeout_secs` would not survive a split on '_'
        figment = figment.merge(Env::prefixed(ENV_PREFIX).only(&["timeout_secs", "mode"]));

        Self::extract(figment)
    }

    /// Scalar defaults only; the backend list is filled in after extraction
    /// so a file's `providers` key never collides with a default `backends`
    fn defaults() -> Serialized<Config> {
        Serialized::defaults(Config {
            backends: Vec::new(),
            ..Config::default()
        })
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| ExplainError::Config(format!("Configuration error: {}", e)))?;

        let config = config.with_default_backends();
        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Global config directory (e.g. ~/.config/error-explain/)
    pub fn global_dir() -> Option<PathBuf> {
        BaseDirs::new().map(|dirs| dirs.config_dir().join(APP_DIR))
    }

    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join(FILE_NAME))
    }

    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_DIR).join(FILE_NAME)
    }

    /// Config file in the working directory itself
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(FILE_NAME)
    }

    /// Working directory layers, lowest precedence first
    pub fn project_config_paths() -> [PathBuf; 2] {
        [Self::local_config_path(), Self::project_config_path()]
    }
}
