//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/numchain/numchain.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `NUMCHAIN_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::services::DEFAULT_FALLBACK_USERNAME;
use crate::application::ApplicationError;

/// Unified configuration for numchain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// JSON store file (default: `<XDG data dir>/numchain/store.json`)
    pub store_path: PathBuf,
    /// Name shown for owners the store cannot resolve
    pub fallback_username: String,
    /// Indent JSON output
    pub pretty_json: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            fallback_username: DEFAULT_FALLBACK_USERNAME.to_string(),
            pretty_json: true,
        }
    }
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub store_path: Option<PathBuf>,
    pub fallback_username: Option<String>,
    pub pretty_json: Option<bool>,
}

fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "numchain")
        .map(|dirs| dirs.data_dir().join("store.json"))
        .unwrap_or_else(|| PathBuf::from("numchain-store.json"))
}

/// Get the XDG config directory for numchain.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "numchain").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("numchain.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn expand(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// `config_file`, when given, must exist.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        let global = global_config_path().filter(|p| p.exists());
        Self::load_from(global.as_deref(), config_file)
    }

    /// Same layering as [`Settings::load`] with an explicit global file.
    pub fn load_from(
        global: Option<&Path>,
        config_file: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global) = global {
            current = current.merge_with(&load_raw_settings(global)?);
        }

        if let Some(path) = config_file {
            if !path.is_file() {
                return Err(ApplicationError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            current = current.merge_with(&load_raw_settings(path)?);
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();
        Ok(current)
    }

    /// Scalar options: overlay wins if Some, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            store_path: overlay
                .store_path
                .clone()
                .unwrap_or_else(|| self.store_path.clone()),
            fallback_username: overlay
                .fallback_username
                .clone()
                .unwrap_or_else(|| self.fallback_username.clone()),
            pretty_json: overlay.pretty_json.unwrap_or(self.pretty_json),
        }
    }

    /// Apply NUMCHAIN_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("NUMCHAIN").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("store_path") {
            settings.store_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("fallback_username") {
            settings.fallback_username = val;
        }
        if let Ok(val) = config.get_bool("pretty_json") {
            settings.pretty_json = val;
        }

        Ok(settings)
    }

    /// Expand `~`, `$VAR` and `${VAR}` in the store path.
    fn expand_paths(&mut self) {
        let expanded = expand(self.store_path.to_string_lossy().as_ref());
        self.store_path = PathBuf::from(expanded);
    }

    /// Render effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {e}"),
        })
    }

    /// Override the store location, e.g. from `--store`.
    pub fn with_store_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.store_path = path.into();
        self.expand_paths();
        self
    }
}
