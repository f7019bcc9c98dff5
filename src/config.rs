//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/depthtree/depthtree.toml`
//! 3. Explicit config file (`--config`)
//! 4. Environment variables: `DEPTHTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::BASE_DEPTH;
use crate::markup::DisplayOptions;

/// Unified configuration for depthtree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Depth of add calls without indent markers
    pub base_depth: usize,
    /// Outline rendering
    pub display: DisplayOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_depth: BASE_DEPTH,
            display: DisplayOptions::default(),
        }
    }
}

/// Raw display config for intermediate parsing (None: not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawDisplayOptions {
    pub show_attributes: Option<bool>,
    pub max_text_width: Option<usize>,
}

/// Raw settings for intermediate parsing.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_depth: Option<usize>,
    pub display: RawDisplayOptions,
}

/// Get the XDG config directory for depthtree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "depthtree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("depthtree.toml"))
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

impl Settings {
    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_depth: overlay.base_depth.unwrap_or(self.base_depth),
            display: DisplayOptions {
                show_attributes: overlay
                    .display
                    .show_attributes
                    .unwrap_or(self.display.show_attributes),
                max_text_width: overlay
                    .display
                    .max_text_width
                    .unwrap_or(self.display.max_text_width),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional explicit config file; it must exist
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config, if present
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                debug!(path = %global_path.display(), "loading global config");
                current = current.merge_with(&load_raw_settings(&global_path)?);
            }
        }

        // 3. Explicit config file
        if let Some(path) = config_file {
            current = current.merge_with(&load_raw_settings(path)?);
        }

        // 4. Environment variables (explicit override)
        Self::apply_env_overrides(current)
    }

    /// Apply DEPTHTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("DEPTHTREE").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get::<usize>("base_depth") {
            settings.base_depth = val;
        }
        if let Ok(val) = config.get::<bool>("display.show_attributes") {
            settings.display.show_attributes = val;
        }
        if let Ok(val) = config.get::<usize>("display.max_text_width") {
            settings.display.max_text_width = val;
        }

        Ok(settings)
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: e.to_string(),
        })
    }
}
