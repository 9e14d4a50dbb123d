//! Fixture settings and configuration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::mock::DefaultValue;

/// Path of an optional TOML settings file
pub const CONFIG_ENV: &str = "AUTOMOCKER_CONFIG";

/// Overrides `default_value` (`empty` or `mock`)
pub const DEFAULT_VALUE_ENV: &str = "AUTOMOCKER_DEFAULT_VALUE";

/// Fixture configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixtureSettings {
    /// Policy for unconfigured calls on every mock the fixture creates
    pub default_value: DefaultValue,

    /// Report a panicking subject constructor as a construction error
    pub catch_panics: bool,
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self {
            default_value: DefaultValue::Empty,
            catch_panics: true,
        }
    }
}

impl FixtureSettings {
    /// Load settings from the environment.
    ///
    /// Reads the file named by `AUTOMOCKER_CONFIG` when it exists, then
    /// applies `AUTOMOCKER_DEFAULT_VALUE`.
    pub fn load() -> Result<Self> {
        let mut settings = match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            _ => Self::default(),
        };

        if let Ok(value) = std::env::var(DEFAULT_VALUE_ENV) {
            settings.default_value = value
                .parse()
                .with_context(|| format!("Invalid {DEFAULT_VALUE_ENV}"))?;
        }

        Ok(settings)
    }

    /// Load settings from a TOML file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        tracing::debug!("Loaded fixture settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get the config file path, if one is configured
    #[must_use]
    pub fn config_path() -> Option<PathBuf> {
        std::env::var_os(CONFIG_ENV)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    #[must_use]
    pub fn with_default_value(mut self, default_value: DefaultValue) -> Self {
        self.default_value = default_value;
        self
    }

    #[must_use]
    pub fn with_catch_panics(mut self, catch_panics: bool) -> Self {
        self.catch_panics = catch_panics;
        self
    }
}
