use crate::discovery::{DiscoveryMode, Platform};
use crate::error::Result;
use log::warn;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub discovery: DiscoveryConfig,
    pub logging: LoggingConfig,
    /// Environment override values that were rejected while loading. Kept
    /// until the logger is installed, see [`Config::report_ignored_overrides`].
    #[serde(skip)]
    pub ignored_overrides: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    pub mode: DiscoveryMode,
    /// Platforms whose schemas are skipped entirely.
    pub disabled_platforms: Vec<Platform>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// env_logger filter used when RUST_LOG is unset.
    pub default_filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Load a JSON config file; missing sections fall back to defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(mode) = var("MATTER_DISCOVERY_MODE") {
            match mode.parse() {
                Ok(m) => self.discovery.mode = m,
                Err(_) => self
                    .ignored_overrides
                    .push(format!("invalid MATTER_DISCOVERY_MODE: {}", mode)),
            }
        }

        if let Some(platforms) = var("MATTER_DISABLED_PLATFORMS") {
            self.discovery.disabled_platforms.clear();
            for name in platforms.split(',').map(str::trim).filter(|p| !p.is_empty()) {
                match name.parse() {
                    Ok(platform) => self.discovery.disabled_platforms.push(platform),
                    Err(_) => self
                        .ignored_overrides
                        .push(format!("unknown platform in MATTER_DISABLED_PLATFORMS: {}", name)),
                }
            }
        }

        if let Some(filter) = var("MATTER_LOG_LEVEL") {
            self.logging.default_filter = filter;
        }

        self
    }

    /// Log every rejected override. Call after the logger is initialised.
    pub fn report_ignored_overrides(&self) {
        for ignored in &self.ignored_overrides {
            warn!("Ignoring {}", ignored);
        }
    }
}
