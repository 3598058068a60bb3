//! Configuration management

use super::EnvContext;
use super::container::ContainerRuntime;
use crate::plugins::PluginError;
use crate::secrets::InfisicalSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Container runtime used by the CLI client
    pub runtime: ContainerRuntime,
    /// Log level
    pub log_level: String,
    /// Secret store connection
    pub infisical: InfisicalSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            runtime: ContainerRuntime::Docker,
            log_level: "info".to_string(),
            infisical: InfisicalSettings::default(),
        }
    }
}

impl Config {
    /// Defaults overlaid with the environment
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] when `RIGGING_RUNTIME` names an
    /// unknown runtime.
    pub fn from_env(env: &EnvContext) -> Result<Self, PluginError> {
        Self::default().with_env(env)
    }

    /// Reads a YAML file, then overlays the environment
    ///
    /// # Errors
    ///
    /// Returns [`PluginError::Config`] when the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>, env: &EnvContext) -> Result<Self, PluginError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| PluginError::Config(format!("{}: {e}", path.display())))?;
        let config: Self = serde_yaml::from_str(&raw)
            .map_err(|e| PluginError::Config(format!("{}: {e}", path.display())))?;
        config.with_env(env)
    }

    fn with_env(mut self, env: &EnvContext) -> Result<Self, PluginError> {
        if let Some(runtime) = env.get_non_empty("RIGGING_RUNTIME") {
            self.runtime = runtime.parse()?;
        }
        if let Some(level) = env.get_non_empty("RIGGING_LOG") {
            self.log_level = level.to_string();
        }
        self.infisical = self.infisical.with_env(env);
        Ok(self)
    }
}
