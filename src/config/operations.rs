//! Config loading, validation, and serialization.

use super::model::SessionConfig;
use crate::error::{Result, StrictnessError};
use std::path::Path;

impl SessionConfig {
    /// Load config from a YAML file.
    ///
    /// # Returns
    ///
    /// * `Ok(SessionConfig)` - Successfully loaded and validated config
    /// * `Err(StrictnessError::Config)` - Read error, parse error or validation failure
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path).map_err(|e| {
            StrictnessError::Config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse config from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SessionConfig = if yaml.trim().is_empty() {
            SessionConfig::default()
        } else {
            serde_yaml::from_str(yaml)
                .map_err(|e| StrictnessError::Config(format!("failed to parse YAML: {}", e)))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize config to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self)
            .map_err(|e| StrictnessError::Config(format!("failed to serialize to YAML: {}", e)))
    }

    /// Validate config values.
    ///
    /// Validation rules:
    /// - `name` must contain a non-whitespace character
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(StrictnessError::Config(
                "name must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
