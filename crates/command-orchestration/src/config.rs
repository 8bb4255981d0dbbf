//! Engine configuration
//!
//! Loaded from YAML, for example:
//!
//! ```yaml
//! status_output_len: 120
//! version_control_systems: [Git, SVN, Hg]
//! commands_file: ~/.config/devrun/command_prefs.json
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_STATUS_OUTPUT_LEN: usize = 80;

/// Settings shared by every run of an engine
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum characters of command output shown next to a status line
    pub status_output_len: usize,
    /// Version control system names known to the command filter
    pub version_control_systems: Vec<String>,
    /// Override commands file; the user config location when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands_file: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            status_output_len: DEFAULT_STATUS_OUTPUT_LEN,
            version_control_systems: vec!["Git".to_string(), "SVN".to_string()],
            commands_file: None,
        }
    }
}

impl EngineConfig {
    /// Parse a YAML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_str(&content)
    }

    /// Parse YAML configuration from a string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.status_output_len == 0 {
            return Err(Error::Config(
                "status_output_len must be greater than zero".to_string(),
            ));
        }
        if let Some(bad) = self
            .version_control_systems
            .iter()
            .find(|name| name.trim().is_empty() || name.contains(char::is_whitespace))
        {
            return Err(Error::Config(format!(
                "invalid version control system name '{}'",
                bad
            )));
        }
        Ok(())
    }
}
