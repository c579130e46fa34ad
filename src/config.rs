//! Detector configuration, persisted as TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields the
//! standard behaviour. CLI flags are applied on top of whatever was loaded.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Knobs for the detection passes and the rendered report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Group entities by local name across namespaces.
    #[serde(default)]
    pub namespace_agnostic: bool,
    /// Compare `rdfs:domain` across sources the same way ranges are compared.
    #[serde(default = "default_domain_conflicts")]
    pub domain_conflicts: bool,
    /// Maximum items rendered per report section. `0` means unlimited.
    #[serde(default)]
    pub list_limit: usize,
    /// Word pairs appended to the built-in inverse-property table.
    #[serde(default)]
    pub extra_inverse_patterns: Vec<[String; 2]>,
}

fn default_domain_conflicts() -> bool {
    true
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            namespace_agnostic: false,
            domain_conflicts: default_domain_conflicts(),
            list_limit: 0,
            extra_inverse_patterns: Vec::new(),
        }
    }
}

impl DetectorConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }
}
