use crate::error::Result;
use crate::paths;
use crate::types::RuleLevel;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// RulesConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Levels generated even when the context would skip them. Entries are
    /// level numbers or names; unknown entries are reported by `validate`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub levels: Vec<String>,
}

impl RulesConfig {
    pub fn forced_levels(&self) -> Vec<RuleLevel> {
        self.levels.iter().filter_map(|l| l.parse().ok()).collect()
    }
}

// ---------------------------------------------------------------------------
// ScaffoldConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    /// Directory of template overrides, relative to the project root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub templates_dir: Option<PathBuf>,
    /// Abort generation when a placeholder cannot be resolved.
    #[serde(default)]
    pub strict: bool,
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,
    #[serde(default)]
    pub rules: RulesConfig,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_overwrite() -> bool {
    true
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            templates_dir: None,
            strict: false,
            overwrite: default_overwrite(),
            rules: RulesConfig::default(),
        }
    }
}

impl ScaffoldConfig {
    /// Load `scaffold.yaml` from `root`; a missing file yields the defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(&path)?;
        if data.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Absolute templates directory, if configured.
    pub fn templates_dir(&self, root: &Path) -> Option<PathBuf> {
        self.templates_dir.as_ref().map(|d| root.join(d))
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self, root: &Path) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();

        if self.version != CONFIG_VERSION {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "unsupported config version {} (expected {})",
                    self.version, CONFIG_VERSION
                ),
            });
        }

        for level in &self.rules.levels {
            if level.parse::<RuleLevel>().is_err() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Warning,
                    message: format!("unknown rule level '{level}' in rules.levels"),
                });
            }
        }

        if let Some(dir) = self.templates_dir(root) {
            if !dir.is_dir() {
                warnings.push(ConfigWarning {
                    level: WarnLevel::Error,
                    message: format!("templates_dir '{}' does not exist", dir.display()),
                });
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
