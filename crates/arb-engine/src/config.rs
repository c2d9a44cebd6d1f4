//! Engine tuning knobs.

use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Scoring and suggestion settings. Every field has a default, so an empty
/// JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Score floor for a child frame with at least one assigned role.
    pub inherited_floor_assigned: f64,
    /// Score floor for a child frame with no assigned role.
    pub inherited_floor_unassigned: f64,
    /// Suggestions scoring below this are dropped (inclusive bound).
    pub min_score: f64,
    /// Keep only the top N suggestions after sorting.
    pub max_results: Option<usize>,
    /// Lexical-unit hits skip scoring and are reported with score 1.0.
    pub lexical_units_exact: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inherited_floor_assigned: 0.5,
            inherited_floor_unassigned: 0.1,
            min_score: 0.0,
            max_results: None,
            lexical_units_exact: true,
        }
    }
}

impl EngineConfig {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Scores live in `[0, 1]`, so every threshold must too.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let bounded = [
            ("inherited_floor_assigned", self.inherited_floor_assigned),
            ("inherited_floor_unassigned", self.inherited_floor_unassigned),
            ("min_score", self.min_score),
        ];
        for (name, value) in bounded {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }
}
