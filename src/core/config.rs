//! Top-level progression configuration
//!
//! Every section uses `#[serde(default)]`, so a config file only needs to
//! name the values it overrides. Missing files are not an error for callers
//! that fall back to `ProgressionConfig::default()`.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{ProgressionError, Result};
use crate::integration::config::IntegrationConfig;
use crate::milestones::milestone::MilestoneConfig;
use crate::progression::config::SkillConfig;

/// Configuration for all three progression managers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressionConfig {
    pub milestones: MilestoneConfig,
    pub integration: IntegrationConfig,
    pub skills: SkillConfig,
}

impl ProgressionConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a TOML config file
    pub fn load_from_toml(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config = Self::parse_toml(&content)?;
        tracing::info!("Loaded progression config from {}", path.as_ref().display());
        Ok(config)
    }

    /// Parse and validate TOML text
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.milestones
            .validate()
            .map_err(|e| ProgressionError::InvalidConfig(format!("milestones: {}", e)))?;
        self.integration
            .validate()
            .map_err(|e| ProgressionError::InvalidConfig(format!("integration: {}", e)))?;
        self.skills
            .validate()
            .map_err(|e| ProgressionError::InvalidConfig(format!("skills: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ProgressionConfig::new().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = ProgressionConfig::parse_toml("").unwrap();
        assert_eq!(config.milestones.completion_threshold, 1.0);
        assert_eq!(config.skills.starting_skill_points, 3);
        assert!(config.integration.enable_streaks);
    }

    #[test]
    fn test_partial_override() {
        let config = ProgressionConfig::parse_toml(
            r#"
            [skills]
            starting_skill_points = 7

            [integration]
            enable_combos = false
            "#,
        )
        .unwrap();
        assert_eq!(config.skills.starting_skill_points, 7);
        assert_eq!(config.skills.max_player_level, 100);
        assert!(!config.integration.enable_combos);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ProgressionConfig::parse_toml(
            r#"
            [milestones]
            completion_threshold = 2.0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ProgressionError::InvalidConfig(_)));
    }

    #[test]
    fn test_malformed_toml() {
        let err = ProgressionConfig::parse_toml("[skills").unwrap_err();
        assert!(matches!(err, ProgressionError::TomlError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = ProgressionConfig::load_from_toml("/nonexistent/progression.toml").unwrap_err();
        assert!(matches!(err, ProgressionError::IoError(_)));
    }
}
