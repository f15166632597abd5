//! Configuration loading for the advisor.
//!
//! All advisor settings can be loaded from a TOML configuration file. Every
//! section and field is optional and falls back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Complete advisor configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Decision policy thresholds
    #[serde(default)]
    pub policy: PolicyConfig,
    /// Advisory text settings
    #[serde(default)]
    pub advisory: AdvisoryConfig,
}

impl AdvisorConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses and validates configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Checks that thresholds are ordered and ratios are in range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let policy = &self.policy;
        if policy.low_max_intelligence >= policy.mid_max_intelligence {
            return Err(ConfigError::Invalid(format!(
                "low_max_intelligence ({}) must be below mid_max_intelligence ({})",
                policy.low_max_intelligence, policy.mid_max_intelligence
            )));
        }
        if policy.grid_unit_ft == 0 {
            return Err(ConfigError::Invalid("grid_unit_ft must be positive".to_string()));
        }
        for (name, value) in [
            ("ally_low_health_ratio", policy.ally_low_health_ratio),
            ("flee_health_ratio", policy.flee_health_ratio),
            ("aid_chance", policy.aid_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{} must be between 0 and 1, got {}",
                    name, value
                )));
            }
        }
        if !policy.engagement_range.is_finite() || policy.engagement_range < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "engagement_range must be finite and not negative, got {}",
                policy.engagement_range
            )));
        }
        Ok(())
    }
}

/// Thresholds of the intelligence-tiered decision policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Highest intelligence that still uses the low tier
    pub low_max_intelligence: i32,
    /// Highest intelligence that still uses the mid tier
    pub mid_max_intelligence: i32,
    /// Feet per grid square
    pub grid_unit_ft: u32,
    /// Actions must reach strictly further than this to count as ranged
    pub ranged_min_range_ft: u32,
    /// Allies below this fraction of max health may be aided
    pub ally_low_health_ratio: f64,
    /// NPCs below this fraction of max health try to flee
    pub flee_health_ratio: f64,
    /// Probability of switching target to aid a wounded ally
    pub aid_chance: f64,
    /// Canvas distance at which the target counts as already engaged
    pub engagement_range: f64,
    /// Skip players at zero hit points or below when choosing targets
    pub ignore_downed_players: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            low_max_intelligence: 4,
            mid_max_intelligence: 7,
            grid_unit_ft: 5,
            ranged_min_range_ft: 5,
            ally_low_health_ratio: 0.25,
            flee_health_ratio: 0.75,
            aid_chance: 0.5,
            engagement_range: 30.0,
            ignore_downed_players: true,
        }
    }
}

/// Advisory text settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryConfig {
    /// Include the ability modifier line
    pub include_attributes: bool,
    /// Speaker name shown on whispered advisories
    pub speaker: String,
}

impl Default for AdvisoryConfig {
    fn default() -> Self {
        Self {
            include_attributes: true,
            speaker: "NPC Advisor".to_string(),
        }
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# NPC Turn Advisor Configuration

[policy]
low_max_intelligence = 4
mid_max_intelligence = 7
grid_unit_ft = 5
ranged_min_range_ft = 5
ally_low_health_ratio = 0.25
flee_health_ratio = 0.75
aid_chance = 0.5
engagement_range = 30.0
ignore_downed_players = true

[advisory]
include_attributes = true
speaker = "NPC Advisor"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AdvisorConfig::default();

        assert_eq!(config.policy.low_max_intelligence, 4);
        assert_eq!(config.policy.mid_max_intelligence, 7);
        assert_eq!(config.policy.grid_unit_ft, 5);
        assert_eq!(config.policy.aid_chance, 0.5);
        assert!(config.advisory.include_attributes);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml = r#"
            [policy]
            aid_chance = 1.0
        "#;

        let config = AdvisorConfig::from_str(toml).unwrap();

        // Specified value
        assert_eq!(config.policy.aid_chance, 1.0);
        // Default values
        assert_eq!(config.policy.flee_health_ratio, 0.75);
        assert_eq!(config.advisory.speaker, "NPC Advisor");
    }

    #[test]
    fn test_default_config_toml_parses() {
        let config = AdvisorConfig::from_str(&default_config_toml()).unwrap();
        assert_eq!(config, AdvisorConfig::default());
    }

    #[test]
    fn test_config_to_toml() {
        let toml = AdvisorConfig::default().to_toml().unwrap();

        assert!(toml.contains("[policy]"));
        assert!(toml.contains("[advisory]"));
        assert_eq!(AdvisorConfig::from_str(&toml).unwrap(), AdvisorConfig::default());
    }

    #[test]
    fn test_rejects_overlapping_tiers() {
        let toml = r#"
            [policy]
            low_max_intelligence = 7
            mid_max_intelligence = 7
        "#;

        let err = AdvisorConfig::from_str(toml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_rejects_ratio_out_of_range() {
        let toml = r#"
            [policy]
            flee_health_ratio = 1.5
        "#;

        let err = AdvisorConfig::from_str(toml).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: flee_health_ratio must be between 0 and 1, got 1.5"
        );
    }

    #[test]
    fn test_rejects_nan_thresholds() {
        for toml in [
            "[policy]\nengagement_range = nan",
            "[policy]\nengagement_range = inf",
            "[policy]\naid_chance = nan",
        ] {
            let err = AdvisorConfig::from_str(toml).unwrap_err();
            assert!(matches!(err, ConfigError::Invalid(_)), "{}", toml);
        }
    }

    #[test]
    fn test_rejects_malformed_toml() {
        let err = AdvisorConfig::from_str("[policy\n").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[advisory]\ninclude_attributes = false").unwrap();

        let config = AdvisorConfig::from_file(file.path()).unwrap();
        assert!(!config.advisory.include_attributes);
    }

    #[test]
    fn test_missing_file() {
        let err = AdvisorConfig::from_file(Path::new("/nonexistent/advisor.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
