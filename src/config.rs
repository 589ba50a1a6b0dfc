use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;
use crate::vitals::BaselineTable;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub subject: SubjectConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Overrides the built-in reference ranges when present
    #[serde(default)]
    pub baselines: BaselineTable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectConfig {
    /// RFC 3339 birth timestamp
    pub birth: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_interval_ms() -> u64 {
    2000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            enabled: false,
            interval_ms: default_interval_ms(),
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Config {
    /// Built-in defaults for a subject born at `birth`
    pub fn with_birth(birth: DateTime<Utc>) -> Self {
        Config {
            subject: SubjectConfig { birth },
            simulation: SimulationConfig::default(),
            baselines: BaselineTable::default(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.simulation.interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "simulation.interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = serde_yaml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = parse_config("subject:\n  birth: 2024-05-01T06:30:00Z\n").unwrap();

        assert_eq!(
            config.subject.birth,
            Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap()
        );
        assert_eq!(config.simulation, SimulationConfig::default());
        assert_eq!(config.baselines, BaselineTable::default());
    }

    #[test]
    fn test_simulation_section() {
        let yaml = r#"
subject:
  birth: 2024-05-01T06:30:00+02:00
simulation:
  enabled: true
  interval_ms: 500
  seed: 9
"#;
        let config = parse_config(yaml).unwrap();
        assert!(config.simulation.enabled);
        assert_eq!(config.simulation.interval(), Duration::from_millis(500));
        assert_eq!(config.simulation.seed, Some(9));
        assert_eq!(
            config.subject.birth,
            Utc.with_ymd_and_hms(2024, 5, 1, 4, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_zero_interval_rejected() {
        let yaml = "subject:\n  birth: 2024-05-01T00:00:00Z\nsimulation:\n  interval_ms: 0\n";
        assert!(matches!(parse_config(yaml), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_inverted_baseline_range_rejected() {
        let mut yaml = String::from("subject:\n  birth: 2024-05-01T00:00:00Z\nbaselines:\n");
        for group in ["newborn", "weeks", "early_months", "later_months"] {
            yaml.push_str(&format!("  {}:\n", group));
            yaml.push_str("    temperature: [37.5, 36.5]\n");
            yaml.push_str("    heart_rate: [100, 160]\n");
            yaml.push_str("    spo2: [95, 100]\n");
            yaml.push_str("    systolic: [60, 80]\n");
            yaml.push_str("    diastolic: [30, 50]\n");
        }
        assert!(matches!(parse_config(&yaml), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_config(Path::new("/nonexistent/infantvitals.yaml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
