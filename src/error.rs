use thiserror::Error;

use crate::vitals::Vital;

#[derive(Debug, Error)]
pub enum RangeError {
    #[error("Inverted range: low {low} is above high {high}")]
    Inverted { low: f64, high: f64 },
    #[error("Range bounds must be finite, got [{low}, {high}]")]
    NonFinite { low: f64, high: f64 },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Rejected non-finite value {value} for {vital}")]
    NonFinite { vital: Vital, value: f64 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum VitalsError {
    #[error(transparent)]
    Range(#[from] RangeError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
