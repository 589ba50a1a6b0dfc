//! Vital sign types and classification
//!
//! Contains the core data model shared by every other module:
//! - `Vital` identifiers and the five-field `Reading`
//! - Reference ranges grouped into per-age baselines
//! - The three-level `VitalStatus` ordering

pub mod age;
pub mod baseline;
pub mod classify;

pub use age::{AgeBracket, AgeResolver};
pub use baseline::BaselineTable;
pub use classify::{aggregate, classify, RangeClassifier};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::RangeError;

/// The five monitored vital signs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    Temperature,
    HeartRate,
    Spo2,
    Systolic,
    Diastolic,
}

impl Vital {
    /// Canonical ordering used whenever a five-status collection is built
    pub const ALL: [Vital; 5] = [
        Vital::Temperature,
        Vital::HeartRate,
        Vital::Spo2,
        Vital::Systolic,
        Vital::Diastolic,
    ];

    /// Key used for this vital in a telemetry frame
    pub fn key(self) -> &'static str {
        match self {
            Vital::Temperature => "TEMP",
            Vital::HeartRate => "HR",
            Vital::Spo2 => "SPO2",
            Vital::Systolic => "BPSYS",
            Vital::Diastolic => "BPDIA",
        }
    }

    /// Case-insensitive lookup of a telemetry key
    pub fn from_key(key: &str) -> Option<Self> {
        Vital::ALL
            .into_iter()
            .find(|vital| vital.key().eq_ignore_ascii_case(key))
    }

    pub fn unit(self) -> &'static str {
        match self {
            Vital::Temperature => "°C",
            Vital::HeartRate => "bpm",
            Vital::Spo2 => "%",
            Vital::Systolic | Vital::Diastolic => "mmHg",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Vital::Temperature => "temperature",
            Vital::HeartRate => "heart rate",
            Vital::Spo2 => "SpO2",
            Vital::Systolic => "systolic pressure",
            Vital::Diastolic => "diastolic pressure",
        }
    }
}

impl fmt::Display for Vital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Current value of every vital sign
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub temperature_c: f64,
    pub heart_rate_bpm: f64,
    pub spo2_percent: f64,
    pub systolic_mmhg: f64,
    pub diastolic_mmhg: f64,
}

impl Reading {
    pub fn get(&self, vital: Vital) -> f64 {
        match vital {
            Vital::Temperature => self.temperature_c,
            Vital::HeartRate => self.heart_rate_bpm,
            Vital::Spo2 => self.spo2_percent,
            Vital::Systolic => self.systolic_mmhg,
            Vital::Diastolic => self.diastolic_mmhg,
        }
    }

    pub fn set(&mut self, vital: Vital, value: f64) {
        let field = match vital {
            Vital::Temperature => &mut self.temperature_c,
            Vital::HeartRate => &mut self.heart_rate_bpm,
            Vital::Spo2 => &mut self.spo2_percent,
            Vital::Systolic => &mut self.systolic_mmhg,
            Vital::Diastolic => &mut self.diastolic_mmhg,
        };
        *field = value;
    }
}

/// Closed interval `[low, high]` a vital is expected to stay within.
///
/// Written as a two-element sequence in configuration files, e.g. `[95, 100]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 2]", into = "[f64; 2]")]
pub struct ReferenceRange {
    low: f64,
    high: f64,
}

impl ReferenceRange {
    pub fn new(low: f64, high: f64) -> Result<Self, RangeError> {
        if !low.is_finite() || !high.is_finite() {
            return Err(RangeError::NonFinite { low, high });
        }
        if low > high {
            return Err(RangeError::Inverted { low, high });
        }
        Ok(ReferenceRange { low, high })
    }

    /// Used for the built-in table, whose bounds are known to be ordered
    pub(crate) const fn from_bounds(low: f64, high: f64) -> Self {
        ReferenceRange { low, high }
    }

    pub fn low(&self) -> f64 {
        self.low
    }

    pub fn high(&self) -> f64 {
        self.high
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.low && value <= self.high
    }
}

impl TryFrom<[f64; 2]> for ReferenceRange {
    type Error = RangeError;

    fn try_from(bounds: [f64; 2]) -> Result<Self, Self::Error> {
        ReferenceRange::new(bounds[0], bounds[1])
    }
}

impl From<ReferenceRange> for [f64; 2] {
    fn from(range: ReferenceRange) -> Self {
        [range.low, range.high]
    }
}

impl fmt::Display for ReferenceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.low, self.high)
    }
}

/// Reference ranges for all five vitals at one age
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub temperature: ReferenceRange,
    pub heart_rate: ReferenceRange,
    pub spo2: ReferenceRange,
    pub systolic: ReferenceRange,
    pub diastolic: ReferenceRange,
}

impl Baseline {
    pub fn range(&self, vital: Vital) -> &ReferenceRange {
        match vital {
            Vital::Temperature => &self.temperature,
            Vital::HeartRate => &self.heart_rate,
            Vital::Spo2 => &self.spo2,
            Vital::Systolic => &self.systolic,
            Vital::Diastolic => &self.diastolic,
        }
    }

    /// A reading sitting at the centre of every range
    pub fn midpoint_reading(&self) -> Reading {
        Reading {
            temperature_c: self.temperature.midpoint(),
            heart_rate_bpm: self.heart_rate.midpoint(),
            spo2_percent: self.spo2.midpoint(),
            systolic_mmhg: self.systolic.midpoint(),
            diastolic_mmhg: self.diastolic.midpoint(),
        }
    }
}

/// Classification outcome, ordered `Normal < Warning < Danger`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VitalStatus {
    Normal,
    Warning,
    Danger,
}

/// Overall status is the worst per-vital status of a snapshot
pub type OverallStatus = VitalStatus;

impl fmt::Display for VitalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VitalStatus::Normal => write!(f, "normal"),
            VitalStatus::Warning => write!(f, "warning"),
            VitalStatus::Danger => write!(f, "danger"),
        }
    }
}
