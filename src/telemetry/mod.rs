//! Sensor telemetry handling
//!
//! Turns the compact `KEY:value,KEY:value` lines emitted by the remote
//! sensor into typed field updates. Malformed pairs are dropped one at a
//! time; a frame as a whole never fails.

pub mod decoder;

pub use decoder::{decode_bytes, decode_frame};

use serde::{Deserialize, Serialize};

use crate::vitals::{Reading, Vital};

/// Field updates recognised in one telemetry line, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedFrame {
    fields: Vec<(Vital, f64)>,
}

impl DecodedFrame {
    pub fn new() -> Self {
        DecodedFrame { fields: Vec::new() }
    }

    pub fn push(&mut self, vital: Vital, value: f64) {
        self.fields.push((vital, value));
    }

    pub fn fields(&self) -> &[(Vital, f64)] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Latest value decoded for `vital`, if any
    pub fn get(&self, vital: Vital) -> Option<f64> {
        self.fields
            .iter()
            .rev()
            .find(|(v, _)| *v == vital)
            .map(|(_, value)| *value)
    }

    /// Write every field into `reading`, in order
    pub fn apply_to(&self, reading: &mut Reading) {
        for &(vital, value) in &self.fields {
            reading.set(vital, value);
        }
    }
}
