//! InfantVitals: telemetry decoding and vital sign classification for infant monitors
//!
//! Decodes the compact key-value lines sent by a remote sensor, keeps the
//! latest reading per vital, and classifies each reading against reference
//! ranges chosen from the subject's age.

pub mod config;
pub mod error;
pub mod monitor;
pub mod simulation;
pub mod storage;
pub mod telemetry;
pub mod vitals;

pub use error::VitalsError;
pub use monitor::{Assessment, VitalAssessment, VitalsMonitor};
pub use storage::{ReadingSnapshot, ReadingStore};
pub use telemetry::{decode_bytes, decode_frame, DecodedFrame};
pub use vitals::{
    AgeBracket, AgeResolver, Baseline, BaselineTable, OverallStatus, Reading, ReferenceRange,
    Vital, VitalStatus,
};
