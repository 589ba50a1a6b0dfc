use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, info};

use crate::storage::{ReadingSnapshot, ReadingStore};
use crate::telemetry::{decode_bytes, decode_frame, DecodedFrame};
use crate::vitals::{
    AgeBracket, AgeResolver, Baseline, BaselineTable, OverallStatus, RangeClassifier, Reading,
    Vital, VitalStatus,
};

/// Status of one vital within an assessment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VitalAssessment {
    pub vital: Vital,
    pub value: f64,
    pub status: VitalStatus,
}

/// Classification of one reading snapshot, handed to presentation and
/// alerting consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub sequence: u64,
    pub reading: Reading,
    pub bracket: AgeBracket,
    pub baseline: Baseline,
    pub vitals: Vec<VitalAssessment>,
    pub overall: OverallStatus,
}

impl Assessment {
    pub fn status(&self, vital: Vital) -> Option<VitalStatus> {
        self.vitals
            .iter()
            .find(|entry| entry.vital == vital)
            .map(|entry| entry.status)
    }

    /// Plain-text rendering for narrative and alert consumers
    pub fn summary(&self) -> String {
        let mut text = format!("Overall status: {} (age bracket: {}).", self.overall, self.bracket);
        for entry in &self.vitals {
            let range = self.baseline.range(entry.vital);
            // Writing into a String cannot fail.
            let _ = write!(
                text,
                " {} {} {} is {} (reference {} {}).",
                capitalize(entry.vital.label()),
                entry.value,
                entry.vital.unit(),
                entry.status,
                range,
                entry.vital.unit(),
            );
        }
        text
    }
}

fn capitalize(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Ties the store, baseline table and age resolver together.
///
/// The transport feeds lines through `ingest_line`; consumers call
/// `assess` whenever they need a classification.
#[derive(Debug)]
pub struct VitalsMonitor {
    store: Arc<ReadingStore>,
    table: Arc<BaselineTable>,
    resolver: AgeResolver,
}

impl VitalsMonitor {
    /// Start with every vital at the middle of its current reference range
    pub fn new(table: Arc<BaselineTable>, resolver: AgeResolver) -> Self {
        let initial = table.baseline(resolver.resolve()).midpoint_reading();
        VitalsMonitor::with_store(Arc::new(ReadingStore::new(initial)), table, resolver)
    }

    pub fn with_store(
        store: Arc<ReadingStore>,
        table: Arc<BaselineTable>,
        resolver: AgeResolver,
    ) -> Self {
        VitalsMonitor {
            store,
            table,
            resolver,
        }
    }

    pub fn store(&self) -> &Arc<ReadingStore> {
        &self.store
    }

    pub fn table(&self) -> &BaselineTable {
        &self.table
    }

    pub fn resolver(&self) -> &AgeResolver {
        &self.resolver
    }

    /// Baseline for the subject's age as of `now`
    pub fn baseline_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> &Baseline {
        self.table.baseline(self.resolver.resolve_at(now))
    }

    /// Decode one telemetry line and apply it as a single update.
    /// Returns the store sequence afterwards.
    pub fn ingest_line(&self, line: &str) -> u64 {
        self.ingest_frame(decode_frame(line))
    }

    /// Same as `ingest_line` for raw transport bytes, which may not be UTF-8
    pub fn ingest_bytes(&self, line: &[u8]) -> u64 {
        self.ingest_frame(decode_bytes(line))
    }

    fn ingest_frame(&self, frame: DecodedFrame) -> u64 {
        if frame.is_empty() {
            debug!("Telemetry line carried no usable fields");
        }
        self.store.apply(&frame)
    }

    pub fn assess(&self) -> Assessment {
        self.assess_at(&chrono::Local::now())
    }

    pub fn assess_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> Assessment {
        let bracket = self.resolver.resolve_at(now);
        self.assess_snapshot(self.store.snapshot(), bracket)
    }

    /// Classify an already-taken snapshot for a given bracket
    pub fn assess_snapshot(&self, snapshot: ReadingSnapshot, bracket: AgeBracket) -> Assessment {
        let baseline = *self.table.baseline(bracket);
        let classifier = RangeClassifier::new(&baseline);
        let reading = snapshot.reading;

        let vitals: Vec<VitalAssessment> = classifier
            .statuses(&reading)
            .into_iter()
            .map(|(vital, status)| VitalAssessment {
                vital,
                value: reading.get(vital),
                status,
            })
            .collect();
        let overall = crate::vitals::aggregate(vitals.iter().map(|entry| entry.status));

        Assessment {
            sequence: snapshot.sequence,
            reading,
            bracket,
            baseline,
            vitals,
            overall,
        }
    }

    pub fn overall_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> OverallStatus {
        RangeClassifier::new(self.baseline_at(now)).overall(&self.store.snapshot().reading)
    }

    /// Explicit reset: the only way to clear a `Danger` reading other than
    /// new telemetry
    pub fn reset(&self) -> u64 {
        self.reset_at(&chrono::Local::now())
    }

    pub fn reset_at<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> u64 {
        let sequence = self.store.replace(self.baseline_at(now).midpoint_reading());
        info!(sequence, "Readings reset to baseline midpoints");
        sequence
    }
}
