//! Ambient reading simulation
//!
//! Stands in for the sensor when none is attached. Each tick draws a fresh
//! value for every vital from the inner (normal) part of its reference
//! range and writes it to the store. Ticks are suppressed while the current
//! overall status is `Danger`, so a critical reading stays visible until
//! real telemetry or an explicit reset replaces it.

use chrono::{DateTime, Local, TimeZone};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::monitor::VitalsMonitor;
use crate::telemetry::DecodedFrame;
use crate::vitals::classify::{WARNING_BAND_FRACTION, WIDTH_EPSILON};
use crate::vitals::{Baseline, RangeClassifier, ReferenceRange, Vital, VitalStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Applied(u64),
    Suppressed,
}

/// Tick counts from one `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub applied: u64,
    pub suppressed: u64,
}

pub struct Simulator {
    monitor: Arc<VitalsMonitor>,
    rng: StdRng,
}

impl Simulator {
    pub fn new(monitor: Arc<VitalsMonitor>) -> Self {
        Simulator {
            monitor,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(monitor: Arc<VitalsMonitor>, seed: u64) -> Self {
        Simulator {
            monitor,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn tick(&mut self) -> TickOutcome {
        self.tick_at(&Local::now())
    }

    pub fn tick_at<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> TickOutcome {
        let baseline = *self.monitor.baseline_at(now);
        let frame = self.ambient_frame(&baseline);
        let classifier = RangeClassifier::new(&baseline);

        let outcome = self
            .monitor
            .store()
            .apply_unless(&frame, |reading| classifier.overall(reading) == VitalStatus::Danger);

        match outcome {
            Some(sequence) => {
                debug!(sequence, "Applied simulated reading");
                TickOutcome::Applied(sequence)
            }
            None => {
                warn!("Simulated update suppressed while status is danger");
                TickOutcome::Suppressed
            }
        }
    }

    /// Tick every `period` until `shutdown` resolves
    pub async fn run<F>(mut self, period: Duration, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(period);
        let mut summary = RunSummary::default();
        tokio::pin!(shutdown);

        info!(period_ms = period.as_millis() as u64, "Simulator started");
        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                _ = interval.tick() => match self.tick() {
                    TickOutcome::Applied(_) => summary.applied += 1,
                    TickOutcome::Suppressed => summary.suppressed += 1,
                },
            }
        }
        info!(applied = summary.applied, suppressed = summary.suppressed, "Simulator stopped");
        summary
    }

    fn ambient_frame(&mut self, baseline: &Baseline) -> DecodedFrame {
        let mut frame = DecodedFrame::new();
        for vital in Vital::ALL {
            let value = self.sample_normal(baseline.range(vital));
            frame.push(vital, value);
        }
        frame
    }

    fn sample_normal(&mut self, range: &ReferenceRange) -> f64 {
        let width = (range.high() - range.low()).max(WIDTH_EPSILON);
        let band = width * WARNING_BAND_FRACTION;
        let (low, high) = (range.low() + band, range.high() - band);
        if low >= high {
            return range.midpoint();
        }
        self.rng.gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vitals::{AgeResolver, BaselineTable};
    use chrono::{Duration as ChronoDuration, Utc};
    use pretty_assertions::assert_eq;

    fn monitor() -> Arc<VitalsMonitor> {
        let birth = Utc::now() - ChronoDuration::days(40);
        Arc::new(VitalsMonitor::new(
            Arc::new(BaselineTable::default()),
            AgeResolver::new(birth),
        ))
    }

    #[test]
    fn test_ticks_stay_within_range() {
        let monitor = monitor();
        let mut simulator = Simulator::with_seed(Arc::clone(&monitor), 7);
        let now = Utc::now();

        for expected in 1..=200 {
            assert_eq!(simulator.tick_at(&now), TickOutcome::Applied(expected));
            let assessment = monitor.assess_at(&now);
            for entry in &assessment.vitals {
                assert!(
                    entry.status != VitalStatus::Danger,
                    "{} drifted to {}",
                    entry.vital,
                    entry.value
                );
            }
        }
    }

    #[test]
    fn test_suppressed_during_danger() {
        let monitor = monitor();
        let mut simulator = Simulator::with_seed(Arc::clone(&monitor), 11);
        let now = Utc::now();

        let sequence = monitor.ingest_line("SPO2:80");
        assert_eq!(simulator.tick_at(&now), TickOutcome::Suppressed);
        assert_eq!(monitor.store().sequence(), sequence);
        assert_eq!(monitor.store().snapshot().reading.spo2_percent, 80.0);

        monitor.reset_at(&now);
        assert!(matches!(simulator.tick_at(&now), TickOutcome::Applied(_)));
    }

    #[test]
    fn test_warning_does_not_suppress() {
        let monitor = monitor();
        let mut simulator = Simulator::with_seed(Arc::clone(&monitor), 3);
        let now = Utc::now();

        monitor.ingest_line("HR:101");
        assert_eq!(monitor.overall_at(&now), VitalStatus::Warning);
        assert!(matches!(simulator.tick_at(&now), TickOutcome::Applied(_)));
    }

    #[test]
    fn test_same_seed_same_readings() {
        let first = monitor();
        let second = monitor();
        let now = Utc::now();

        Simulator::with_seed(Arc::clone(&first), 42).tick_at(&now);
        Simulator::with_seed(Arc::clone(&second), 42).tick_at(&now);
        assert_eq!(
            first.store().snapshot().reading,
            second.store().snapshot().reading
        );
    }

    #[tokio::test]
    async fn test_run_until_shutdown() {
        let monitor = monitor();
        let simulator = Simulator::with_seed(Arc::clone(&monitor), 5);

        let summary = simulator
            .run(Duration::from_millis(5), tokio::time::sleep(Duration::from_millis(60)))
            .await;

        assert!(summary.applied >= 1);
        assert_eq!(summary.suppressed, 0);
        assert_eq!(monitor.store().sequence(), summary.applied);
    }
}
