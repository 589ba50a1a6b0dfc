use chrono::Utc;
use std::env;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::oneshot;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use infantvitals::config::{load_config, Config};
use infantvitals::error::ConfigError;
use infantvitals::simulation::Simulator;
use infantvitals::{AgeResolver, VitalStatus, VitalsError, VitalsMonitor};

const REPORT_INTERVAL: Duration = Duration::from_millis(500);

#[tokio::main]
async fn main() -> Result<(), VitalsError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("infantvitals=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.yaml"));
    let config = match load_config(&path) {
        Ok(config) => config,
        Err(ConfigError::Io(err)) if err.kind() == ErrorKind::NotFound => {
            warn!(
                path = %path.display(),
                "Config file not found, using defaults with birth set to now"
            );
            Config::with_birth(Utc::now())
        }
        Err(err) => return Err(err.into()),
    };

    let table = Arc::new(config.baselines.clone());
    let monitor = Arc::new(VitalsMonitor::new(table, AgeResolver::new(config.subject.birth)));
    info!(
        birth = %config.subject.birth,
        bracket = %monitor.resolver().resolve(),
        "Starting monitor"
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let simulator_handle = if config.simulation.enabled {
        let simulator = match config.simulation.seed {
            Some(seed) => Simulator::with_seed(Arc::clone(&monitor), seed),
            None => Simulator::new(Arc::clone(&monitor)),
        };
        let shutdown = async move {
            shutdown_rx.await.ok();
        };
        Some(tokio::spawn(simulator.run(config.simulation.interval(), shutdown)))
    } else {
        None
    };

    let mut input = BufReader::new(tokio::io::stdin());
    // Partial reads survive a cancelled `read_until`, so the buffer is only
    // cleared once a whole line has been ingested.
    let mut line = Vec::new();
    let mut stdin_open = true;
    let mut reported = None;
    let mut report_tick = tokio::time::interval(REPORT_INTERVAL);
    let ctrl_c = signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Ctrl+C received, starting graceful shutdown");
                break;
            }
            read = input.read_until(b'\n', &mut line), if stdin_open => match read? {
                0 => {
                    if !line.is_empty() {
                        monitor.ingest_bytes(&line);
                        line.clear();
                        report(&monitor, &mut reported);
                    }
                    if simulator_handle.is_none() {
                        info!("Telemetry input closed");
                        break;
                    }
                    info!("Telemetry input closed, simulator keeps running");
                    stdin_open = false;
                }
                _ => {
                    monitor.ingest_bytes(&line);
                    line.clear();
                    report(&monitor, &mut reported);
                }
            },
            _ = report_tick.tick() => report(&monitor, &mut reported),
        }
    }

    shutdown_tx.send(()).ok();
    if let Some(handle) = simulator_handle {
        let summary = handle.await?;
        info!(applied = summary.applied, suppressed = summary.suppressed, "Simulator finished");
    }

    info!("Monitor shutdown complete");
    Ok(())
}

/// Print the current assessment as one JSON line if the store changed since
/// the last report
fn report(monitor: &VitalsMonitor, reported: &mut Option<u64>) {
    if reported.is_some_and(|last| !monitor.store().changed_since(last)) {
        return;
    }

    let assessment = monitor.assess();
    match serde_json::to_string(&assessment) {
        Ok(json) => println!("{}", json),
        Err(err) => warn!(error = %err, "Failed to serialize assessment"),
    }
    if assessment.overall == VitalStatus::Danger {
        warn!(sequence = assessment.sequence, "{}", assessment.summary());
    }
    *reported = Some(assessment.sequence);
}
