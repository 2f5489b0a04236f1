//! Parallel import of a selection of proteins.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use rayon::prelude::*;

use pepgeom_core::{PepgeomError, Result, Summarizable};

use crate::classifier::SecondaryStructureClassifier;
use crate::config::SpliceConfig;
use crate::pipeline::{FailureReport, ProteinTask, Services, UnitOutcome, UnitResult};
use crate::resolver::ResolutionReport;
use crate::selection::SelectionEntry;
use crate::source::StructureSource;
use crate::store::GeometryStore;

/// Cooperative stop request shared between a batch and whoever stops it.
///
/// Proteins already being imported finish; proteins not yet started are
/// reported as cancelled.
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal(Arc<AtomicBool>);

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_triggered(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Point-in-time view of batch progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressSnapshot {
    pub processed: usize,
    pub total: usize,
    pub elapsed: Duration,
    /// Linear extrapolation from the rate so far. `None` before the first
    /// unit finishes.
    pub remaining: Option<Duration>,
}

impl ProgressSnapshot {
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            100.0
        } else {
            100.0 * self.processed as f64 / self.total as f64
        }
    }
}

/// Time left if the remaining units take as long on average as the done ones.
pub fn estimate_remaining(elapsed: Duration, processed: usize, total: usize) -> Option<Duration> {
    if processed == 0 {
        return None;
    }
    let left = total.saturating_sub(processed) as f64;
    Some(elapsed.mul_f64(left / processed as f64))
}

/// Counts finished units; shared by every worker.
#[derive(Debug)]
pub struct Progress {
    started: Instant,
    total: usize,
    processed: Mutex<usize>,
}

impl Progress {
    pub fn new(total: usize) -> Self {
        Self {
            started: Instant::now(),
            total,
            processed: Mutex::new(0),
        }
    }

    /// Count one finished unit and log the new position. The line is written
    /// under the lock, so logged positions never go backwards.
    pub fn advance(&self, code: &str) -> ProgressSnapshot {
        let mut processed = self
            .processed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *processed += 1;
        let elapsed = self.started.elapsed();
        let snapshot = ProgressSnapshot {
            processed: *processed,
            total: self.total,
            elapsed,
            remaining: estimate_remaining(elapsed, *processed, self.total),
        };
        log::info!(
            "{}: {}/{} ({:.1}%), elapsed {:.1}s, remaining {}",
            code,
            snapshot.processed,
            snapshot.total,
            snapshot.percent(),
            elapsed.as_secs_f64(),
            snapshot
                .remaining
                .map_or_else(|| "unknown".to_string(), |d| format!("{:.1}s", d.as_secs_f64())),
        );
        drop(processed);
        snapshot
    }
}

/// What a batch did.
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// Per-protein results, in selection order.
    pub units: Vec<UnitResult>,
    pub imported: usize,
    pub skipped: usize,
    pub failed: usize,
    pub cancelled: usize,
    /// Residue accounting over every imported protein.
    pub report: ResolutionReport,
    pub elapsed: Duration,
}

impl BatchSummary {
    fn from_units(units: Vec<UnitResult>, elapsed: Duration) -> Self {
        let mut summary = BatchSummary {
            elapsed,
            ..Default::default()
        };
        for unit in &units {
            match &unit.outcome {
                UnitOutcome::Done { report, .. } => {
                    summary.imported += 1;
                    summary.report += *report;
                }
                UnitOutcome::Skipped => summary.skipped += 1,
                UnitOutcome::Failed(_) => summary.failed += 1,
                UnitOutcome::Cancelled => summary.cancelled += 1,
            }
        }
        summary.units = units;
        summary
    }

    /// Failed proteins and why.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &FailureReport)> {
        self.units.iter().filter_map(|u| match &u.outcome {
            UnitOutcome::Failed(f) => Some((u.code.as_str(), f)),
            _ => None,
        })
    }
}

impl Summarizable for BatchSummary {
    fn summary(&self) -> String {
        format!(
            "{} proteins in {:.1}s: {} imported, {} skipped, {} failed, {} cancelled; residues {}",
            self.units.len(),
            self.elapsed.as_secs_f64(),
            self.imported,
            self.skipped,
            self.failed,
            self.cancelled,
            self.report.summary(),
        )
    }
}

/// Imports proteins on a fixed-size worker pool, one protein per task.
pub struct BatchRunner<'a> {
    config: SpliceConfig,
    source: &'a dyn StructureSource,
    classifier: &'a dyn SecondaryStructureClassifier,
    store: &'a dyn GeometryStore,
    shutdown: ShutdownSignal,
}

impl<'a> BatchRunner<'a> {
    pub fn new(
        config: SpliceConfig,
        source: &'a dyn StructureSource,
        classifier: &'a dyn SecondaryStructureClassifier,
        store: &'a dyn GeometryStore,
    ) -> Self {
        Self {
            config,
            source,
            classifier,
            store,
            shutdown: ShutdownSignal::new(),
        }
    }

    pub fn with_shutdown(mut self, shutdown: ShutdownSignal) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// A handle that stops this runner's batches.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.clone()
    }

    pub fn config(&self) -> &SpliceConfig {
        &self.config
    }

    /// Import every entry. Per-protein failures are reported in the summary;
    /// only an unusable configuration or worker pool is an error.
    pub fn run(&self, entries: &[SelectionEntry]) -> Result<BatchSummary> {
        self.config.validate()?;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.workers)
            .thread_name(|i| format!("pepgeom-worker-{}", i))
            .build()
            .map_err(|e| PepgeomError::Other(format!("cannot start worker pool: {}", e)))?;

        log::info!(
            "importing {} proteins on {} workers",
            entries.len(),
            self.config.workers
        );
        let started = Instant::now();
        let progress = Progress::new(entries.len());
        let services = Services {
            source: self.source,
            classifier: self.classifier,
            store: self.store,
        };

        let units: Vec<UnitResult> = pool.install(|| {
            entries
                .par_iter()
                .with_max_len(1)
                .map(|entry| {
                    if self.shutdown.is_triggered() {
                        return UnitResult::cancelled(&entry.code);
                    }
                    let result = ProteinTask::new(entry, &self.config, services).run();
                    progress.advance(&result.code);
                    result
                })
                .collect()
        });

        let summary = BatchSummary::from_units(units, started.elapsed());
        if summary.cancelled > 0 {
            log::warn!("shutdown requested, {} proteins not started", summary.cancelled);
        }
        log::info!("{}", summary.summary());
        Ok(summary)
    }
}
