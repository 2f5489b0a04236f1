//! One protein, start to finish.
//!
//! ```text
//! Pending -> Parsing -> Walking -> Committing -> Done
//!    |          |          |            |
//!    +----------+----------+------------+-----> Failed
//!    +-> Skipped (stored results are current)
//! ```

use core::fmt;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use pepgeom_core::{PepgeomError, Result, Summarizable};
use pepgeom_struct::types::Structure;

use crate::classifier::SecondaryStructureClassifier;
use crate::config::SpliceConfig;
use crate::record::{ProteinMeta, ProteinRecord};
use crate::resolver::{resolve_structure, ResolutionReport};
use crate::selection::SelectionEntry;
use crate::source::{load_structure, modified_at, StructureSource};
use crate::store::GeometryStore;
use crate::walker::{ChainWalker, ResidueContext};

/// Where a protein is in its import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    Pending,
    Parsing,
    Walking,
    Committing,
    Done,
    Skipped,
    Failed,
    /// Never started because the batch was shut down.
    Cancelled,
}

impl UnitState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            UnitState::Done | UnitState::Skipped | UnitState::Failed | UnitState::Cancelled
        )
    }
}

impl fmt::Display for UnitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UnitState::Pending => "pending",
            UnitState::Parsing => "parsing",
            UnitState::Walking => "walking",
            UnitState::Committing => "committing",
            UnitState::Done => "done",
            UnitState::Skipped => "skipped",
            UnitState::Failed => "failed",
            UnitState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

/// Why a protein failed.
#[derive(Debug)]
pub struct FailureReport {
    /// The state the protein was in when the error surfaced.
    pub stage: UnitState,
    /// The residue being measured, for failures while walking.
    pub context: Option<ResidueContext>,
    pub error: PepgeomError,
}

impl fmt::Display for FailureReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "while {}", self.stage)?;
        if let Some(context) = &self.context {
            write!(f, " at {}", context)?;
        }
        write!(f, ": {}", self.error)
    }
}

/// How a protein's import ended.
#[derive(Debug)]
pub enum UnitOutcome {
    Done {
        residues: usize,
        report: ResolutionReport,
    },
    Skipped,
    Failed(FailureReport),
    Cancelled,
}

impl UnitOutcome {
    pub fn state(&self) -> UnitState {
        match self {
            UnitOutcome::Done { .. } => UnitState::Done,
            UnitOutcome::Skipped => UnitState::Skipped,
            UnitOutcome::Failed(_) => UnitState::Failed,
            UnitOutcome::Cancelled => UnitState::Cancelled,
        }
    }
}

/// Outcome and timing of one protein.
#[derive(Debug)]
pub struct UnitResult {
    pub code: String,
    pub outcome: UnitOutcome,
    pub elapsed: Duration,
}

impl UnitResult {
    pub fn cancelled(code: &str) -> Self {
        Self {
            code: code.to_string(),
            outcome: UnitOutcome::Cancelled,
            elapsed: Duration::ZERO,
        }
    }
}

/// The collaborators a protein import needs.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub source: &'a dyn StructureSource,
    pub classifier: &'a dyn SecondaryStructureClassifier,
    pub store: &'a dyn GeometryStore,
}

/// Import of a single protein.
pub struct ProteinTask<'a> {
    entry: &'a SelectionEntry,
    config: &'a SpliceConfig,
    services: Services<'a>,
    state: UnitState,
    context: Option<ResidueContext>,
}

impl<'a> ProteinTask<'a> {
    pub fn new(entry: &'a SelectionEntry, config: &'a SpliceConfig, services: Services<'a>) -> Self {
        Self {
            entry,
            config,
            services,
            state: UnitState::Pending,
            context: None,
        }
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    fn enter(&mut self, next: UnitState) {
        log::trace!("{}: {} -> {}", self.entry.code, self.state, next);
        self.state = next;
    }

    /// Run the import to a terminal state. Errors never escape, and neither
    /// do panics from the parser or a collaborator; both become
    /// [`UnitOutcome::Failed`].
    pub fn run(mut self) -> UnitResult {
        let started = Instant::now();
        let code = self.entry.code.clone();

        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.import()));
        let outcome = match attempt.unwrap_or_else(|payload| Err(panic_error(payload))) {
            Ok(outcome) => outcome,
            Err(error) => {
                let failure = FailureReport {
                    stage: self.state,
                    context: self.context.take(),
                    error,
                };
                log::error!("{}: {}", code, failure);
                UnitOutcome::Failed(failure)
            }
        };
        self.enter(outcome.state());

        UnitResult {
            code,
            outcome,
            elapsed: started.elapsed(),
        }
    }

    fn import(&mut self) -> Result<UnitOutcome> {
        let entry = self.entry;
        let Services {
            source,
            classifier,
            store,
        } = self.services;
        let code = entry.code.as_str();
        let path = source.locate(code)?;
        let modified = modified_at(&path)?;

        if self.config.skip_unchanged {
            if let Some(stored) = store.source_timestamp(code)? {
                if stored >= modified {
                    log::info!("{}: stored results are current, skipping", code);
                    return Ok(UnitOutcome::Skipped);
                }
            }
        }

        self.enter(UnitState::Parsing);
        let loaded = load_structure(&path)?;
        let (chains, report) = resolve_structure(&loaded.structure, |id| entry.accepts_chain(id));
        log::info!("{}: {}", code, report.summary());

        let resolved = Structure {
            id: code.to_string(),
            chains: chains.iter().map(|c| c.to_chain()).collect(),
        };
        let classes = classifier.classify(&resolved)?;
        if classes.is_empty() {
            return Err(PepgeomError::Classifier(format!(
                "no secondary structure assigned for {}",
                code
            )));
        }

        self.enter(UnitState::Walking);
        let mut walker = ChainWalker::new(self.config.chain_break_distance);
        let mut records = Vec::with_capacity(chains.len());
        for chain in &chains {
            match walker.walk(chain, &classes) {
                Ok(record) => records.push(record),
                Err(e) => {
                    self.context = walker.last_residue().cloned();
                    return Err(e);
                }
            }
        }
        let record = ProteinRecord {
            meta: ProteinMeta::from_selection(entry, modified, loaded.digest),
            chains: records,
        };

        self.enter(UnitState::Committing);
        let mut tx = store.begin()?;
        if let Err(e) = tx.upsert(&record) {
            tx.rollback();
            return Err(e);
        }
        tx.commit()?;

        let residues = record.residue_count();
        log::debug!("{}: committed {}", code, record.summary());
        Ok(UnitOutcome::Done { residues, report })
    }
}

fn panic_error(payload: Box<dyn Any + Send>) -> PepgeomError {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown cause".to_string());
    PepgeomError::Other(format!("import panicked: {}", message))
}
