//! Per-residue geometry extraction from protein structures.
//!
//! For every protein in a selection this crate loads the structure file,
//! settles alternate locations and microheterogeneity, walks each chain to
//! measure backbone and side-chain geometry with chain-break detection, and
//! stores the result one protein per transaction.
//!
//! - **Selection**: proteins and chains to import, [`selection`]
//! - **Disorder resolution**: one conformer per residue, [`resolver`]
//! - **Geometry**: the chain walk in [`walker`], chi angles in [`chi`],
//!   side-chain bond lengths and angles in [`sidechain`]
//! - **Collaborators**: [`source::StructureSource`],
//!   [`classifier::SecondaryStructureClassifier`], [`store::GeometryStore`]
//! - **Execution**: one protein in [`pipeline`], a selection in [`batch`]
//!
//! # Quick start
//!
//! ```no_run
//! use pepgeom_core::Summarizable;
//! use pepgeom_splice::{
//!     read_selection_file, BatchRunner, MemoryStore, PdbMirror, PrecomputedClassifier,
//!     SecondaryStructure, SpliceConfig,
//! };
//!
//! let entries = read_selection_file("selection.txt").unwrap();
//! let mirror = PdbMirror::divided("/data/pdb");
//! let classifier = PrecomputedClassifier::new().with_default_class(SecondaryStructure::Coil);
//! let store = MemoryStore::new();
//!
//! let summary = BatchRunner::new(SpliceConfig::default(), &mirror, &classifier, &store)
//!     .run(&entries)
//!     .unwrap();
//! println!("{}", summary.summary());
//! ```

pub mod batch;
pub mod chi;
pub mod classifier;
pub mod config;
pub mod pipeline;
pub mod record;
pub mod resolver;
pub mod selection;
pub mod sidechain;
pub mod source;
pub mod store;
pub mod walker;

#[cfg(test)]
mod fixtures;

pub use batch::{BatchRunner, BatchSummary, Progress, ProgressSnapshot, ShutdownSignal};
pub use chi::{compute_chi, ChiAngles};
pub use classifier::{
    ClassifierEntry, ClassifierOutput, PrecomputedClassifier, SecondaryStructureClassifier,
};
pub use config::{SpliceConfig, DEFAULT_CHAIN_BREAK_DISTANCE};
pub use pepgeom_struct::SecondaryStructure;
pub use pipeline::{FailureReport, ProteinTask, Services, UnitOutcome, UnitResult, UnitState};
pub use record::{ChainRecord, ProteinMeta, ProteinRecord, ResidueRecord};
pub use resolver::{resolve_chain, resolve_structure, ResolutionReport, ResolvedChain};
pub use selection::{parse_selection, read_selection_file, SelectionEntry, ALL_CHAINS};
pub use sidechain::{compute_side_chain, SideChainGeometry};
pub use source::{load_structure, MirrorLayout, PdbMirror, StructureSource};
pub use store::{GeometryStore, MemoryStore, StoreTransaction};
pub use walker::{ChainWalker, ResidueContext};
