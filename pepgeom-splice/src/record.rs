//! Per-residue geometry records and the protein tree that carries them to
//! the store.
//!
//! Geometry that could not be measured is `None`. The B-factor aggregates
//! are the exception: they default to `0.0`.

use chrono::{DateTime, Utc};

use pepgeom_core::Summarizable;
use pepgeom_struct::amino::AminoAcid;
use pepgeom_struct::secondary::SecondaryStructure;
use pepgeom_struct::types::SequenceId;

use crate::chi::ChiAngles;
use crate::selection::SelectionEntry;
use crate::sidechain::SideChainGeometry;

/// Main-chain bond lengths in Angstroms.
///
/// `l1` is C(i-1)-N, `l2` N-CA, `l3` CA-CB, `l4` CA-C, `l5` C-O.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackboneLengths {
    pub l1: Option<f64>,
    pub l2: Option<f64>,
    pub l3: Option<f64>,
    pub l4: Option<f64>,
    pub l5: Option<f64>,
}

/// Main-chain bond angles in degrees.
///
/// `a1` C(i-1)-N-CA, `a2` N-CA-CB, `a3` N-CA-C, `a4` CB-CA-C, `a5` CA-C-O,
/// `a6` CA-C-N(i+1), `a7` O-C-N(i+1).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BackboneAngles {
    pub a1: Option<f64>,
    pub a2: Option<f64>,
    pub a3: Option<f64>,
    pub a4: Option<f64>,
    pub a5: Option<f64>,
    pub a6: Option<f64>,
    pub a7: Option<f64>,
}

/// Torsions in degrees, `(-180, 180]`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dihedrals {
    pub phi: Option<f64>,
    pub psi: Option<f64>,
    pub omega: Option<f64>,
    /// CA(i-1), C(i-1), N, CD; prolines only.
    pub omega_prime: Option<f64>,
    /// CA, N, C, CB.
    pub zeta: Option<f64>,
    pub chi: ChiAngles,
}

impl Dihedrals {
    /// Chi angle `n`, 1-based.
    pub fn chi(&self, n: usize) -> Option<f64> {
        n.checked_sub(1).and_then(|i| self.chi.get(i).copied().flatten())
    }
}

/// B-factor aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BFactors {
    /// Mean over N, CA, C, O, OXT.
    pub main_chain: f64,
    /// Mean over every other atom.
    pub side_chain: f64,
    /// B-factor of the fourth atom of chi1.
    pub chi_atom: f64,
}

/// Occupancy aggregates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Occupancy {
    /// Minimum over N, CA, C, O, OXT, CB.
    pub main_chain: Option<f64>,
    /// Minimum over the rest; fixed at 1.0 for glycine and alanine.
    pub side_chain: Option<f64>,
}

/// Geometry of one residue.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResidueRecord {
    pub sequence_id: SequenceId,
    pub amino_acid: AminoAcid,
    pub secondary_structure: Option<SecondaryStructure>,
    /// 1-based position in the chain; skips one number at every break.
    pub chain_index: u32,
    /// Set on both residues either side of a chain break.
    pub terminal: bool,
    pub lengths: BackboneLengths,
    pub angles: BackboneAngles,
    pub dihedrals: Dihedrals,
    pub side_chain: SideChainGeometry,
    pub bfactors: BFactors,
    pub occupancy: Occupancy,
    /// Chain index of the bonded predecessor.
    pub prev: Option<u32>,
    /// Chain index of the bonded successor.
    pub next: Option<u32>,
}

impl ResidueRecord {
    pub fn new(sequence_id: SequenceId, amino_acid: AminoAcid, chain_index: u32) -> Self {
        Self {
            sequence_id,
            amino_acid,
            secondary_structure: None,
            chain_index,
            terminal: false,
            lengths: BackboneLengths::default(),
            angles: BackboneAngles::default(),
            dihedrals: Dihedrals::default(),
            side_chain: SideChainGeometry::default(),
            bfactors: BFactors::default(),
            occupancy: Occupancy::default(),
            prev: None,
            next: None,
        }
    }
}

/// One chain's residues in chain-index order.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChainRecord {
    pub id: char,
    pub residues: Vec<ResidueRecord>,
}

impl ChainRecord {
    /// Number of chain breaks (pairs of terminal flags).
    pub fn break_count(&self) -> usize {
        self.residues
            .windows(2)
            .filter(|w| w[0].terminal && w[1].terminal && w[0].next.is_none())
            .count()
    }
}

/// Everything known about a protein apart from its residues.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinMeta {
    pub code: String,
    pub threshold: f64,
    pub resolution: f64,
    pub rfactor: f64,
    pub rfree: f64,
    /// Modification time of the structure file the record came from.
    pub source_timestamp: DateTime<Utc>,
    /// SHA-256 of the decompressed structure text.
    pub source_digest: String,
}

impl ProteinMeta {
    pub fn from_selection(
        entry: &SelectionEntry,
        source_timestamp: DateTime<Utc>,
        source_digest: String,
    ) -> Self {
        Self {
            code: entry.code.clone(),
            threshold: entry.threshold,
            resolution: entry.resolution,
            rfactor: entry.rfactor,
            rfree: entry.rfree,
            source_timestamp,
            source_digest,
        }
    }
}

/// A protein's full record tree.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProteinRecord {
    pub meta: ProteinMeta,
    pub chains: Vec<ChainRecord>,
}

impl ProteinRecord {
    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residues.len()).sum()
    }

    pub fn get_chain(&self, id: char) -> Option<&ChainRecord> {
        self.chains.iter().find(|c| c.id == id)
    }
}

impl Summarizable for ProteinRecord {
    fn summary(&self) -> String {
        format!(
            "Protein {}: {} chain(s), {} residue(s), resolution {}",
            self.meta.code,
            self.chains.len(),
            self.residue_count(),
            self.meta.resolution,
        )
    }
}
