//! Disorder resolution: reduce every residue to one complete atom set.
//!
//! Crystal structures report alternate locations (altlocs) for atoms that
//! were modelled in more than one position. Geometry needs exactly one
//! position per atom, so each residue keeps the altloc with the highest mean
//! occupancy that still covers every disordered atom. Residues that cannot be
//! used at all (ligands, non-standard residues, incomplete backbones) are
//! dropped and counted.

use core::fmt;
use core::ops::AddAssign;
use std::collections::HashMap;

use pepgeom_core::Summarizable;
use pepgeom_struct::amino::AminoAcid;
use pepgeom_struct::types::{Atom, Chain, Point3D, Residue, SequenceId, Structure};

/// Main-chain coordinates of a resolved residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backbone {
    pub n: Point3D,
    pub ca: Point3D,
    pub c: Point3D,
    pub o: Point3D,
}

impl Backbone {
    fn from_atoms(atoms: &[Atom]) -> Option<Self> {
        let find = |name: &str| atoms.iter().find(|a| a.name == name).map(|a| a.coords);
        Some(Self {
            n: find("N")?,
            ca: find("CA")?,
            c: find("C")?,
            o: find("O")?,
        })
    }
}

/// A residue reduced to a single conformation.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedResidue {
    pub amino_acid: AminoAcid,
    pub sequence_id: SequenceId,
    /// The altloc the atoms were taken from, `None` for ordered residues.
    pub alt_loc: Option<char>,
    pub backbone: Backbone,
    /// Heavy atoms, one per name, altloc tags cleared.
    pub atoms: Vec<Atom>,
}

impl ResolvedResidue {
    pub fn atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    /// Back to a plain [`Residue`], for collaborators that consume structures.
    pub fn to_residue(&self) -> Residue {
        Residue {
            name: self.amino_acid.three_letter().to_string(),
            seq_num: self.sequence_id.number,
            i_code: self.sequence_id.insertion,
            atoms: self.atoms.clone(),
        }
    }
}

/// The accepted residues of one chain, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedChain {
    pub id: char,
    pub residues: Vec<ResolvedResidue>,
}

impl ResolvedChain {
    pub fn to_chain(&self) -> Chain {
        Chain::new(self.id, self.residues.iter().map(|r| r.to_residue()).collect())
    }
}

/// Why a residue was left out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exclusion {
    Hetero,
    NonStandard,
    MissingBackbone,
    NoAcceptableAltloc,
    Superseded,
}

impl fmt::Display for Exclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Exclusion::Hetero => "hetero residue",
            Exclusion::NonStandard => "not a standard amino acid",
            Exclusion::MissingBackbone => "missing backbone atom",
            Exclusion::NoAcceptableAltloc => "no altloc covers every disordered atom",
            Exclusion::Superseded => "superseded by a better-occupied residue at the same position",
        })
    }
}

/// Residue accounting for one chain; add reports together for a protein or
/// a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResolutionReport {
    pub accepted: usize,
    pub hetero: usize,
    pub non_standard: usize,
    pub missing_backbone: usize,
    /// Accepted residues without any altloc. Informational.
    pub not_disordered: usize,
    pub no_acceptable_altloc: usize,
    pub superseded: usize,
}

impl ResolutionReport {
    /// Total residues left out, for whatever reason.
    pub fn excluded(&self) -> usize {
        self.hetero
            + self.non_standard
            + self.missing_backbone
            + self.no_acceptable_altloc
            + self.superseded
    }

    fn record(&mut self, reason: Exclusion) {
        match reason {
            Exclusion::Hetero => self.hetero += 1,
            Exclusion::NonStandard => self.non_standard += 1,
            Exclusion::MissingBackbone => self.missing_backbone += 1,
            Exclusion::NoAcceptableAltloc => self.no_acceptable_altloc += 1,
            Exclusion::Superseded => self.superseded += 1,
        }
    }
}

impl AddAssign for ResolutionReport {
    fn add_assign(&mut self, other: Self) {
        self.accepted += other.accepted;
        self.hetero += other.hetero;
        self.non_standard += other.non_standard;
        self.missing_backbone += other.missing_backbone;
        self.not_disordered += other.not_disordered;
        self.no_acceptable_altloc += other.no_acceptable_altloc;
        self.superseded += other.superseded;
    }
}

impl Summarizable for ResolutionReport {
    fn summary(&self) -> String {
        format!(
            "{} accepted ({} ordered), {} excluded: {} hetero, {} non-standard, \
             {} missing backbone, {} no acceptable altloc, {} superseded",
            self.accepted,
            self.not_disordered,
            self.excluded(),
            self.hetero,
            self.non_standard,
            self.missing_backbone,
            self.no_acceptable_altloc,
            self.superseded,
        )
    }
}

/// A residue that passed selection, with the occupancy it competes with
/// against other residues at the same position.
struct Candidate {
    residue: ResolvedResidue,
    occupancy: f64,
    ordered: bool,
}

/// Resolve one chain.
pub fn resolve_chain(chain: &Chain) -> (ResolvedChain, ResolutionReport) {
    let mut report = ResolutionReport::default();
    let mut slots: Vec<Option<Candidate>> = Vec::with_capacity(chain.residues.len());
    let mut best_at: HashMap<SequenceId, usize> = HashMap::new();

    for residue in &chain.residues {
        let candidate = match select_atoms(residue) {
            Ok(candidate) => candidate,
            Err(reason) => {
                log::debug!(
                    "chain {} residue {} {}: excluded, {}",
                    chain.id,
                    residue.sequence_id(),
                    residue.name,
                    reason
                );
                report.record(reason);
                continue;
            }
        };

        let seq = candidate.residue.sequence_id;
        let slot = slots.len();
        match best_at.get(&seq).copied() {
            Some(incumbent) => {
                let incumbent_occ = slots[incumbent].as_ref().map_or(f64::MIN, |c| c.occupancy);
                let loser = if candidate.occupancy > incumbent_occ {
                    best_at.insert(seq, slot);
                    slots.push(Some(candidate));
                    slots[incumbent].take()
                } else {
                    Some(candidate)
                };
                if let Some(loser) = loser {
                    log::debug!(
                        "chain {} residue {} {}: excluded, {}",
                        chain.id,
                        seq,
                        loser.residue.amino_acid,
                        Exclusion::Superseded
                    );
                    report.record(Exclusion::Superseded);
                }
            }
            None => {
                best_at.insert(seq, slot);
                slots.push(Some(candidate));
            }
        }
    }

    let residues: Vec<ResolvedResidue> = slots
        .into_iter()
        .flatten()
        .map(|c| {
            if c.ordered {
                report.not_disordered += 1;
            }
            c.residue
        })
        .collect();
    report.accepted = residues.len();

    (
        ResolvedChain {
            id: chain.id,
            residues,
        },
        report,
    )
}

/// Resolve every chain the filter accepts. Chains with no accepted residue
/// are dropped from the output but still counted.
pub fn resolve_structure(
    structure: &Structure,
    accept_chain: impl Fn(char) -> bool,
) -> (Vec<ResolvedChain>, ResolutionReport) {
    let mut report = ResolutionReport::default();
    let mut chains = Vec::new();
    for chain in structure.chains.iter().filter(|c| accept_chain(c.id)) {
        let (resolved, chain_report) = resolve_chain(chain);
        report += chain_report;
        if !resolved.residues.is_empty() {
            chains.push(resolved);
        }
    }
    (chains, report)
}

fn select_atoms(residue: &Residue) -> Result<Candidate, Exclusion> {
    if residue.is_hetero() {
        return Err(Exclusion::Hetero);
    }
    let amino_acid =
        AminoAcid::from_three_letter(&residue.name).ok_or(Exclusion::NonStandard)?;
    if !residue.has_backbone() {
        return Err(Exclusion::MissingBackbone);
    }

    let heavy: Vec<&Atom> = residue.atoms.iter().filter(|a| !a.is_hydrogen()).collect();

    // atom names in first-seen order, disordered ones flagged
    let mut names: Vec<(&str, bool)> = Vec::new();
    for atom in &heavy {
        match names.iter_mut().find(|(n, _)| *n == atom.name) {
            Some(entry) => entry.1 |= atom.alt_loc.is_some(),
            None => names.push((atom.name.as_str(), atom.alt_loc.is_some())),
        }
    }

    let (alt_loc, occupancy, ordered) = if names.iter().any(|(_, disordered)| *disordered) {
        let tag = best_covering_altloc(&heavy, &names).ok_or(Exclusion::NoAcceptableAltloc)?;
        (Some(tag.0), tag.1, false)
    } else {
        (None, mean(heavy.iter().map(|a| a.occupancy)), true)
    };

    let atoms: Vec<Atom> = names
        .iter()
        .filter_map(|(name, disordered)| {
            let pick = |tag: Option<char>| {
                heavy
                    .iter()
                    .find(|a| a.name == *name && a.alt_loc == tag)
                    .copied()
            };
            let chosen = if *disordered {
                pick(alt_loc).or_else(|| pick(None))
            } else {
                pick(None)
            };
            chosen.map(|a| Atom {
                alt_loc: None,
                ..a.clone()
            })
        })
        .collect();

    let backbone = Backbone::from_atoms(&atoms).ok_or(Exclusion::MissingBackbone)?;

    Ok(Candidate {
        residue: ResolvedResidue {
            amino_acid,
            sequence_id: residue.sequence_id(),
            alt_loc,
            backbone,
            atoms,
        },
        occupancy,
        ordered,
    })
}

/// Rank altloc tags by mean occupancy (ties keep first-seen order) and return
/// the first one under which every disordered atom exists, directly or as a
/// blank-altloc copy.
fn best_covering_altloc(heavy: &[&Atom], names: &[(&str, bool)]) -> Option<(char, f64)> {
    let mut tags: Vec<(char, f64, usize)> = Vec::new();
    for atom in heavy {
        if let Some(tag) = atom.alt_loc {
            match tags.iter_mut().find(|(t, _, _)| *t == tag) {
                Some(entry) => {
                    entry.1 += atom.occupancy;
                    entry.2 += 1;
                }
                None => tags.push((tag, atom.occupancy, 1)),
            }
        }
    }
    let mut ranked: Vec<(char, f64)> = tags
        .into_iter()
        .map(|(tag, sum, count)| (tag, sum / count as f64))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    ranked.into_iter().find(|(tag, _)| {
        names.iter().filter(|(_, disordered)| *disordered).all(|(name, _)| {
            heavy
                .iter()
                .any(|a| a.name == *name && (a.alt_loc == Some(*tag) || a.alt_loc.is_none()))
        })
    })
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
