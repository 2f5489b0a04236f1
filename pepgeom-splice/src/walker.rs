//! Walk a resolved chain residue by residue and measure it.
//!
//! The walker keeps one piece of state between residues: where the previous
//! residue sits in the resolved slice and in the output records. Each step
//! measures the residue's own geometry, then decides from the C(i-1)..N
//! distance whether the two residues are bonded. Bonded pairs get the
//! cross-residue angles and torsions; a break flags both ends terminal and
//! skips one chain index.

use core::fmt;

use pepgeom_core::{PepgeomError, Result};
use pepgeom_struct::amino::AminoAcid;
use pepgeom_struct::geometry::{angle, dihedral, distance};
use pepgeom_struct::types::{Point3D, SequenceId};

use crate::chi::{apply_symmetry_correction, chi_atoms, compute_chi, AtomCoords};
use crate::classifier::ClassifierOutput;
use crate::config::DEFAULT_CHAIN_BREAK_DISTANCE;
use crate::record::{BFactors, ChainRecord, Occupancy, ResidueRecord};
use crate::resolver::{ResolvedChain, ResolvedResidue};
use crate::sidechain::compute_side_chain;

/// Where a failure happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidueContext {
    pub chain: char,
    pub sequence_id: SequenceId,
    pub residue_name: String,
}

impl fmt::Display for ResidueContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "chain {} residue {} {}",
            self.chain, self.sequence_id, self.residue_name
        )
    }
}

struct Previous {
    residue_slot: usize,
    record_slot: usize,
    atoms: AtomCoords,
}

/// Measures chains one residue at a time.
#[derive(Debug)]
pub struct ChainWalker {
    break_distance: f64,
    last: Option<ResidueContext>,
}

impl Default for ChainWalker {
    fn default() -> Self {
        Self::new(DEFAULT_CHAIN_BREAK_DISTANCE)
    }
}

impl ChainWalker {
    pub fn new(break_distance: f64) -> Self {
        Self {
            break_distance,
            last: None,
        }
    }

    /// The residue most recently entered, kept after an error.
    pub fn last_residue(&self) -> Option<&ResidueContext> {
        self.last.as_ref()
    }

    /// Measure every residue of `chain`.
    ///
    /// # Errors
    ///
    /// Returns [`PepgeomError::Geometry`] if any atom has a non-finite
    /// coordinate. [`last_residue`](Self::last_residue) then names it.
    pub fn walk(&mut self, chain: &ResolvedChain, classes: &ClassifierOutput) -> Result<ChainRecord> {
        let mut records: Vec<ResidueRecord> = Vec::with_capacity(chain.residues.len());
        let mut previous: Option<Previous> = None;
        let mut index: u32 = 0;

        for (slot, residue) in chain.residues.iter().enumerate() {
            let context = ResidueContext {
                chain: chain.id,
                sequence_id: residue.sequence_id,
                residue_name: residue.amino_acid.three_letter().to_string(),
            };
            if let Some(bad) = residue.atoms.iter().find(|a| !a.coords.is_finite()) {
                let message = format!("non-finite coordinates for atom {} in {}", bad.name, context);
                self.last = Some(context);
                return Err(PepgeomError::Geometry(message));
            }
            self.last = Some(context);

            index += 1;
            let bb = &residue.backbone;
            let atoms: AtomCoords = residue
                .atoms
                .iter()
                .map(|a| (a.name.clone(), a.coords))
                .collect();

            // (index of bonded predecessor record, its atoms) when bonded
            let mut bonded_prev: Option<usize> = None;
            let mut l1 = None;
            if let Some(prev) = &previous {
                let pbb = &chain.residues[prev.residue_slot].backbone;
                let gap = distance(&pbb.c, &bb.n);
                if gap < self.break_distance {
                    bonded_prev = Some(prev.record_slot);
                    l1 = Some(gap);
                } else {
                    log::debug!(
                        "chain {} break before {} ({:.2} A)",
                        chain.id,
                        residue.sequence_id,
                        gap
                    );
                    index += 1;
                    records[prev.record_slot].terminal = true;
                }
            }

            let mut record = ResidueRecord::new(residue.sequence_id, residue.amino_acid, index);
            record.terminal = previous.is_some() && bonded_prev.is_none();
            measure_intra(&mut record, residue, &atoms);

            let prev_atoms = match (&previous, bonded_prev) {
                (Some(prev), Some(record_slot)) => {
                    let pbb = &chain.residues[prev.residue_slot].backbone;
                    let before = &mut records[record_slot];
                    before.angles.a6 = finite(angle(&pbb.ca, &pbb.c, &bb.n));
                    before.angles.a7 = finite(angle(&pbb.o, &pbb.c, &bb.n));
                    before.dihedrals.psi = finite(dihedral(&pbb.n, &pbb.ca, &pbb.c, &bb.n));
                    before.dihedrals.omega = finite(dihedral(&pbb.ca, &pbb.c, &bb.n, &bb.ca));
                    before.next = Some(index);

                    record.prev = Some(before.chain_index);
                    record.lengths.l1 = l1;
                    record.angles.a1 = finite(angle(&pbb.c, &bb.n, &bb.ca));
                    record.dihedrals.phi = finite(dihedral(&pbb.c, &bb.n, &bb.ca, &bb.c));
                    if residue.amino_acid == AminoAcid::Pro {
                        if let Some(cd) = atoms.get("CD") {
                            record.dihedrals.omega_prime =
                                finite(dihedral(&pbb.ca, &pbb.c, &bb.n, cd));
                        }
                    }
                    Some(&prev.atoms)
                }
                _ => None,
            };

            let mut corrected = atoms.clone();
            apply_symmetry_correction(residue.amino_acid, &mut corrected, prev_atoms);
            record.dihedrals.chi = compute_chi(residue.amino_acid, &corrected, prev_atoms);
            record.side_chain = compute_side_chain(residue.amino_acid, &corrected, prev_atoms);

            record.secondary_structure = classes.get(chain.id, residue.sequence_id).map(|e| e.class);

            previous = Some(Previous {
                residue_slot: slot,
                record_slot: records.len(),
                atoms,
            });
            records.push(record);
        }

        Ok(ChainRecord {
            id: chain.id,
            residues: records,
        })
    }
}

/// Geometry that needs only the residue itself.
fn measure_intra(record: &mut ResidueRecord, residue: &ResolvedResidue, atoms: &AtomCoords) {
    let bb = &residue.backbone;
    record.lengths.l2 = finite(distance(&bb.n, &bb.ca));
    record.lengths.l4 = finite(distance(&bb.ca, &bb.c));
    record.lengths.l5 = finite(distance(&bb.c, &bb.o));
    record.angles.a3 = finite(angle(&bb.n, &bb.ca, &bb.c));
    record.angles.a5 = finite(angle(&bb.ca, &bb.c, &bb.o));

    if let Some(cb) = atoms.get("CB") {
        measure_cb(record, bb.n, bb.ca, bb.c, *cb);
    }

    record.bfactors = bfactors(residue);
    record.occupancy = occupancy(residue);
}

fn measure_cb(record: &mut ResidueRecord, n: Point3D, ca: Point3D, c: Point3D, cb: Point3D) {
    record.angles.a2 = finite(angle(&n, &ca, &cb));
    record.angles.a4 = finite(angle(&cb, &ca, &c));
    record.lengths.l3 = finite(distance(&ca, &cb));
    record.dihedrals.zeta = finite(dihedral(&ca, &n, &c, &cb));
}

fn is_main_chain(name: &str) -> bool {
    matches!(name, "N" | "CA" | "C" | "O" | "OXT")
}

fn bfactors(residue: &ResolvedResidue) -> BFactors {
    let (mut main, mut side) = ((0.0, 0usize), (0.0, 0usize));
    for atom in &residue.atoms {
        let acc = if is_main_chain(&atom.name) { &mut main } else { &mut side };
        acc.0 += atom.temp_factor;
        acc.1 += 1;
    }
    let mean = |(sum, n): (f64, usize)| if n == 0 { 0.0 } else { sum / n as f64 };

    let chi_atom = chi_atoms(residue.amino_acid)
        .first()
        .and_then(|quad| residue.atom(quad[3]))
        .map_or(0.0, |a| a.temp_factor);

    BFactors {
        main_chain: mean(main),
        side_chain: mean(side),
        chi_atom,
    }
}

fn occupancy(residue: &ResolvedResidue) -> Occupancy {
    let mut main: Option<f64> = None;
    let mut side: Option<f64> = None;
    for atom in &residue.atoms {
        let slot = if is_main_chain(&atom.name) || atom.name == "CB" {
            &mut main
        } else {
            &mut side
        };
        *slot = Some(slot.map_or(atom.occupancy, |m| m.min(atom.occupancy)));
    }
    if !residue.amino_acid.has_side_chain_beyond_cb() {
        side = Some(1.0);
    }
    Occupancy {
        main_chain: main,
        side_chain: side,
    }
}

fn finite(value: f64) -> Option<f64> {
    Some(value).filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{add_phenyl, build_chain, helix, Torsions, HELIX};
    use crate::resolver::resolve_chain;
    use pepgeom_struct::secondary::SecondaryStructure;
    use pepgeom_struct::types::Chain;

    fn walk(chain: &Chain) -> ChainRecord {
        let (resolved, _) = resolve_chain(chain);
        ChainWalker::default()
            .walk(&resolved, &ClassifierOutput::new())
            .unwrap()
    }

    fn close(a: Option<f64>, b: f64, tol: f64) -> bool {
        a.map_or(false, |a| (a - b).abs() < tol)
    }

    /// Shift every atom from residue `from` on by `offset`.
    fn open_gap(chain: &mut Chain, from: usize, offset: Point3D) {
        for residue in &mut chain.residues[from..] {
            for atom in &mut residue.atoms {
                atom.coords = atom.coords.add(&offset);
            }
        }
    }

    #[test]
    fn two_residue_chain_matches_construction() {
        let chain = build_chain(
            'A',
            &[
                ("ALA", Torsions { phi: -60.0, psi: 135.0, omega: 180.0 }),
                ("ALA", Torsions { phi: -120.0, psi: 150.0, omega: 178.0 }),
            ],
        );
        let rec = walk(&chain);
        let (first, second) = (&rec.residues[0], &rec.residues[1]);

        assert!(close(second.lengths.l1, 1.329, 1e-9));
        assert!(close(first.angles.a3, 111.0, 1e-9));
        assert!(close(second.angles.a1, 121.7, 1e-9));
        assert!(close(first.angles.a6, 116.2, 1e-9));
        assert!(close(first.dihedrals.psi, 135.0, 1e-3));
        assert!(close(first.dihedrals.omega, 178.0, 1e-3));
        assert!(close(second.dihedrals.phi, -120.0, 1e-3));
        assert!(close(first.lengths.l2, 1.458, 1e-9));
        assert!(close(first.lengths.l3, 1.530, 1e-9));

        assert_eq!(first.dihedrals.phi, None);
        assert_eq!(second.dihedrals.psi, None);
        assert_eq!(first.next, Some(2));
        assert_eq!(second.prev, Some(1));
        assert!(!first.terminal && !second.terminal);
    }

    #[test]
    fn contiguous_chain_has_contiguous_indices() {
        let rec = walk(&helix('A', &["ALA", "GLY", "SER", "LEU", "VAL"]));
        let indices: Vec<u32> = rec.residues.iter().map(|r| r.chain_index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5]);
        assert!(rec.residues.iter().all(|r| !r.terminal));
        assert_eq!(rec.break_count(), 0);
        for r in &rec.residues[1..] {
            assert!(close(r.dihedrals.phi, HELIX.phi, 1e-3));
        }
    }

    #[test]
    fn break_detected_from_peptide_length() {
        let mut chain = helix('A', &["ALA", "ALA", "ALA", "ALA"]);
        open_gap(&mut chain, 2, Point3D::new(10.0, 0.0, 0.0));
        let rec = walk(&chain);
        let r = &rec.residues;

        let indices: Vec<u32> = r.iter().map(|x| x.chain_index).collect();
        assert_eq!(indices, vec![1, 2, 4, 5]);

        // residue before the break
        assert!(r[1].terminal);
        assert_eq!(r[1].angles.a6, None);
        assert_eq!(r[1].angles.a7, None);
        assert_eq!(r[1].dihedrals.psi, None);
        assert_eq!(r[1].dihedrals.omega, None);
        assert_eq!(r[1].next, None);
        // residue after the break
        assert!(r[2].terminal);
        assert_eq!(r[2].angles.a1, None);
        assert_eq!(r[2].dihedrals.phi, None);
        assert_eq!(r[2].lengths.l1, None);
        assert_eq!(r[2].prev, None);
        // intra-residue geometry is unaffected
        assert!(r[2].lengths.l2.is_some());
        // bonding resumes after the break
        assert_eq!(r[3].prev, Some(4));
        assert!(!r[3].terminal);
        assert_eq!(rec.break_count(), 1);
    }

    fn assert_gap_after_first(record: &ChainRecord) {
        let got: Vec<(i32, u32, bool)> = record
            .residues
            .iter()
            .map(|r| (r.sequence_id.number, r.chain_index, r.terminal))
            .collect();
        assert_eq!(got, vec![(1, 1, true), (3, 3, true), (4, 4, false)]);
        let (first, third) = (&record.residues[0], &record.residues[1]);
        assert_eq!(first.next, None);
        assert_eq!(first.dihedrals.psi, None);
        assert_eq!(third.prev, None);
        assert_eq!(third.lengths.l1, None);
        assert_eq!(third.dihedrals.phi, None);
        assert_eq!(third.next, Some(4));
        assert_eq!(record.residues[2].prev, Some(3));
        assert_eq!(record.break_count(), 1);
    }

    #[test]
    fn residue_without_backbone_opens_a_break() {
        let mut chain = helix('A', &["ALA", "SER", "LEU", "GLY"]);
        chain.residues[1].atoms.retain(|a| a.name != "O");
        let (resolved, report) = resolve_chain(&chain);
        assert_eq!(report.missing_backbone, 1);
        let record = ChainWalker::default()
            .walk(&resolved, &ClassifierOutput::new())
            .unwrap();
        assert_gap_after_first(&record);
    }

    #[test]
    fn hetero_residue_opens_a_break() {
        let mut chain = helix('A', &["ALA", "MET", "LEU", "GLY"]);
        chain.residues[1].name = "MSE".into();
        for atom in &mut chain.residues[1].atoms {
            atom.is_hetatm = true;
        }
        let (resolved, report) = resolve_chain(&chain);
        assert_eq!(report.hetero, 1);
        let record = ChainWalker::default()
            .walk(&resolved, &ClassifierOutput::new())
            .unwrap();
        assert_gap_after_first(&record);
    }

    #[test]
    fn configured_break_distance_is_honoured() {
        let chain = helix('A', &["ALA", "ALA"]);
        let (resolved, _) = resolve_chain(&chain);
        let rec = ChainWalker::new(1.0)
            .walk(&resolved, &ClassifierOutput::new())
            .unwrap();
        assert!(rec.residues[0].terminal && rec.residues[1].terminal);
        assert_eq!(rec.residues[1].chain_index, 3);
    }

    #[test]
    fn missing_cb_only_drops_cb_geometry() {
        let mut chain = helix('A', &["ALA", "ALA", "ALA"]);
        chain.residues[1].atoms.retain(|a| a.name != "CB");
        let rec = walk(&chain);
        let r = &rec.residues[1];
        assert_eq!(r.angles.a2, None);
        assert_eq!(r.angles.a4, None);
        assert_eq!(r.lengths.l3, None);
        assert_eq!(r.dihedrals.zeta, None);
        assert!(r.angles.a3.is_some());
        assert!(r.dihedrals.phi.is_some());
        assert!(r.dihedrals.psi.is_some());
        assert!(rec.residues[0].dihedrals.zeta.is_some());
    }

    #[test]
    fn proline_gets_omega_prime() {
        let mut chain = helix('A', &["ALA", "PRO"]);
        let (n, ca, cb) = {
            let pro = &chain.residues[1];
            let at = |name: &str| pro.get_atom(name).unwrap().coords;
            (at("N"), at("CA"), at("CB"))
        };
        let cg = crate::fixtures::place(&n, &ca, &cb, 1.50, 104.0, 30.0);
        let cd = crate::fixtures::place(&ca, &cb, &cg, 1.50, 105.0, -35.0);
        chain.residues[1].atoms.push(crate::fixtures::atom("CG", cg));
        chain.residues[1].atoms.push(crate::fixtures::atom("CD", cd));

        let rec = walk(&chain);
        let pro = &rec.residues[1];
        let prev = &chain.residues[0];
        let expected = dihedral(
            &prev.get_atom("CA").unwrap().coords,
            &prev.get_atom("C").unwrap().coords,
            &n,
            &cd,
        );
        assert!(close(pro.dihedrals.omega_prime, expected, 1e-9));
        assert_eq!(rec.residues[0].dihedrals.omega_prime, None);
        assert!(pro.side_chain.angles.contains_key("C_1_N_CD"));
        assert!(pro.dihedrals.chi(4).is_some());
    }

    #[test]
    fn aggregates_and_defaults() {
        let mut chain = helix('A', &["GLY", "SER"]);
        for atom in &mut chain.residues[1].atoms {
            atom.temp_factor = if atom.is_backbone() { 10.0 } else { 30.0 };
            atom.occupancy = if atom.name == "CB" { 0.5 } else { 1.0 };
        }
        chain.residues[1].atoms.push({
            let mut og = crate::fixtures::atom("OG", Point3D::new(5.0, 5.0, 5.0));
            og.temp_factor = 40.0;
            og.occupancy = 0.75;
            og
        });
        let rec = walk(&chain);

        let gly = &rec.residues[0];
        assert_eq!(gly.bfactors.side_chain, 0.0);
        assert_eq!(gly.bfactors.chi_atom, 0.0);
        assert_eq!(gly.occupancy.side_chain, Some(1.0));

        let ser = &rec.residues[1];
        assert_eq!(ser.bfactors.main_chain, 10.0);
        // CB at 30 and OG at 40: a true mean, not a floor
        assert_eq!(ser.bfactors.side_chain, 35.0);
        assert_eq!(ser.bfactors.chi_atom, 40.0);
        assert_eq!(ser.occupancy.main_chain, Some(0.5));
        assert_eq!(ser.occupancy.side_chain, Some(0.75));
    }

    #[test]
    fn secondary_structure_from_classifier() {
        let chain = helix('A', &["ALA", "ALA"]);
        let (resolved, _) = resolve_chain(&chain);
        let mut classes = ClassifierOutput::new();
        classes.insert(
            'A',
            SequenceId::from(2),
            crate::classifier::ClassifierEntry::class_only(SecondaryStructure::AlphaHelix),
        );
        let rec = ChainWalker::default().walk(&resolved, &classes).unwrap();
        assert_eq!(rec.residues[0].secondary_structure, None);
        assert!(rec.residues[0].lengths.l2.is_some());
        assert_eq!(
            rec.residues[1].secondary_structure,
            Some(SecondaryStructure::AlphaHelix)
        );
    }

    #[test]
    fn symmetry_correction_precedes_chi() {
        let mut chain = helix('A', &["ALA", "PHE"]);
        add_phenyl(&mut chain.residues[1], -65.0, 110.0);
        let rec = walk(&chain);
        let chi2 = rec.residues[1].dihedrals.chi(2).unwrap();
        assert!((chi2 - -70.0).abs() < 1e-6);
    }

    #[test]
    fn non_finite_coordinate_is_an_error_with_context() {
        let mut chain = helix('A', &["ALA", "SER", "GLY"]);
        chain.residues[1].atoms[4].coords.x = f64::NAN;
        let (resolved, _) = resolve_chain(&chain);
        let mut walker = ChainWalker::default();
        let err = walker.walk(&resolved, &ClassifierOutput::new()).unwrap_err();
        assert!(matches!(err, PepgeomError::Geometry(_)));
        let ctx = walker.last_residue().unwrap();
        assert_eq!(ctx.sequence_id, SequenceId::from(2));
        assert_eq!(ctx.to_string(), "chain A residue 2 SER");
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::fixtures::{build_chain, Torsions};
    use crate::resolver::resolve_chain;
    use proptest::prelude::*;

    fn arb_torsions() -> impl Strategy<Value = Torsions> {
        (-179.0..179.0f64, -179.0..179.0f64, 170.0..190.0f64)
            .prop_map(|(phi, psi, omega)| Torsions { phi, psi, omega })
    }

    fn angular_gap(a: f64, b: f64) -> f64 {
        (a - b + 540.0).rem_euclid(360.0) - 180.0
    }

    proptest! {
        #[test]
        fn indices_and_links_follow_breaks(
            torsions in prop::collection::vec(arb_torsions(), 2..12),
            gaps in prop::collection::vec(any::<bool>(), 12),
        ) {
            let plan: Vec<(&str, Torsions)> = torsions.iter().map(|t| ("ALA", *t)).collect();
            let mut chain = build_chain('A', &plan);
            let shift = Point3D::new(10.0, 0.0, 0.0);
            for i in 1..chain.residues.len() {
                if gaps[i] {
                    for residue in &mut chain.residues[i..] {
                        for atom in &mut residue.atoms {
                            atom.coords = atom.coords.add(&shift);
                        }
                    }
                }
            }
            let (resolved, _) = resolve_chain(&chain);
            let record = ChainWalker::default().walk(&resolved, &ClassifierOutput::new()).unwrap();
            let residues = &record.residues;

            prop_assert_eq!(residues[0].chain_index, 1);
            for i in 1..residues.len() {
                let step = residues[i].chain_index - residues[i - 1].chain_index;
                if gaps[i] {
                    prop_assert_eq!(step, 2);
                    prop_assert!(residues[i].terminal && residues[i - 1].terminal);
                    prop_assert_eq!(residues[i].prev, None);
                    prop_assert_eq!(residues[i - 1].next, None);
                    prop_assert_eq!(residues[i].dihedrals.phi, None);
                } else {
                    prop_assert_eq!(step, 1);
                    prop_assert_eq!(residues[i].prev, Some(residues[i - 1].chain_index));
                    prop_assert_eq!(residues[i - 1].next, Some(residues[i].chain_index));
                    let phi = residues[i].dihedrals.phi.unwrap();
                    prop_assert!(angular_gap(phi, torsions[i].phi).abs() < 1e-6);
                }
            }
            prop_assert_eq!(record.break_count(), gaps[1..residues.len()].iter().filter(|g| **g).count());
        }
    }
}
