//! Side-chain chi dihedrals and the symmetry correction that precedes them.
//!
//! Atom names ending in `-1` refer to the preceding residue. They resolve
//! only when a preceding, bonded residue is supplied.

use std::collections::HashMap;

use pepgeom_struct::amino::AminoAcid;
use pepgeom_struct::geometry::dihedral;
use pepgeom_struct::types::Point3D;

/// Atom name to coordinates for one residue.
pub type AtomCoords = HashMap<String, Point3D>;

/// Four atom names defining a dihedral.
pub type AtomQuad = [&'static str; 4];

/// Up to five chi angles, in order.
pub type ChiAngles = [Option<f64>; 5];

/// Chi dihedral definitions, chi1 first. Empty for GLY and ALA.
pub fn chi_atoms(aa: AminoAcid) -> &'static [AtomQuad] {
    use AminoAcid::*;
    match aa {
        Arg => &[
            ["N", "CA", "CB", "CG"],
            ["CA", "CB", "CG", "CD"],
            ["CB", "CG", "CD", "NE"],
            ["CG", "CD", "NE", "CZ"],
            ["CD", "NE", "CZ", "NH1"],
        ],
        Asn | Asp => &[["N", "CA", "CB", "CG"], ["CA", "CB", "CG", "OD1"]],
        Cys => &[["N", "CA", "CB", "SG"]],
        Gln | Glu => &[
            ["N", "CA", "CB", "CG"],
            ["CA", "CB", "CG", "CD"],
            ["CB", "CG", "CD", "OE1"],
        ],
        His => &[["N", "CA", "CB", "CG"], ["CA", "CB", "CG", "ND1"]],
        Ile => &[["N", "CA", "CB", "CG1"], ["CA", "CB", "CG1", "CD1"]],
        Leu => &[["N", "CA", "CB", "CG"], ["CA", "CB", "CG", "CD1"]],
        Lys => &[
            ["N", "CA", "CB", "CG"],
            ["CA", "CB", "CG", "CD"],
            ["CB", "CG", "CD", "CE"],
            ["CG", "CD", "CE", "NZ"],
        ],
        Met => &[
            ["N", "CA", "CB", "CG"],
            ["CA", "CB", "CG", "SD"],
            ["CB", "CG", "SD", "CE"],
        ],
        Phe | Trp | Tyr => &[["N", "CA", "CB", "CG"], ["CA", "CB", "CG", "CD1"]],
        Pro => &[
            ["N", "CA", "CB", "CG"],
            ["CA", "CB", "CG", "CD"],
            ["CB", "CG", "CD", "N"],
            ["CG", "CD", "N", "CA"],
        ],
        Ser => &[["N", "CA", "CB", "OG"]],
        Thr => &[["N", "CA", "CB", "OG1"]],
        Val => &[["N", "CA", "CB", "CG1"]],
        Ala | Gly => &[],
    }
}

/// Labels of chemically equivalent atoms that files may report in either
/// order, with the two torsions that tell which order is canonical.
#[derive(Debug)]
pub struct SymmetryCorrection {
    /// Swap when the first is available and exceeds 90 degrees in magnitude.
    pub first: AtomQuad,
    /// Swap when the second is available and is under 90 degrees in magnitude.
    pub second: AtomQuad,
    pub pairs: &'static [(&'static str, &'static str)],
}

static ASP: SymmetryCorrection = SymmetryCorrection {
    first: ["CA", "CB", "CG", "OD1"],
    second: ["CA", "CB", "CG", "OD2"],
    pairs: &[("OD1", "OD2")],
};

static GLU: SymmetryCorrection = SymmetryCorrection {
    first: ["CB", "CG", "CD", "OE1"],
    second: ["CB", "CG", "CD", "OE2"],
    pairs: &[("OE1", "OE2")],
};

static AROMATIC: SymmetryCorrection = SymmetryCorrection {
    first: ["CA", "CB", "CG", "CD1"],
    second: ["CA", "CB", "CG", "CD2"],
    pairs: &[("CD1", "CD2"), ("CE1", "CE2")],
};

static ARG: SymmetryCorrection = SymmetryCorrection {
    first: ["CD", "NE", "CZ", "NH1"],
    second: ["CD", "NE", "CZ", "NH2"],
    pairs: &[("NH1", "NH2")],
};

/// The correction for `aa`, if it has symmetric side-chain atoms.
pub fn symmetry_correction(aa: AminoAcid) -> Option<&'static SymmetryCorrection> {
    match aa {
        AminoAcid::Asp => Some(&ASP),
        AminoAcid::Glu => Some(&GLU),
        AminoAcid::Phe | AminoAcid::Tyr => Some(&AROMATIC),
        AminoAcid::Arg => Some(&ARG),
        _ => None,
    }
}

/// What the symmetry pass did to a residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorrectionOutcome {
    NotApplicable,
    Unchanged,
    Swapped,
    /// Neither diagnostic torsion could be measured; the ambiguous atoms
    /// were removed.
    Dropped,
}

/// Coordinates for `name`, looking in `prev` for names ending in `-1`.
pub fn locate(name: &str, atoms: &AtomCoords, prev: Option<&AtomCoords>) -> Option<Point3D> {
    match name.strip_suffix("-1") {
        Some(base) => prev?.get(base).copied(),
        None => atoms.get(name).copied(),
    }
}

/// Dihedral over four named atoms, `None` if any is missing or the result
/// is not finite.
pub fn named_dihedral(quad: &AtomQuad, atoms: &AtomCoords, prev: Option<&AtomCoords>) -> Option<f64> {
    let p1 = locate(quad[0], atoms, prev)?;
    let p2 = locate(quad[1], atoms, prev)?;
    let p3 = locate(quad[2], atoms, prev)?;
    let p4 = locate(quad[3], atoms, prev)?;
    Some(dihedral(&p1, &p2, &p3, &p4)).filter(|v| v.is_finite())
}

/// Put symmetric atom pairs into canonical order, in place.
pub fn apply_symmetry_correction(
    aa: AminoAcid,
    atoms: &mut AtomCoords,
    prev: Option<&AtomCoords>,
) -> CorrectionOutcome {
    let Some(rule) = symmetry_correction(aa) else {
        return CorrectionOutcome::NotApplicable;
    };

    let first = named_dihedral(&rule.first, atoms, prev);
    let second = named_dihedral(&rule.second, atoms, prev);

    let swap = match (first, second) {
        (None, None) => {
            for (a, b) in rule.pairs {
                atoms.remove(*a);
                atoms.remove(*b);
            }
            return CorrectionOutcome::Dropped;
        }
        (Some(v), None) => v.abs() > 90.0,
        (None, Some(v)) => v.abs() < 90.0,
        (Some(v1), Some(v2)) => v2.abs() < v1.abs(),
    };
    if !swap {
        return CorrectionOutcome::Unchanged;
    }

    for (a, b) in rule.pairs {
        let at_a = atoms.remove(*a);
        let at_b = atoms.remove(*b);
        if let Some(p) = at_a {
            atoms.insert((*b).to_string(), p);
        }
        if let Some(p) = at_b {
            atoms.insert((*a).to_string(), p);
        }
    }
    CorrectionOutcome::Swapped
}

/// Chi angles for `aa` over an already corrected atom set. Angles whose
/// atoms are missing stay `None`.
pub fn compute_chi(aa: AminoAcid, atoms: &AtomCoords, prev: Option<&AtomCoords>) -> ChiAngles {
    let mut chi = [None; 5];
    for (slot, quad) in chi.iter_mut().zip(chi_atoms(aa)) {
        *slot = named_dihedral(quad, atoms, prev);
    }
    chi
}
