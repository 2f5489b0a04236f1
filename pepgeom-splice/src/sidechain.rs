//! Side-chain bond lengths and bond angles.

use std::collections::BTreeMap;

use pepgeom_struct::amino::AminoAcid;
use pepgeom_struct::geometry::{angle, distance};

use crate::chi::{locate, AtomCoords};

/// Bonded atom pairs per residue type.
pub fn bond_length_pairs(aa: AminoAcid) -> &'static [[&'static str; 2]] {
    use AminoAcid::*;
    match aa {
        Arg => &[
            ["CB", "CG"],
            ["CG", "CD"],
            ["CD", "NE"],
            ["NE", "CZ"],
            ["CZ", "NH1"],
            ["CZ", "NH2"],
        ],
        Asn => &[["CB", "CG"], ["CG", "OD1"], ["CG", "ND2"]],
        Asp => &[["CB", "CG"], ["CG", "OD1"], ["CG", "OD2"]],
        Cys => &[["CB", "SG"]],
        Gln => &[["CB", "CG"], ["CG", "CD"], ["CD", "OE1"], ["CD", "NE2"]],
        Glu => &[["CB", "CG"], ["CG", "CD"], ["CD", "OE1"], ["CD", "OE2"]],
        His => &[
            ["CB", "CG"],
            ["CG", "ND1"],
            ["CG", "CD2"],
            ["ND1", "CE1"],
            ["CD2", "NE2"],
            ["CE1", "NE2"],
        ],
        Ile => &[["CB", "CG1"], ["CB", "CG2"], ["CG1", "CD1"]],
        Leu => &[["CB", "CG"], ["CG", "CD1"], ["CG", "CD2"]],
        Lys => &[["CB", "CG"], ["CG", "CD"], ["CD", "CE"], ["CE", "NZ"]],
        Met => &[["CB", "CG"], ["CG", "SD"], ["SD", "CE"]],
        Phe => &[
            ["CB", "CG"],
            ["CG", "CD1"],
            ["CG", "CD2"],
            ["CD1", "CE1"],
            ["CD2", "CE2"],
            ["CE1", "CZ"],
            ["CE2", "CZ"],
        ],
        Pro => &[["CB", "CG"], ["CG", "CD"], ["CD", "N"]],
        Ser => &[["CB", "OG"]],
        Thr => &[["CB", "OG1"], ["CB", "CG2"]],
        Trp => &[
            ["CB", "CG"],
            ["CG", "CD1"],
            ["CG", "CD2"],
            ["CD1", "NE1"],
            ["NE1", "CE2"],
            ["CD2", "CE2"],
            ["CD2", "CE3"],
            ["CE2", "CZ2"],
            ["CE3", "CZ3"],
            ["CZ2", "CH2"],
            ["CZ3", "CH2"],
        ],
        Tyr => &[
            ["CB", "CG"],
            ["CG", "CD1"],
            ["CG", "CD2"],
            ["CD1", "CE1"],
            ["CD2", "CE2"],
            ["CE1", "CZ"],
            ["CE2", "CZ"],
            ["CZ", "OH"],
        ],
        Val => &[["CB", "CG1"], ["CB", "CG2"]],
        Ala | Gly => &[],
    }
}

/// Bond-angle triples per residue type, vertex in the middle.
pub fn bond_angle_triples(aa: AminoAcid) -> &'static [[&'static str; 3]] {
    use AminoAcid::*;
    match aa {
        Arg => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD"],
            ["CG", "CD", "NE"],
            ["CD", "NE", "CZ"],
            ["NE", "CZ", "NH1"],
            ["NE", "CZ", "NH2"],
            ["NH1", "CZ", "NH2"],
        ],
        Asn => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "OD1"],
            ["CB", "CG", "ND2"],
            ["OD1", "CG", "ND2"],
        ],
        Asp => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "OD1"],
            ["CB", "CG", "OD2"],
            ["OD1", "CG", "OD2"],
        ],
        Cys => &[["CA", "CB", "SG"]],
        Gln => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD"],
            ["CG", "CD", "OE1"],
            ["CG", "CD", "NE2"],
            ["OE1", "CD", "NE2"],
        ],
        Glu => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD"],
            ["CG", "CD", "OE1"],
            ["CG", "CD", "OE2"],
            ["OE1", "CD", "OE2"],
        ],
        His => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "ND1"],
            ["CB", "CG", "CD2"],
            ["ND1", "CG", "CD2"],
            ["CG", "ND1", "CE1"],
            ["CG", "CD2", "NE2"],
            ["ND1", "CE1", "NE2"],
            ["CD2", "NE2", "CE1"],
        ],
        Ile => &[
            ["CA", "CB", "CG1"],
            ["CA", "CB", "CG2"],
            ["CG1", "CB", "CG2"],
            ["CB", "CG1", "CD1"],
        ],
        Leu => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD1"],
            ["CB", "CG", "CD2"],
            ["CD1", "CG", "CD2"],
        ],
        Lys => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD"],
            ["CG", "CD", "CE"],
            ["CD", "CE", "NZ"],
        ],
        Met => &[["CA", "CB", "CG"], ["CB", "CG", "SD"], ["CG", "SD", "CE"]],
        Phe => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD1"],
            ["CB", "CG", "CD2"],
            ["CD1", "CG", "CD2"],
            ["CG", "CD1", "CE1"],
            ["CG", "CD2", "CE2"],
            ["CD1", "CE1", "CZ"],
            ["CD2", "CE2", "CZ"],
            ["CE1", "CZ", "CE2"],
        ],
        Pro => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD"],
            ["CG", "CD", "N"],
            ["CD", "N", "CA"],
            ["C-1", "N", "CD"],
        ],
        Ser => &[["CA", "CB", "OG"]],
        Thr => &[["CA", "CB", "OG1"], ["CA", "CB", "CG2"], ["OG1", "CB", "CG2"]],
        Trp => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD1"],
            ["CB", "CG", "CD2"],
            ["CD1", "CG", "CD2"],
            ["CG", "CD1", "NE1"],
            ["CD1", "NE1", "CE2"],
            ["NE1", "CE2", "CD2"],
            ["CE2", "CD2", "CG"],
            ["CG", "CD2", "CE3"],
            ["CD2", "CE2", "CZ2"],
            ["CE2", "CZ2", "CH2"],
            ["CZ2", "CH2", "CZ3"],
            ["CH2", "CZ3", "CE3"],
            ["CZ3", "CE3", "CD2"],
        ],
        Tyr => &[
            ["CA", "CB", "CG"],
            ["CB", "CG", "CD1"],
            ["CB", "CG", "CD2"],
            ["CD1", "CG", "CD2"],
            ["CG", "CD1", "CE1"],
            ["CG", "CD2", "CE2"],
            ["CD1", "CE1", "CZ"],
            ["CD2", "CE2", "CZ"],
            ["CE1", "CZ", "CE2"],
            ["CE1", "CZ", "OH"],
            ["CE2", "CZ", "OH"],
        ],
        Val => &[["CA", "CB", "CG1"], ["CA", "CB", "CG2"], ["CG1", "CB", "CG2"]],
        Ala | Gly => &[],
    }
}

/// Record key for a bond length, e.g. `CB_CG`.
pub fn length_key(pair: &[&str; 2]) -> String {
    format!("{}_{}", pair[0], pair[1])
}

/// Record key for a bond angle, e.g. `CA_CB_CG`; `C-1` becomes `C_1`.
pub fn angle_key(triple: &[&str; 3]) -> String {
    format!("{}_{}_{}", triple[0], triple[1], triple[2]).replace('-', "_")
}

/// Measured side-chain lengths and angles, keyed as above.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SideChainGeometry {
    pub lengths: BTreeMap<String, f64>,
    pub angles: BTreeMap<String, f64>,
}

impl SideChainGeometry {
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty() && self.angles.is_empty()
    }
}

/// Measure every tabulated length and angle whose atoms are present.
pub fn compute_side_chain(
    aa: AminoAcid,
    atoms: &AtomCoords,
    prev: Option<&AtomCoords>,
) -> SideChainGeometry {
    let mut geometry = SideChainGeometry::default();

    for pair in bond_length_pairs(aa) {
        if let (Some(a), Some(b)) = (locate(pair[0], atoms, prev), locate(pair[1], atoms, prev)) {
            let d = distance(&a, &b);
            if d.is_finite() {
                geometry.lengths.insert(length_key(pair), d);
            }
        }
    }

    for triple in bond_angle_triples(aa) {
        let points = (
            locate(triple[0], atoms, prev),
            locate(triple[1], atoms, prev),
            locate(triple[2], atoms, prev),
        );
        if let (Some(a), Some(b), Some(c)) = points {
            let theta = angle(&a, &b, &c);
            if theta.is_finite() {
                geometry.angles.insert(angle_key(triple), theta);
            }
        }
    }

    geometry
}
