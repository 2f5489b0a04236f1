//! Protein 3D structures for the pepgeom workspace.
//!
//! - **PDB parsing**: read coordinate files with [`pdb::parse_pdb`]
//! - **Coordinate geometry**: distance, bond angle and dihedral in [`geometry`]
//! - **Residue vocabulary**: the twenty standard amino acids in [`amino`]
//! - **Secondary structure**: DSSP class codes in [`secondary`]
//!
//! # Quick start
//!
//! ```
//! use pepgeom_struct::pdb::parse_pdb;
//! use pepgeom_core::Summarizable;
//!
//! let pdb_text = "\
//! HEADER                                                        1TST
//! ATOM      1  N   ALA A   1       1.000   2.000   3.000  1.00  0.00           N
//! ATOM      2  CA  ALA A   1       2.000   2.000   3.000  1.00  0.00           C
//! ATOM      3  C   ALA A   1       3.000   2.000   3.000  1.00  0.00           C
//! ATOM      4  O   ALA A   1       3.000   3.000   3.000  1.00  0.00           O
//! TER
//! END
//! ";
//!
//! let structure = parse_pdb(pdb_text).unwrap();
//! assert_eq!(structure.chain_count(), 1);
//! assert!(structure.summary().contains("1TST"));
//! ```

pub mod amino;
pub mod geometry;
pub mod pdb;
pub mod secondary;
pub mod types;

pub use amino::AminoAcid;
pub use geometry::{angle, dihedral, distance};
pub use pdb::{parse_pdb, parse_pdb_with, ParseOptions};
pub use secondary::SecondaryStructure;
pub use types::{Atom, Chain, Point3D, Residue, SequenceId, Structure};

#[cfg(test)]
mod tests {
    use super::*;
    use pepgeom_core::Summarizable;

    #[test]
    fn integration_parse_and_measure() {
        let pdb_text = "\
HEADER                                                        1INT\n\
ATOM      1  N   ALA A   1       0.000   0.000   0.000  1.00  0.00           N\n\
ATOM      2  CA  ALA A   1       1.458   0.000   0.000  1.00  0.00           C\n\
ATOM      3  C   ALA A   1       2.009   1.420   0.000  1.00  0.00           C\n\
ATOM      4  O   ALA A   1       1.246   2.390   0.000  1.00  0.00           O\n\
ATOM      5  N   GLY A   2       3.325   1.506   0.000  1.00  0.00           N\n\
ATOM      6  CA  GLY A   2       3.988   2.802   0.000  1.00  0.00           C\n\
ATOM      7  C   GLY A   2       5.504   2.714   0.000  1.00  0.00           C\n\
ATOM      8  O   GLY A   2       6.092   1.635   0.000  1.00  0.00           O\n\
TER\n\
END\n";

        let s = parse_pdb(pdb_text).unwrap();
        assert_eq!(s.id, "1INT");
        assert_eq!(s.residue_count(), 2);
        assert!(s.summary().contains("2 residue"));

        let chain = s.get_chain('A').unwrap();
        let c = &chain.residues[0].get_atom("C").unwrap().coords;
        let n = &chain.residues[1].get_atom("N").unwrap().coords;
        let peptide = distance(c, n);
        assert!(peptide > 1.2 && peptide < 1.4);

        let aa: Vec<AminoAcid> = chain
            .residues
            .iter()
            .filter_map(|r| AminoAcid::from_three_letter(&r.name))
            .collect();
        assert_eq!(aa, vec![AminoAcid::Ala, AminoAcid::Gly]);
    }
}
