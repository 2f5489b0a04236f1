//! The twenty standard amino acids.

use core::fmt;
use core::str::FromStr;

use pepgeom_core::PepgeomError;

/// A standard amino-acid residue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AminoAcid {
    Ala,
    Arg,
    Asn,
    Asp,
    Cys,
    Gln,
    Glu,
    Gly,
    His,
    Ile,
    Leu,
    Lys,
    Met,
    Phe,
    Pro,
    Ser,
    Thr,
    Trp,
    Tyr,
    Val,
}

impl AminoAcid {
    /// All twenty, in alphabetical order of their three-letter names.
    pub const ALL: [AminoAcid; 20] = [
        AminoAcid::Ala,
        AminoAcid::Arg,
        AminoAcid::Asn,
        AminoAcid::Asp,
        AminoAcid::Cys,
        AminoAcid::Gln,
        AminoAcid::Glu,
        AminoAcid::Gly,
        AminoAcid::His,
        AminoAcid::Ile,
        AminoAcid::Leu,
        AminoAcid::Lys,
        AminoAcid::Met,
        AminoAcid::Phe,
        AminoAcid::Pro,
        AminoAcid::Ser,
        AminoAcid::Thr,
        AminoAcid::Trp,
        AminoAcid::Tyr,
        AminoAcid::Val,
    ];

    /// Look up a residue by its PDB three-letter name ("ALA").
    pub fn from_three_letter(name: &str) -> Option<Self> {
        AminoAcid::ALL
            .iter()
            .copied()
            .find(|aa| aa.three_letter() == name)
    }

    /// PDB three-letter residue name.
    pub fn three_letter(&self) -> &'static str {
        match self {
            AminoAcid::Ala => "ALA",
            AminoAcid::Arg => "ARG",
            AminoAcid::Asn => "ASN",
            AminoAcid::Asp => "ASP",
            AminoAcid::Cys => "CYS",
            AminoAcid::Gln => "GLN",
            AminoAcid::Glu => "GLU",
            AminoAcid::Gly => "GLY",
            AminoAcid::His => "HIS",
            AminoAcid::Ile => "ILE",
            AminoAcid::Leu => "LEU",
            AminoAcid::Lys => "LYS",
            AminoAcid::Met => "MET",
            AminoAcid::Phe => "PHE",
            AminoAcid::Pro => "PRO",
            AminoAcid::Ser => "SER",
            AminoAcid::Thr => "THR",
            AminoAcid::Trp => "TRP",
            AminoAcid::Tyr => "TYR",
            AminoAcid::Val => "VAL",
        }
    }

    /// IUPAC one-letter code, upper case.
    pub fn one_letter(&self) -> char {
        match self {
            AminoAcid::Ala => 'A',
            AminoAcid::Arg => 'R',
            AminoAcid::Asn => 'N',
            AminoAcid::Asp => 'D',
            AminoAcid::Cys => 'C',
            AminoAcid::Gln => 'Q',
            AminoAcid::Glu => 'E',
            AminoAcid::Gly => 'G',
            AminoAcid::His => 'H',
            AminoAcid::Ile => 'I',
            AminoAcid::Leu => 'L',
            AminoAcid::Lys => 'K',
            AminoAcid::Met => 'M',
            AminoAcid::Phe => 'F',
            AminoAcid::Pro => 'P',
            AminoAcid::Ser => 'S',
            AminoAcid::Thr => 'T',
            AminoAcid::Trp => 'W',
            AminoAcid::Tyr => 'Y',
            AminoAcid::Val => 'V',
        }
    }

    /// Whether the side chain extends past CB. False for glycine and alanine.
    pub fn has_side_chain_beyond_cb(&self) -> bool {
        !matches!(self, AminoAcid::Gly | AminoAcid::Ala)
    }
}

impl fmt::Display for AminoAcid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.three_letter())
    }
}

impl FromStr for AminoAcid {
    type Err = PepgeomError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AminoAcid::from_three_letter(s.trim())
            .ok_or_else(|| PepgeomError::InvalidInput(format!("not a standard amino acid: {s:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name() {
        assert_eq!(AminoAcid::from_three_letter("TRP"), Some(AminoAcid::Trp));
        assert_eq!(AminoAcid::from_three_letter("MSE"), None);
        assert_eq!(AminoAcid::from_three_letter("HOH"), None);
        assert_eq!("LYS".parse::<AminoAcid>().unwrap(), AminoAcid::Lys);
        assert!("SEC".parse::<AminoAcid>().is_err());
    }

    #[test]
    fn names_are_consistent() {
        for aa in AminoAcid::ALL {
            assert_eq!(AminoAcid::from_three_letter(aa.three_letter()), Some(aa));
        }
        let letters: String = AminoAcid::ALL.iter().map(|aa| aa.one_letter()).collect();
        assert_eq!(letters, "ARNDCQEGHILKMFPSTWYV");
    }

    #[test]
    fn short_side_chains() {
        assert!(!AminoAcid::Gly.has_side_chain_beyond_cb());
        assert!(!AminoAcid::Ala.has_side_chain_beyond_cb());
        assert!(AminoAcid::Ser.has_side_chain_beyond_cb());
    }
}
