//! Secondary-structure classes as reported by a DSSP-style classifier.
//!
//! The assignment itself is done by an external program; this module only
//! gives its single-letter output a type.

use core::fmt;

/// DSSP 8-state classification of a single residue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SecondaryStructure {
    /// Alpha-helix (i -> i+4 H-bond pattern).
    AlphaHelix,
    /// 3_10-helix (i -> i+3 H-bond pattern).
    ThreeTenHelix,
    /// Pi-helix (i -> i+5 H-bond pattern).
    PiHelix,
    /// Extended strand in a beta-sheet.
    Strand,
    /// Isolated beta-bridge residue.
    Bridge,
    /// Hydrogen-bonded turn.
    Turn,
    /// Bend.
    Bend,
    /// None of the above.
    Coil,
}

impl SecondaryStructure {
    /// Parse a DSSP single-character code. Blank, `-` and `C` all mean coil.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'H' => Some(SecondaryStructure::AlphaHelix),
            'G' => Some(SecondaryStructure::ThreeTenHelix),
            'I' => Some(SecondaryStructure::PiHelix),
            'E' => Some(SecondaryStructure::Strand),
            'B' => Some(SecondaryStructure::Bridge),
            'T' => Some(SecondaryStructure::Turn),
            'S' => Some(SecondaryStructure::Bend),
            ' ' | '-' | 'C' => Some(SecondaryStructure::Coil),
            _ => None,
        }
    }

    /// Single-character DSSP code.
    pub fn code(&self) -> char {
        match self {
            SecondaryStructure::AlphaHelix => 'H',
            SecondaryStructure::ThreeTenHelix => 'G',
            SecondaryStructure::PiHelix => 'I',
            SecondaryStructure::Strand => 'E',
            SecondaryStructure::Bridge => 'B',
            SecondaryStructure::Turn => 'T',
            SecondaryStructure::Bend => 'S',
            SecondaryStructure::Coil => '-',
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            SecondaryStructure::AlphaHelix => "alpha helix",
            SecondaryStructure::ThreeTenHelix => "3-10 helix",
            SecondaryStructure::PiHelix => "pi helix",
            SecondaryStructure::Strand => "beta sheet",
            SecondaryStructure::Bridge => "beta bridge",
            SecondaryStructure::Turn => "turn",
            SecondaryStructure::Bend => "bend",
            SecondaryStructure::Coil => "coil",
        }
    }

    /// Whether this is one of the three helix classes.
    pub fn is_helix(&self) -> bool {
        matches!(
            self,
            SecondaryStructure::AlphaHelix
                | SecondaryStructure::ThreeTenHelix
                | SecondaryStructure::PiHelix
        )
    }
}

impl fmt::Display for SecondaryStructure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
