//! Core types for macromolecular 3D structure representation.

use core::fmt;

use pepgeom_core::Summarizable;

/// A point in 3D Cartesian space.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3D {
    /// Create a new point.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// The origin.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point3D) -> f64 {
        self.sub(other).norm()
    }

    /// Dot product.
    pub fn dot(&self, other: &Point3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Cross product.
    pub fn cross(&self, other: &Point3D) -> Point3D {
        Point3D {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Vector magnitude.
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Unit vector in the same direction, or zero if magnitude is zero.
    pub fn normalize(&self) -> Point3D {
        let n = self.norm();
        if n < 1e-15 {
            Point3D::zero()
        } else {
            self.scale(1.0 / n)
        }
    }

    /// Vector addition.
    pub fn add(&self, other: &Point3D) -> Point3D {
        Point3D::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Vector subtraction.
    pub fn sub(&self, other: &Point3D) -> Point3D {
        Point3D::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Scalar multiplication.
    pub fn scale(&self, s: f64) -> Point3D {
        Point3D::new(self.x * s, self.y * s, self.z * s)
    }

    /// All three components are finite (no NaN, no infinity).
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// A single atom in a macromolecular structure.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Atom {
    /// Atom serial number.
    pub serial: u32,
    /// Atom name with padding removed (e.g. "CA", "N", "OD1").
    pub name: String,
    /// Alternate location indicator.
    pub alt_loc: Option<char>,
    /// 3D coordinates in Angstroms.
    pub coords: Point3D,
    /// Occupancy factor.
    pub occupancy: f64,
    /// Temperature factor (B-factor).
    pub temp_factor: f64,
    /// Element symbol.
    pub element: Option<String>,
    /// Whether this is a HETATM record.
    pub is_hetatm: bool,
}

impl Atom {
    /// Whether this atom is a backbone atom (N, CA, C, O).
    pub fn is_backbone(&self) -> bool {
        matches!(self.name.as_str(), "N" | "CA" | "C" | "O")
    }

    /// Whether this atom is hydrogen (or deuterium).
    ///
    /// The element column wins when present; otherwise the first letter of
    /// the name after any leading digit decides ("1HB2" is a hydrogen).
    pub fn is_hydrogen(&self) -> bool {
        match self.element.as_deref() {
            Some(e) => e.eq_ignore_ascii_case("H") || e.eq_ignore_ascii_case("D"),
            None => matches!(
                self.name.trim_start_matches(|c: char| c.is_ascii_digit()).chars().next(),
                Some('H') | Some('D')
            ),
        }
    }
}

/// Residue sequence number plus insertion code, e.g. `42` or `42A`.
///
/// This is the key a residue keeps across re-imports of the same entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SequenceId {
    pub number: i32,
    pub insertion: Option<char>,
}

impl SequenceId {
    pub fn new(number: i32, insertion: Option<char>) -> Self {
        Self { number, insertion }
    }
}

impl From<i32> for SequenceId {
    fn from(number: i32) -> Self {
        Self::new(number, None)
    }
}

impl fmt::Display for SequenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.insertion {
            Some(code) => write!(f, "{}{}", self.number, code),
            None => write!(f, "{}", self.number),
        }
    }
}

/// A residue (amino acid or nucleotide) in a chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Residue {
    /// Three-letter residue name (e.g. "ALA", "GLY").
    pub name: String,
    /// Sequence number from the PDB file.
    pub seq_num: i32,
    /// Insertion code.
    pub i_code: Option<char>,
    /// Atoms belonging to this residue, alternate locations included.
    pub atoms: Vec<Atom>,
}

impl Residue {
    /// Get an atom by name, returning the first match.
    pub fn get_atom(&self, name: &str) -> Option<&Atom> {
        self.atoms.iter().find(|a| a.name == name)
    }

    /// Sequence number and insertion code as one key.
    pub fn sequence_id(&self) -> SequenceId {
        SequenceId::new(self.seq_num, self.i_code)
    }

    /// Whether any atom of this residue came from a HETATM record.
    pub fn is_hetero(&self) -> bool {
        self.atoms.iter().any(|a| a.is_hetatm)
    }

    /// Whether every backbone atom (N, CA, C, O) is present under some altloc.
    pub fn has_backbone(&self) -> bool {
        ["N", "CA", "C", "O"]
            .iter()
            .all(|name| self.get_atom(name).is_some())
    }
}

/// A polypeptide or polynucleotide chain.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Chain {
    /// Single-character chain identifier.
    pub id: char,
    /// Residues in this chain, in file order.
    pub residues: Vec<Residue>,
}

impl Chain {
    /// Create a new chain.
    pub fn new(id: char, residues: Vec<Residue>) -> Self {
        Self { id, residues }
    }

    /// Number of residues.
    pub fn residue_count(&self) -> usize {
        self.residues.len()
    }

    /// Total number of atoms across all residues.
    pub fn atom_count(&self) -> usize {
        self.residues.iter().map(|r| r.atoms.len()).sum()
    }
}

/// A complete macromolecular structure (one or more chains).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Structure {
    /// PDB identifier or user-supplied name.
    pub id: String,
    /// Chains in this structure.
    pub chains: Vec<Chain>,
}

impl Structure {
    /// Number of chains.
    pub fn chain_count(&self) -> usize {
        self.chains.len()
    }

    /// Total residues across all chains.
    pub fn residue_count(&self) -> usize {
        self.chains.iter().map(|c| c.residue_count()).sum()
    }

    /// Total atoms across all chains.
    pub fn atom_count(&self) -> usize {
        self.chains.iter().map(|c| c.atom_count()).sum()
    }

    /// Get a chain by its single-character ID.
    pub fn get_chain(&self, id: char) -> Option<&Chain> {
        self.chains.iter().find(|c| c.id == id)
    }
}

impl Summarizable for Structure {
    fn summary(&self) -> String {
        format!(
            "Structure {}: {} chain(s), {} residue(s), {} atom(s)",
            self.id,
            self.chain_count(),
            self.residue_count(),
            self.atom_count(),
        )
    }
}
