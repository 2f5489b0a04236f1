//! PDB format parser.
//!
//! Parses ATOM, HETATM, HEADER, and MODEL/ENDMDL records from PDB-format
//! text. Only the first MODEL is returned for multi-model (NMR) files.
//!
//! Atoms are grouped by chain and by (sequence number, insertion code,
//! residue name), so alternate-location records that interleave two residue
//! variants at the same position end up in two residues, and a chain whose
//! records resume after a TER (waters, ligands) is extended rather than
//! duplicated.

use std::collections::HashMap;

use pepgeom_core::{PepgeomError, Result};

use crate::amino::AminoAcid;
use crate::types::{Atom, Chain, Point3D, Residue, Structure};

/// Record-level filtering applied while parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop HETATM records naming a standard amino acid, and ATOM records
    /// naming anything else.
    pub amino_acid_records_only: bool,
}

impl ParseOptions {
    /// Options used for geometry extraction: keep only standard amino-acid
    /// ATOM records.
    pub fn amino_acids_only() -> Self {
        Self {
            amino_acid_records_only: true,
        }
    }

    fn keeps(&self, is_hetatm: bool, res_name: &str) -> bool {
        if !self.amino_acid_records_only {
            return true;
        }
        let standard = AminoAcid::from_three_letter(res_name).is_some();
        standard != is_hetatm
    }
}

/// Parse a PDB-format string into a [`Structure`], keeping every record.
///
/// # Errors
///
/// Returns an error if no ATOM records are found or if an ATOM record is
/// malformed (wrong column widths, unparseable coordinates).
pub fn parse_pdb(input: &str) -> Result<Structure> {
    parse_pdb_with(input, &ParseOptions::default())
}

/// Parse a PDB-format string into a [`Structure`] with record filtering.
pub fn parse_pdb_with(input: &str, options: &ParseOptions) -> Result<Structure> {
    let mut id = String::from("UNKN");
    let mut builder = StructureBuilder::default();
    let mut atom_count = 0u32;
    let mut seen_model = false;

    for line in input.lines() {
        if line.starts_with("ENDMDL") {
            break; // only first model
        }
        if line.starts_with("MODEL") {
            if seen_model {
                break;
            }
            seen_model = true;
            continue;
        }

        if line.starts_with("HEADER") {
            let pdb_id = safe_slice(line, 62, 66).trim();
            if !pdb_id.is_empty() {
                id = pdb_id.into();
            }
            continue;
        }

        let is_atom = line.starts_with("ATOM  ");
        let is_hetatm = line.starts_with("HETATM");
        if !(is_atom || is_hetatm) {
            continue;
        }

        let res_name = parse_residue_name(line);
        if !options.keeps(is_hetatm, &res_name) {
            continue;
        }

        let atom = parse_atom_record(line, is_hetatm)?;
        atom_count += 1;
        builder.push(
            parse_chain_id(line),
            parse_residue_seq(line)?,
            parse_insertion_code(line),
            res_name,
            atom,
        );
    }

    if atom_count == 0 {
        return Err(PepgeomError::Parse("no ATOM records found".into()));
    }

    Ok(Structure {
        id,
        chains: builder.chains,
    })
}

/// Parse a plain-text PDB file from disk.
#[cfg(feature = "std")]
pub fn parse_pdb_file(path: impl AsRef<std::path::Path>) -> Result<Structure> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| PepgeomError::io_at(path, e))?;
    parse_pdb(&contents)
}

type ResidueKey = (char, i32, Option<char>, String);

#[derive(Default)]
struct StructureBuilder {
    chains: Vec<Chain>,
    chain_slots: HashMap<char, usize>,
    residue_slots: HashMap<ResidueKey, (usize, usize)>,
}

impl StructureBuilder {
    fn push(&mut self, chain_id: char, seq_num: i32, i_code: Option<char>, name: String, atom: Atom) {
        let chains = &mut self.chains;
        let chain_slot = *self.chain_slots.entry(chain_id).or_insert_with(|| {
            chains.push(Chain::new(chain_id, Vec::new()));
            chains.len() - 1
        });

        let key = (chain_id, seq_num, i_code, name);
        let (c, r) = match self.residue_slots.get(&key) {
            Some(&slots) => slots,
            None => {
                let residues = &mut self.chains[chain_slot].residues;
                residues.push(Residue {
                    name: key.3.clone(),
                    seq_num,
                    i_code,
                    atoms: Vec::new(),
                });
                let slots = (chain_slot, residues.len() - 1);
                self.residue_slots.insert(key, slots);
                slots
            }
        };
        self.chains[c].residues[r].atoms.push(atom);
    }
}

fn parse_atom_record(line: &str, is_hetatm: bool) -> Result<Atom> {
    // PDB format is fixed-width columns. We need at least 54 chars for coords.
    if line.len() < 54 {
        return Err(PepgeomError::Parse(format!(
            "ATOM record too short ({} chars): {}",
            line.len(),
            line
        )));
    }

    let serial = safe_slice(line, 6, 11)
        .trim()
        .parse::<u32>()
        .map_err(|e| PepgeomError::Parse(format!("bad atom serial: {}", e)))?;

    let name = safe_slice(line, 12, 16).trim().to_string();

    let alt_loc = match safe_slice(line, 16, 17).chars().next() {
        Some(' ') | None => None,
        Some(c) => Some(c),
    };

    let coord = |start: usize, end: usize, axis: &str| -> Result<f64> {
        safe_slice(line, start, end)
            .trim()
            .parse::<f64>()
            .map_err(|e| PepgeomError::Parse(format!("bad {} coordinate: {}", axis, e)))
    };
    let coords = Point3D::new(coord(30, 38, "x")?, coord(38, 46, "y")?, coord(46, 54, "z")?);

    let occupancy = if line.len() >= 60 {
        safe_slice(line, 54, 60).trim().parse::<f64>().unwrap_or(1.0)
    } else {
        1.0
    };

    let temp_factor = if line.len() >= 66 {
        safe_slice(line, 60, 66).trim().parse::<f64>().unwrap_or(0.0)
    } else {
        0.0
    };

    let element = match safe_slice(line, 76, 78).trim() {
        "" => None,
        e => Some(e.to_string()),
    };

    Ok(Atom {
        serial,
        name,
        alt_loc,
        coords,
        occupancy,
        temp_factor,
        element,
        is_hetatm,
    })
}

fn parse_chain_id(line: &str) -> char {
    safe_slice(line, 21, 22).chars().next().unwrap_or(' ')
}

fn parse_residue_seq(line: &str) -> Result<i32> {
    safe_slice(line, 22, 26)
        .trim()
        .parse::<i32>()
        .map_err(|e| PepgeomError::Parse(format!("bad residue seq number: {}", e)))
}

fn parse_insertion_code(line: &str) -> Option<char> {
    match safe_slice(line, 26, 27).chars().next() {
        Some(' ') | None => None,
        Some(c) => Some(c),
    }
}

fn parse_residue_name(line: &str) -> String {
    safe_slice(line, 17, 20).trim().to_string()
}

/// Safe substring that handles short lines gracefully.
fn safe_slice(s: &str, start: usize, end: usize) -> &str {
    let len = s.len();
    if start >= len {
        return "";
    }
    // PDB files are ASCII; a stray multi-byte character yields an empty field
    s.get(start..end.min(len)).unwrap_or("")
}
