//! Where structure files live, and reading them.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use pepgeom_core::compress::read_maybe_compressed;
use pepgeom_core::hash::sha256;
use pepgeom_core::{PepgeomError, Result};
use pepgeom_struct::pdb::{parse_pdb_with, ParseOptions};
use pepgeom_struct::types::Structure;

/// Maps a protein code to the file holding its coordinates.
pub trait StructureSource: Send + Sync {
    fn locate(&self, code: &str) -> Result<PathBuf>;
}

/// Directory layout of a local PDB mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MirrorLayout {
    /// `<root>/ab/pdb1abc.ent.gz`, grouped by the middle two characters.
    Divided,
    /// `<root>/pdb1abc.ent.gz`.
    Flat,
}

/// A local copy of the wwPDB coordinate archive.
#[derive(Debug, Clone)]
pub struct PdbMirror {
    root: PathBuf,
    layout: MirrorLayout,
}

impl PdbMirror {
    pub fn new(root: impl Into<PathBuf>, layout: MirrorLayout) -> Self {
        Self {
            root: root.into(),
            layout,
        }
    }

    /// The divided layout, as distributed by wwPDB.
    pub fn divided(root: impl Into<PathBuf>) -> Self {
        Self::new(root, MirrorLayout::Divided)
    }

    pub fn flat(root: impl Into<PathBuf>) -> Self {
        Self::new(root, MirrorLayout::Flat)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl StructureSource for PdbMirror {
    fn locate(&self, code: &str) -> Result<PathBuf> {
        let code = code.to_ascii_lowercase();
        if code.len() != 4 || !code.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(PepgeomError::InvalidInput(format!(
                "not a PDB code: {:?}",
                code
            )));
        }
        let file = format!("pdb{}.ent.gz", code);
        Ok(match self.layout {
            MirrorLayout::Divided => self.root.join(&code[1..3]).join(file),
            MirrorLayout::Flat => self.root.join(file),
        })
    }
}

/// A parsed structure and what is known about the file it came from.
#[derive(Debug, Clone)]
pub struct LoadedStructure {
    pub structure: Structure,
    /// SHA-256 of the decompressed text.
    pub digest: String,
}

/// Modification time of `path`.
pub fn modified_at(path: &Path) -> Result<DateTime<Utc>> {
    let modified = std::fs::metadata(path)
        .and_then(|m| m.modified())
        .map_err(|e| PepgeomError::io_at(path, e))?;
    Ok(DateTime::<Utc>::from(modified))
}

/// Read a gzip, zstd or plain-text PDB file, keeping only amino-acid
/// records.
pub fn load_structure(path: &Path) -> Result<LoadedStructure> {
    let bytes = read_maybe_compressed(path)?;
    let digest = sha256(&bytes);
    // stray non-UTF-8 bytes (Latin-1 in old REMARK lines) only touch free-text columns
    let text = String::from_utf8_lossy(&bytes);
    let structure = parse_pdb_with(&text, &ParseOptions::amino_acids_only())
        .map_err(|e| match e {
            PepgeomError::Parse(msg) => PepgeomError::Parse(format!("{}: {}", path.display(), msg)),
            other => other,
        })?;
    Ok(LoadedStructure { structure, digest })
}
