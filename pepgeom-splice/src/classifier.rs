//! Interface to the external secondary-structure classifier.
//!
//! Assignment itself (DSSP or similar) runs outside this crate. A classifier
//! receives the resolved structure and answers per (chain, sequence id).

use std::collections::HashMap;

use pepgeom_core::Result;
use pepgeom_struct::secondary::SecondaryStructure;
use pepgeom_struct::types::{SequenceId, Structure};

/// What the classifier reports for one residue.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassifierEntry {
    pub class: SecondaryStructure,
    pub accessibility: Option<f64>,
    pub relative_accessibility: Option<f64>,
    pub phi: Option<f64>,
    pub psi: Option<f64>,
}

impl ClassifierEntry {
    /// An entry carrying only a class.
    pub fn class_only(class: SecondaryStructure) -> Self {
        Self {
            class,
            accessibility: None,
            relative_accessibility: None,
            phi: None,
            psi: None,
        }
    }
}

/// Classifier output for one protein.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierOutput {
    entries: HashMap<(char, SequenceId), ClassifierEntry>,
}

impl ClassifierOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chain: char, residue: SequenceId, entry: ClassifierEntry) {
        self.entries.insert((chain, residue), entry);
    }

    pub fn get(&self, chain: char, residue: SequenceId) -> Option<&ClassifierEntry> {
        self.entries.get(&(chain, residue))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<((char, SequenceId), ClassifierEntry)> for ClassifierOutput {
    fn from_iter<I: IntoIterator<Item = ((char, SequenceId), ClassifierEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Assigns secondary structure to the residues of a structure.
pub trait SecondaryStructureClassifier: Send + Sync {
    /// Classify `structure`. An empty output means nothing could be assigned.
    fn classify(&self, structure: &Structure) -> Result<ClassifierOutput>;
}

/// Serves assignments computed ahead of time, keyed by protein code
/// (case-insensitive).
///
/// With a default class set, residues of proteins without a table get that
/// class; otherwise such proteins classify to an empty output.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedClassifier {
    tables: HashMap<String, ClassifierOutput>,
    default_class: Option<SecondaryStructure>,
}

impl PrecomputedClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_protein(mut self, code: &str, output: ClassifierOutput) -> Self {
        self.insert(code, output);
        self
    }

    pub fn with_default_class(mut self, class: SecondaryStructure) -> Self {
        self.default_class = Some(class);
        self
    }

    pub fn insert(&mut self, code: &str, output: ClassifierOutput) {
        self.tables.insert(code.to_ascii_lowercase(), output);
    }
}

impl SecondaryStructureClassifier for PrecomputedClassifier {
    fn classify(&self, structure: &Structure) -> Result<ClassifierOutput> {
        if let Some(table) = self.tables.get(&structure.id.to_ascii_lowercase()) {
            return Ok(table.clone());
        }
        let Some(class) = self.default_class else {
            return Ok(ClassifierOutput::new());
        };
        Ok(structure
            .chains
            .iter()
            .flat_map(|chain| {
                chain
                    .residues
                    .iter()
                    .map(move |r| ((chain.id, r.sequence_id()), ClassifierEntry::class_only(class)))
            })
            .collect())
    }
}
