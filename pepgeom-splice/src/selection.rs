//! Selection lines: which proteins to import and the crystallographic
//! metadata that travels with them.
//!
//! One protein per line, six whitespace-separated fields:
//!
//! ```text
//! code chains threshold resolution rfactor rfree
//! 1abc AB     25.0      1.8        0.19    0.23
//! ```
//!
//! `chains` is a run of single-character chain ids.

use core::fmt;
use core::str::FromStr;
use std::path::Path;

use pepgeom_core::{PepgeomError, Result};

/// Chain field of a selection line that accepts every chain.
pub const ALL_CHAINS: &str = "*";

/// One protein to import.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SelectionEntry {
    pub code: String,
    /// Chains to process. Empty accepts every chain, written as
    /// [`ALL_CHAINS`] in a selection line.
    pub chains: Vec<char>,
    pub threshold: f64,
    pub resolution: f64,
    pub rfactor: f64,
    pub rfree: f64,
}

impl SelectionEntry {
    /// An entry for `code` with no chain filter and zeroed metadata.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            chains: Vec::new(),
            threshold: 0.0,
            resolution: 0.0,
            rfactor: 0.0,
            rfree: 0.0,
        }
    }

    pub fn with_chains(mut self, chains: &str) -> Self {
        self.chains = chains.chars().collect();
        self
    }

    /// Whether chain `id` should be processed.
    pub fn accepts_chain(&self, id: char) -> bool {
        self.chains.is_empty() || self.chains.contains(&id)
    }
}

impl FromStr for SelectionEntry {
    type Err = PepgeomError;

    fn from_str(line: &str) -> Result<Self> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != 6 {
            return Err(PepgeomError::Parse(format!(
                "selection line needs 6 fields, found {}: {:?}",
                fields.len(),
                line
            )));
        }

        let number = |idx: usize, what: &str| -> Result<f64> {
            fields[idx].parse::<f64>().map_err(|e| {
                PepgeomError::Parse(format!("bad {} {:?}: {}", what, fields[idx], e))
            })
        };

        Ok(Self {
            code: fields[0].to_string(),
            chains: if fields[1] == ALL_CHAINS {
                Vec::new()
            } else {
                fields[1].chars().collect()
            },
            threshold: number(2, "threshold")?,
            resolution: number(3, "resolution")?,
            rfactor: number(4, "rfactor")?,
            rfree: number(5, "rfree")?,
        })
    }
}

impl fmt::Display for SelectionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chains: String = if self.chains.is_empty() {
            ALL_CHAINS.to_string()
        } else {
            self.chains.iter().collect()
        };
        write!(
            f,
            "{} {} {} {} {} {}",
            self.code, chains, self.threshold, self.resolution, self.rfactor, self.rfree
        )
    }
}

/// Parse a selection listing. Blank lines and `#` comments are skipped.
///
/// # Errors
///
/// Returns [`PepgeomError::Parse`] naming the 1-based line number of the
/// first malformed line.
pub fn parse_selection(text: &str) -> Result<Vec<SelectionEntry>> {
    let mut entries = Vec::new();
    for (line_num, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let entry = trimmed.parse::<SelectionEntry>().map_err(|e| match e {
            PepgeomError::Parse(msg) => {
                PepgeomError::Parse(format!("line {}: {}", line_num + 1, msg))
            }
            other => other,
        })?;
        entries.push(entry);
    }
    Ok(entries)
}

/// Read and parse a selection file.
pub fn read_selection_file(path: impl AsRef<Path>) -> Result<Vec<SelectionEntry>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| PepgeomError::io_at(path, e))?;
    parse_selection(&text)
}
