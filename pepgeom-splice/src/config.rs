//! Run configuration for geometry extraction.

use pepgeom_core::{PepgeomError, Result};

/// C(i-1)..N(i) distance in Angstroms at or above which two consecutive
/// residues are treated as not covalently bonded.
pub const DEFAULT_CHAIN_BREAK_DISTANCE: f64 = 2.5;

/// Settings shared by every protein in a batch.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SpliceConfig {
    /// Size of the worker pool.
    pub workers: usize,
    /// Peptide-bond length threshold for chain-break detection.
    pub chain_break_distance: f64,
    /// Skip proteins whose stored results are at least as new as the file.
    pub skip_unchanged: bool,
}

impl Default for SpliceConfig {
    fn default() -> Self {
        Self {
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            chain_break_distance: DEFAULT_CHAIN_BREAK_DISTANCE,
            skip_unchanged: true,
        }
    }
}

impl SpliceConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    pub fn with_chain_break_distance(mut self, distance: f64) -> Self {
        self.chain_break_distance = distance;
        self
    }

    pub fn with_skip_unchanged(mut self, skip: bool) -> Self {
        self.skip_unchanged = skip;
        self
    }

    /// Check that the settings describe a runnable batch.
    ///
    /// # Errors
    ///
    /// Returns [`PepgeomError::InvalidInput`] for an empty worker pool or a
    /// break distance that is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if self.workers == 0 {
            return Err(PepgeomError::InvalidInput(
                "worker pool must have at least one thread".into(),
            ));
        }
        if !(self.chain_break_distance.is_finite() && self.chain_break_distance > 0.0) {
            return Err(PepgeomError::InvalidInput(format!(
                "chain break distance must be positive, got {}",
                self.chain_break_distance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = SpliceConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.chain_break_distance, 2.5);
        assert!(config.skip_unchanged);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_setters() {
        let config = SpliceConfig::default()
            .with_workers(3)
            .with_chain_break_distance(2.0)
            .with_skip_unchanged(false);
        assert_eq!(config.workers, 3);
        assert_eq!(config.chain_break_distance, 2.0);
        assert!(!config.skip_unchanged);
    }

    #[test]
    fn rejects_unrunnable_settings() {
        assert!(SpliceConfig::default().with_workers(0).validate().is_err());
        assert!(SpliceConfig::default()
            .with_chain_break_distance(f64::NAN)
            .validate()
            .is_err());
        assert!(SpliceConfig::default()
            .with_chain_break_distance(-1.0)
            .validate()
            .is_err());
    }
}
