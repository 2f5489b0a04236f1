//! Result store interface and an in-memory implementation.
//!
//! One protein is one transaction: everything written between
//! [`GeometryStore::begin`] and [`StoreTransaction::commit`] becomes visible
//! together, or not at all. Rows are keyed by protein code, chain id and
//! residue [`SequenceId`], so a re-import updates rows in place.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};

use pepgeom_core::{PepgeomError, Result};
use pepgeom_struct::types::SequenceId;

use crate::record::{ChainRecord, ProteinMeta, ProteinRecord, ResidueRecord};

/// Writes staged for one protein.
pub trait StoreTransaction {
    fn upsert_protein(&mut self, meta: &ProteinMeta) -> Result<()>;

    fn upsert_chain(&mut self, code: &str, chain: char) -> Result<()>;

    fn upsert_residue(&mut self, code: &str, chain: char, residue: &ResidueRecord) -> Result<()>;

    /// Publish every staged write.
    fn commit(self: Box<Self>) -> Result<()>;

    /// Discard every staged write.
    fn rollback(self: Box<Self>);

    /// Stage a whole protein tree.
    fn upsert(&mut self, record: &ProteinRecord) -> Result<()> {
        let code = record.meta.code.as_str();
        self.upsert_protein(&record.meta)?;
        for chain in &record.chains {
            self.upsert_chain(code, chain.id)?;
            for residue in &chain.residues {
                self.upsert_residue(code, chain.id, residue)?;
            }
        }
        Ok(())
    }
}

/// Persistent home of computed geometry.
pub trait GeometryStore: Send + Sync {
    /// Source timestamp recorded for `code`, if the protein is stored.
    fn source_timestamp(&self, code: &str) -> Result<Option<DateTime<Utc>>>;

    /// Start a transaction.
    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>>;
}

#[derive(Debug, Clone)]
struct StoredProtein {
    meta: ProteinMeta,
    chains: BTreeMap<char, BTreeMap<SequenceId, ResidueRecord>>,
}

impl StoredProtein {
    fn to_record(&self) -> ProteinRecord {
        let chains = self
            .chains
            .iter()
            .map(|(id, residues)| {
                let mut residues: Vec<ResidueRecord> = residues.values().cloned().collect();
                residues.sort_by_key(|r| r.chain_index);
                ChainRecord { id: *id, residues }
            })
            .collect();
        ProteinRecord {
            meta: self.meta.clone(),
            chains,
        }
    }
}

/// Store kept in memory. Commits are serialised by a mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    proteins: Mutex<BTreeMap<String, StoredProtein>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, StoredProtein>>> {
        self.proteins
            .lock()
            .map_err(|_| PepgeomError::Store("memory store lock poisoned".into()))
    }

    /// Number of stored proteins.
    pub fn len(&self) -> usize {
        self.lock().map_or(0, |p| p.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Stored protein codes, sorted.
    pub fn codes(&self) -> Vec<String> {
        self.lock()
            .map(|p| p.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The stored tree for `code`, residues in chain-index order.
    pub fn protein(&self, code: &str) -> Option<ProteinRecord> {
        self.lock().ok()?.get(code).map(StoredProtein::to_record)
    }
}

impl GeometryStore for MemoryStore {
    fn source_timestamp(&self, code: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.lock()?.get(code).map(|p| p.meta.source_timestamp))
    }

    fn begin(&self) -> Result<Box<dyn StoreTransaction + '_>> {
        Ok(Box::new(MemoryTransaction {
            store: self,
            staged: BTreeMap::new(),
        }))
    }
}

struct MemoryTransaction<'a> {
    store: &'a MemoryStore,
    staged: BTreeMap<String, StoredProtein>,
}

impl MemoryTransaction<'_> {
    fn staged_protein(&mut self, code: &str) -> Result<&mut StoredProtein> {
        self.staged
            .get_mut(code)
            .ok_or_else(|| PepgeomError::Store(format!("protein {} not staged", code)))
    }
}

impl StoreTransaction for MemoryTransaction<'_> {
    fn upsert_protein(&mut self, meta: &ProteinMeta) -> Result<()> {
        if let Some(staged) = self.staged.get_mut(&meta.code) {
            staged.meta = meta.clone();
            return Ok(());
        }
        // get-or-create: start from the committed rows
        let existing = self.store.lock()?.get(&meta.code).cloned();
        let protein = match existing {
            Some(mut stored) => {
                stored.meta = meta.clone();
                stored
            }
            None => StoredProtein {
                meta: meta.clone(),
                chains: BTreeMap::new(),
            },
        };
        self.staged.insert(meta.code.clone(), protein);
        Ok(())
    }

    fn upsert_chain(&mut self, code: &str, chain: char) -> Result<()> {
        self.staged_protein(code)?.chains.entry(chain).or_default();
        Ok(())
    }

    fn upsert_residue(&mut self, code: &str, chain: char, residue: &ResidueRecord) -> Result<()> {
        let residues = self
            .staged_protein(code)?
            .chains
            .get_mut(&chain)
            .ok_or_else(|| PepgeomError::Store(format!("chain {}{} not staged", code, chain)))?;
        residues.insert(residue.sequence_id, residue.clone());
        Ok(())
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction { store, staged } = *self;
        store.lock()?.extend(staged);
        Ok(())
    }

    fn rollback(self: Box<Self>) {}
}
