//! Whole-collection persistence of procedures and entries.
//!
//! Every mutation is one transaction: read the latest collection from the
//! store, apply the delta, write the whole collection back. Nothing is cached
//! between transactions, so a failed write leaves the store as the source of
//! truth.
//!
//! Concurrent writers race: two transactions that read the same snapshot both
//! write, and the later write wins. The store is single-user by assumption.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{Procedure, ProgressEntry};
use crate::error::{Result, TrackerError};
use crate::ports::KeyValueStore;

/// Store key holding the procedure collection.
pub const PROCEDURES_KEY: &str = "procedures";
/// Store key holding the progress entry collection.
pub const ENTRIES_KEY: &str = "progressEntries";

/// Typed access to the two persisted collections.
#[derive(Clone, Copy)]
pub struct TrackerRepository<'a> {
    store: &'a dyn KeyValueStore,
}

impl<'a> TrackerRepository<'a> {
    #[must_use]
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        Self { store }
    }

    /// Loads every procedure, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Persistence` if the store cannot be read or the
    /// stored value is not a valid collection.
    pub fn procedures(&self) -> Result<Vec<Procedure>> {
        self.load(PROCEDURES_KEY)
    }

    /// Loads every entry, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Persistence` if the store cannot be read or the
    /// stored value is not a valid collection.
    pub fn entries(&self) -> Result<Vec<ProgressEntry>> {
        self.load(ENTRIES_KEY)
    }

    /// Looks up a procedure by id.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Persistence` if the collection cannot be loaded.
    pub fn procedure(&self, id: Uuid) -> Result<Option<Procedure>> {
        Ok(self.procedures()?.into_iter().find(|p| p.id == id))
    }

    /// Looks up an entry by id.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Persistence` if the collection cannot be loaded.
    pub fn entry(&self, id: Uuid) -> Result<Option<ProgressEntry>> {
        Ok(self.entries()?.into_iter().find(|e| e.id() == id))
    }

    /// Appends a procedure.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Persistence` if the read or write fails.
    pub fn add_procedure(&self, procedure: Procedure) -> Result<()> {
        let id = procedure.id;
        self.transact(PROCEDURES_KEY, |all: &mut Vec<Procedure>| {
            all.push(procedure);
        })?;
        info!("Saved procedure {id}");
        Ok(())
    }

    /// Appends an entry.
    ///
    /// # Errors
    ///
    /// Returns `TrackerError::Persistence` if the read or write fails.
    pub fn append_entry(&self, entry: ProgressEntry) -> Result<()> {
        let id = entry.id();
        self.transact(ENTRIES_KEY, |all: &mut Vec<ProgressEntry>| {
            all.push(entry);
        })?;
        info!("Saved progress entry {id}");
        Ok(())
    }

    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>> {
        let raw = self
            .store
            .read(key)
            .map_err(|e| TrackerError::Persistence(format!("reading '{key}': {e:#}")))?;
        match raw {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                TrackerError::Persistence(format!("stored '{key}' is not a valid collection: {e}"))
            }),
        }
    }

    fn transact<T, F>(&self, key: &str, apply: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut Vec<T>),
    {
        let mut all = self.load::<T>(key)?;
        apply(&mut all);
        let json = serde_json::to_string(&all)
            .map_err(|e| TrackerError::Persistence(format!("serializing '{key}': {e}")))?;
        self.store
            .write(key, &json)
            .map_err(|e| TrackerError::Persistence(format!("writing '{key}': {e:#}")))?;
        debug!("Wrote {} records to '{key}'", all.len());
        Ok(())
    }
}

impl std::fmt::Debug for TrackerRepository<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackerRepository").finish_non_exhaustive()
    }
}
