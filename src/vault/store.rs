//! Materialized view over the transaction log.
//!
//! `Store` loads the log through an [`EncryptedStorage`], replays it into
//! the list of live entries, and exposes add / find / change / delete.
//! Every mutation appends to the log, rebuilds the view from scratch and
//! rewrites the whole encrypted envelope.
//!
//! Locking: mutations hold the store's write lock for the full
//! append + rebuild + persist cycle; reads take the read lock.  The log's
//! own lock is always acquired *after* the store's.
//!
//! A failed persist is not rolled back: the in-memory log stays one step
//! ahead of disk and the error is returned to the caller.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, warn};

use super::entry::{Entry, EntryChange, EntryRef};
use super::tx::{TxKind, TxLog};
use crate::crypto::EncryptedStorage;
use crate::errors::{Result, TxVaultError};

/// The main vault handle.
pub struct Store<F> {
    /// Encrypted persistence for the serialized log.
    fs: F,

    /// Live entries, in the order their surviving Add records were appended.
    view: RwLock<Vec<Entry>>,

    /// The source of truth.
    log: TxLog,
}

impl<F: EncryptedStorage> Store<F> {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Build a store over `fs` and load whatever it holds into `log`.
    ///
    /// An empty storage is a first run and yields an empty store.  Any
    /// other open or decode failure aborts construction.
    pub fn new(fs: F, log: TxLog) -> Result<Self> {
        let store = Self {
            fs,
            view: RwLock::new(Vec::new()),
            log,
        };
        store.load()?;

        Ok(store)
    }

    fn load(&self) -> Result<()> {
        let bytes = match self.fs.open() {
            Ok(bytes) => bytes,
            Err(TxVaultError::EmptyStore) => Vec::new(),
            Err(e) => return Err(e),
        };

        let mut view = self.write_view();
        self.log.deserialize(&bytes)?;
        self.rebuild(&mut view);

        debug!(
            transactions = self.log.len(),
            entries = view.len(),
            "loaded vault"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Append an Add for `entry` and persist.  Returns the entry's id.
    ///
    /// The id is stored as given; uniqueness is the caller's job.
    pub fn add(&self, entry: Entry) -> Result<String> {
        let mut view = self.write_view();

        let id = entry.id.clone();
        self.log.append_add(entry)?;
        self.commit(&mut view, "add")?;

        Ok(id)
    }

    /// Delete the entry with `id`.
    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        self.delete(&EntryRef::Id(id.to_string()))
    }

    /// Delete the entry at 0-based position `pos` in the current list.
    pub fn delete_by_position(&self, pos: usize) -> Result<()> {
        self.delete(&EntryRef::Position(pos))
    }

    /// Delete the entry addressed by `target`.
    pub fn delete(&self, target: &EntryRef) -> Result<()> {
        let mut view = self.write_view();

        let entry = locate(&view, target)
            .cloned()
            .ok_or_else(|| TxVaultError::NotFound(target.to_string()))?;

        self.log.append_delete(entry)?;
        self.commit(&mut view, "delete")
    }

    /// Change the entry with `id`.  Returns the updated entry.
    pub fn change_by_id(&self, id: &str, change: &EntryChange) -> Result<Entry> {
        self.change(&EntryRef::Id(id.to_string()), change)
    }

    /// Change the entry at 0-based position `pos`.  Returns the updated entry.
    pub fn change_by_position(&self, pos: usize, change: &EntryChange) -> Result<Entry> {
        self.change(&EntryRef::Position(pos), change)
    }

    /// Apply `change` to the entry addressed by `target`.
    ///
    /// Appends a Delete of the old snapshot followed by an Add of the new
    /// one; replay relies on that order.
    pub fn change(&self, target: &EntryRef, change: &EntryChange) -> Result<Entry> {
        let mut view = self.write_view();

        let old = locate(&view, target)
            .cloned()
            .ok_or_else(|| TxVaultError::NotFound(target.to_string()))?;

        let mut updated = old.clone();
        change.apply(&mut updated, Utc::now());

        self.log.append_delete(old)?;
        self.log.append_add(updated.clone())?;
        self.commit(&mut view, "change")?;

        Ok(updated)
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub fn find_by_id(&self, id: &str) -> Option<Entry> {
        self.find(&EntryRef::Id(id.to_string()))
    }

    /// The entry at 0-based position `pos` in the current list.
    pub fn find_by_position(&self, pos: usize) -> Option<Entry> {
        self.find(&EntryRef::Position(pos))
    }

    pub fn find(&self, target: &EntryRef) -> Option<Entry> {
        locate(&self.read_view(), target).cloned()
    }

    /// Snapshot of the live entries, in insertion order.
    pub fn list(&self) -> Vec<Entry> {
        self.read_view().clone()
    }

    pub fn len(&self) -> usize {
        self.read_view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_view().is_empty()
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// The underlying transaction log (read-only use).
    pub fn log(&self) -> &TxLog {
        &self.log
    }

    /// The encrypted storage this store persists through.
    pub fn storage(&self) -> &F {
        &self.fs
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// Rebuild the view and persist the full log.
    fn commit(&self, view: &mut Vec<Entry>, op: &str) -> Result<()> {
        self.rebuild(view);

        if let Err(e) = self.sync() {
            warn!(
                op,
                transactions = self.log.len(),
                error = %e,
                "vault changed in memory but could not be persisted"
            );
            return Err(e);
        }

        debug!(op, entries = view.len(), transactions = self.log.len(), "vault persisted");
        Ok(())
    }

    fn rebuild(&self, view: &mut Vec<Entry>) {
        view.clear();
        self.log.each(|tx| apply(view, tx.kind, &tx.payload));
    }

    fn sync(&self) -> Result<()> {
        let bytes = self.log.serialize()?;
        self.fs.write(&bytes)
    }

    fn read_view(&self) -> RwLockReadGuard<'_, Vec<Entry>> {
        self.view.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_view(&self) -> RwLockWriteGuard<'_, Vec<Entry>> {
        self.view.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Replay `log` into a fresh list of live entries.
///
/// Add appends the payload; Delete removes every entry with the payload's
/// id.
pub fn replay(log: &TxLog) -> Vec<Entry> {
    let mut view = Vec::new();
    log.each(|tx| apply(&mut view, tx.kind, &tx.payload));
    view
}

fn apply(view: &mut Vec<Entry>, kind: TxKind, payload: &Entry) {
    match kind {
        TxKind::Add => view.push(payload.clone()),
        TxKind::Delete => view.retain(|e| e.id != payload.id),
    }
}

fn locate<'a>(view: &'a [Entry], target: &EntryRef) -> Option<&'a Entry> {
    match target {
        EntryRef::Id(id) => view.iter().find(|e| &e.id == id),
        EntryRef::Position(pos) => view.get(*pos),
    }
}
