use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{KvMirrorError, Result};

/// The local mirror: a persisted mapping of every key/value the remote store has
/// confirmed, kept in a single JSON document whose top-level keys are the store
/// keys.
///
/// Every mutating call is a complete read-modify-write cycle: the document is
/// read in full, changed in memory, and rewritten in full. There are no partial
/// or append writes. Mutators take `&mut self`, so a single `MirrorStore` handle
/// is the one writer in the process; callers that could ever mutate from more
/// than one process must put a lock around the document first.
///
/// The mirror holds confirmed state only. It is the dispatcher's job to call
/// [`upsert`](MirrorStore::upsert)/[`remove`](MirrorStore::remove) strictly after
/// the remote store has acknowledged the operation.
#[derive(Debug)]
pub struct MirrorStore {
    // path of the persisted JSON document
    path: PathBuf,
}

impl MirrorStore {
    /// opens the mirror persisted at `path`.
    ///
    /// The document is loaded once up front so an unreadable document is
    /// reported at startup rather than on the first mutation. A document that
    /// does not exist yet is fine; it reads as an empty mirror.
    ///
    /// # Errors
    /// returns [`KvMirrorError::CorruptStore`] if the document exists but does
    /// not parse
    pub fn open(path: impl Into<PathBuf>) -> Result<MirrorStore> {
        let store = MirrorStore { path: path.into() };
        store.load()?;
        Ok(store)
    }

    /// the path of the persisted document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// reads the full mirror document into a map.
    ///
    /// A missing document is an empty mirror, not an error. A document that
    /// exists but does not parse surfaces as [`KvMirrorError::CorruptStore`];
    /// it is never silently treated as empty.
    pub fn load(&self) -> Result<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&raw).map_err(|source| KvMirrorError::CorruptStore {
            path: self.path.clone(),
            source,
        })
    }

    /// inserts or overwrites `key` with `value` and persists the document
    pub fn upsert(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.rewrite(&entries)
    }

    /// removes `key` from the mirror and persists the document.
    /// Returns whether the key was present.
    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let mut entries = self.load()?;
        let removed = entries.remove(key).is_some();
        if removed {
            self.rewrite(&entries)?;
        }
        Ok(removed)
    }

    /// resets the persisted document to an empty mapping.
    ///
    /// Purely local: the remote store is neither consulted nor required.
    /// Calling this on an already-empty mirror is a no-op that still succeeds.
    pub fn clear(&mut self) -> Result<()> {
        self.rewrite(&BTreeMap::new())
    }

    // serializes `entries` and replaces the whole document
    fn rewrite(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let doc = serde_json::to_string(entries)?;
        fs::write(&self.path, doc)?;
        debug!(path = %self.path.display(), len = entries.len(), "mirror document rewritten");
        Ok(())
    }
}
