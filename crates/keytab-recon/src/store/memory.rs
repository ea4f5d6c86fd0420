//! In-memory implementation of the [`Keytab`] trait.
//!
//! Same semantics as the file store but with no persistence. Used by the
//! engine tests and useful for callers that build a keytab in process
//! before writing it out with a copy operation.

use crate::entry::KeytabEntry;
use crate::error::Result;
use crate::store::{Cursor, Keytab};

/// In-memory keytab. All entries are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryKeytab {
    name: String,
    entries: Vec<KeytabEntry>,
}

impl MemoryKeytab {
    /// Create an empty in-memory keytab with the given display name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Create an in-memory keytab pre-populated with `entries`.
    pub fn with_entries(name: impl Into<String>, entries: Vec<KeytabEntry>) -> Self {
        Self {
            name: name.into(),
            entries,
        }
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the keytab holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Direct read access to the entries, in enumeration order.
    pub fn entries(&self) -> &[KeytabEntry] {
        &self.entries
    }
}

impl Keytab for MemoryKeytab {
    fn name(&self) -> &str {
        &self.name
    }

    fn cursor(&self) -> Result<Cursor<'static>> {
        // Snapshot so that open cursors are isolated from later mutation.
        let snapshot = self.entries.clone();
        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }

    fn append(&mut self, entry: &KeytabEntry) -> Result<()> {
        self.entries.push(entry.clone());
        Ok(())
    }

    fn remove(&mut self, entry: &KeytabEntry) -> Result<bool> {
        match self.entries.iter().position(|e| e == entry) {
            Some(idx) => {
                self.entries.remove(idx);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
