//! Keytab store abstraction.
//!
//! The reconciliation engine drives stores exclusively through the
//! [`Keytab`] trait: forward-only cursor enumeration, whole-entry append,
//! and whole-entry removal by exact match. The physical format behind a
//! store is the store's own business.
//!
//! # Implementations
//!
//! - [`FileKeytab`] — JSON file on disk, one versioned document per keytab.
//! - [`MemoryKeytab`] — plain in-memory store for tests and in-process use.

pub mod file;
pub mod memory;

pub use file::FileKeytab;
pub use memory::MemoryKeytab;

use crate::entry::KeytabEntry;
use crate::error::Result;

/// Forward-only enumeration over a keytab's entries.
///
/// Each cursor iterates its own snapshot, so several cursors may be open
/// over one store at the same time (the expunge scan nests two), and a
/// cursor is not invalidated by appends or removals issued while it is
/// still being drained.
pub type Cursor<'a> = Box<dyn Iterator<Item = Result<KeytabEntry>> + 'a>;

/// A named, openable sequence of keytab entries.
///
/// Stores never deduplicate: appending an entry that is already present
/// produces two copies. Which entries survive is reconciliation policy,
/// decided by the engine, not by the store.
pub trait Keytab {
    /// Store name used in error messages and display output,
    /// e.g. `FILE:/etc/krb5.keytab`.
    fn name(&self) -> &str;

    /// Begin a forward-only enumeration of all entries.
    ///
    /// # Errors
    ///
    /// Returns `KeytabError::Io` if the underlying store cannot be read.
    fn cursor(&self) -> Result<Cursor<'static>>;

    /// Append one entry. Duplicates are permitted.
    ///
    /// # Errors
    ///
    /// Returns `KeytabError::Io` or `KeytabError::Serialization` if the
    /// entry cannot be written.
    fn append(&mut self, entry: &KeytabEntry) -> Result<()>;

    /// Remove the first entry matching `entry` in every field, including
    /// key material.
    ///
    /// Returns `Ok(true)` if an entry was removed and `Ok(false)` if no
    /// matching entry exists. Absence is not an error: the engine queues
    /// removals ahead of applying them and a queued target may already be
    /// gone.
    ///
    /// # Errors
    ///
    /// Returns `KeytabError::Io` if the removal cannot be persisted.
    fn remove(&mut self, entry: &KeytabEntry) -> Result<bool>;
}
