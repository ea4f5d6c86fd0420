//! File-backed implementation of the [`Keytab`] trait.
//!
//! One keytab is one JSON document on disk:
//!
//! ```json
//! {
//!   "version": 1,
//!   "entries": [
//!     { "principal": "host/a@R", "enctype": 18, "kvno": 3,
//!       "timestamp": 1700000000, "key": "deadbeef", "magic": 1282 }
//!   ]
//! }
//! ```
//!
//! The whole document is parsed at open time and rewritten on every
//! append or removal. Keytabs hold tens to low hundreds of entries, so
//! whole-file rewrites are cheaper than anything clever.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entry::KeytabEntry;
use crate::error::{KeytabError, Result};
use crate::store::{Cursor, Keytab};

// ── File format ───────────────────────────────────────────────────────────────

const KEYTAB_FILE_VERSION: u32 = 1;

/// On-disk document wrapping the entry list.
#[derive(Debug, Serialize, Deserialize)]
struct KeytabFile {
    /// Format version number.
    version: u32,
    /// Entries in enumeration order.
    entries: Vec<KeytabEntry>,
}

// ── FileKeytab ────────────────────────────────────────────────────────────────

/// Filesystem-backed keytab.
///
/// Entries are cached in memory from open time on; cursors iterate a
/// snapshot of that cache, so any number of cursors may be open at once
/// and none is disturbed by concurrent appends or removals from this
/// handle. Mutation by another process while a handle is open is
/// undefined, as it is for any keytab implementation.
pub struct FileKeytab {
    path: PathBuf,
    name: String,
    entries: Vec<KeytabEntry>,
}

impl FileKeytab {
    /// Open an existing keytab file.
    ///
    /// # Errors
    ///
    /// Returns `KeytabError::Open` if the file cannot be read and
    /// `KeytabError::InvalidFormat` if it does not parse.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let name = display_name(&path);

        let bytes = std::fs::read(&path).map_err(|source| KeytabError::Open {
            name: name.clone(),
            source,
        })?;
        let file: KeytabFile =
            serde_json::from_slice(&bytes).map_err(|e| KeytabError::InvalidFormat {
                name: name.clone(),
                message: e.to_string(),
            })?;
        if file.version != KEYTAB_FILE_VERSION {
            return Err(KeytabError::InvalidFormat {
                name,
                message: format!("unsupported keytab file version {}", file.version),
            });
        }

        Ok(Self {
            path,
            name,
            entries: file.entries,
        })
    }

    /// Open a keytab file, starting empty if it does not exist yet.
    ///
    /// The file itself is only created on the first append, matching the
    /// usual keytab convention that a destination store need not exist
    /// before entries are written to it.
    ///
    /// # Errors
    ///
    /// Returns `KeytabError::Open` for any failure other than the file
    /// being absent, and `KeytabError::InvalidFormat` for parse failures.
    pub fn create_or_open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::open(path);
        }
        Ok(Self {
            path: path.to_path_buf(),
            name: display_name(path),
            entries: Vec::new(),
        })
    }

    /// Number of entries currently held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the keytab holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Filesystem path backing this keytab.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize the cached entries and rewrite the backing file.
    fn flush(&self) -> Result<()> {
        let file = KeytabFile {
            version: KEYTAB_FILE_VERSION,
            entries: self.entries.clone(),
        };
        let json =
            serde_json::to_string_pretty(&file).map_err(|e| KeytabError::Serialization {
                name: self.name.clone(),
                message: e.to_string(),
            })?;
        std::fs::write(&self.path, json.as_bytes()).map_err(|source| KeytabError::Io {
            name: self.name.clone(),
            source,
        })
    }
}

impl Keytab for FileKeytab {
    fn name(&self) -> &str {
        &self.name
    }

    fn cursor(&self) -> Result<Cursor<'static>> {
        let snapshot = self.entries.clone();
        Ok(Box::new(snapshot.into_iter().map(Ok)))
    }

    fn append(&mut self, entry: &KeytabEntry) -> Result<()> {
        self.entries.push(entry.clone());
        match self.flush() {
            Ok(()) => Ok(()),
            Err(e) => {
                // Keep the cache consistent with what is actually on disk.
                self.entries.pop();
                Err(e)
            }
        }
    }

    fn remove(&mut self, entry: &KeytabEntry) -> Result<bool> {
        let Some(idx) = self.entries.iter().position(|e| e == entry) else {
            return Ok(false);
        };
        let removed = self.entries.remove(idx);
        match self.flush() {
            Ok(()) => Ok(true),
            Err(e) => {
                self.entries.insert(idx, removed);
                Err(e)
            }
        }
    }
}

/// Display name for a keytab path, e.g. `FILE:/etc/krb5.keytab`.
fn display_name(path: &Path) -> String {
    format!("FILE:{}", path.display())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
