//! keytab-recon — keytab entry reconciliation.
//!
//! Merges, deduplicates, and prunes credential entries across keytab
//! stores: merge-in-missing, wholesale copy, obsolete-entry expunge, and
//! per-principal removal. The store behind the entries is abstracted by
//! the [`store::Keytab`] trait; file-backed and in-memory stores are
//! provided.

pub mod compare;
pub mod entry;
pub mod error;
pub mod list;
pub mod reconcile;
pub mod store;

// Re-export primary types
pub use entry::{enctype_name, format_timestamp, KeytabEntry, Principal};
pub use error::{KeytabError, Result};
pub use list::list_sorted;
pub use reconcile::{copy, expunge, remove_principals, update};
pub use store::{Cursor, FileKeytab, Keytab, MemoryKeytab};
