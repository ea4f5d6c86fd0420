//! Sorted keytab listing.
//!
//! Display convenience only — no reconciliation logic lives here.

use crate::entry::KeytabEntry;
use crate::error::Result;
use crate::store::Keytab;

/// Enumerate `store` once, sort the entries by principal, and hand each
/// to `handler` in order.
///
/// Entries for the same principal keep their enumeration order relative
/// to each other.
///
/// # Errors
///
/// Returns the store's error if enumeration fails; `handler` is not
/// called at all in that case.
pub fn list_sorted<F>(store: &dyn Keytab, mut handler: F) -> Result<()>
where
    F: FnMut(&KeytabEntry),
{
    let mut entries: Vec<KeytabEntry> = store.cursor()?.collect::<Result<_>>()?;
    entries.sort_by(|a, b| a.principal.cmp(&b.principal));
    for entry in &entries {
        handler(entry);
    }
    Ok(())
}
