//! The reconciliation engine: the four operations that decide which
//! keytab entries survive.
//!
//! - [`update`] — merge entries the destination does not already cover.
//! - [`copy`] — unconditional wholesale append.
//! - [`expunge`] — prune entries obsoleted by a strictly newer key.
//! - [`remove_principals`] — drop every entry for the named principals.
//!
//! All operations are synchronous nested scans over store cursors.
//! Keytabs are small (tens to low hundreds of entries), so the O(n·m)
//! comparison cost never matters. Mutation is two-phase throughout:
//! entries are marked while cursors are open and applied only after
//! enumeration finishes, so a cursor is never invalidated mid-scan.
//!
//! There is no rollback. An operation that fails mid-way leaves behind
//! whatever appends and removals were already committed; the engine
//! favors forward progress over atomicity.

use crate::compare::{is_exact_duplicate, is_obsoleted_by, supersedes_or_equals};
use crate::entry::KeytabEntry;
use crate::error::Result;
use crate::store::Keytab;

// ── update ────────────────────────────────────────────────────────────────────

/// Copy into `dest` every entry from `source` that `dest` does not
/// already cover at least as well.
///
/// A source entry is skipped when `dest` holds an entry for the same
/// `(principal, enctype)` group with a higher kvno, or the same kvno and
/// an equal-or-newer timestamp. Nothing is ever removed from `dest`.
///
/// # Errors
///
/// Aborts on the first store error. Entries appended before the failure
/// remain in `dest`.
pub fn update(dest: &mut dyn Keytab, source: &dyn Keytab) -> Result<()> {
    for item in source.cursor()? {
        let candidate = item?;

        let mut covered = false;
        for existing in dest.cursor()? {
            if supersedes_or_equals(&existing?, &candidate) {
                covered = true;
                break;
            }
        }

        if covered {
            log::debug!(
                "update: {} kvno {} already covered in {}",
                candidate.principal,
                candidate.kvno,
                dest.name()
            );
        } else {
            log::debug!(
                "update: appending {} kvno {} to {}",
                candidate.principal,
                candidate.kvno,
                dest.name()
            );
            dest.append(&candidate)?;
        }
    }
    Ok(())
}

// ── copy ──────────────────────────────────────────────────────────────────────

/// Append every entry from `source` into `dest`, unconditionally.
///
/// No comparison is involved; duplicates in the result are the caller's
/// to deal with (usually by a following [`expunge`]).
///
/// # Errors
///
/// Aborts on the first store error; prior appends remain.
pub fn copy(dest: &mut dyn Keytab, source: &dyn Keytab) -> Result<()> {
    for item in source.cursor()? {
        dest.append(&item?)?;
    }
    Ok(())
}

// ── expunge ───────────────────────────────────────────────────────────────────

/// Remove every entry obsoleted by a strictly newer entry in its
/// `(principal, enctype, magic)` slot.
///
/// Two-phase. The mark pass runs two nested independent cursors over the
/// store and queues each entry for which some other entry holds a
/// strictly higher kvno in the same slot. Exact duplicates are tolerated
/// and never queued: after expunging, ties at the maximum kvno all
/// survive. The apply pass then removes the queued entries; a queued
/// entry that is already gone (queued more than once) is a no-op.
///
/// # Errors
///
/// Aborts on the first store error. Entries removed before the failure
/// stay removed.
pub fn expunge(store: &mut dyn Keytab) -> Result<()> {
    // Mark phase: pure, builds the removal queue. Removal during
    // enumeration would invalidate the live cursors.
    let mut queue: Vec<KeytabEntry> = Vec::new();
    for outer in store.cursor()? {
        let newer = outer?;
        for inner in store.cursor()? {
            let other = inner?;
            if is_exact_duplicate(&newer, &other) {
                continue;
            }
            if is_obsoleted_by(&other, &newer) {
                queue.push(other);
            }
        }
    }

    // Apply phase.
    for entry in &queue {
        if store.remove(entry)? {
            log::debug!(
                "expunge: removed {} enctype {} kvno {} from {}",
                entry.principal,
                entry.enctype,
                entry.kvno,
                store.name()
            );
        }
        // Ok(false): queued twice and already removed. Nothing to do.
    }
    Ok(())
}

// ── remove ────────────────────────────────────────────────────────────────────

/// Remove every entry whose principal matches one of `principals`.
///
/// Principals are processed independently: a failure for one is logged
/// and does not block the rest. If any principal failed, the first error
/// is returned once all have been processed.
///
/// A principal with no matching entries is not an error.
pub fn remove_principals(store: &mut dyn Keytab, principals: &[String]) -> Result<()> {
    let mut first_err = None;
    for principal in principals {
        if let Err(e) = remove_one_principal(store, principal) {
            log::warn!(
                "remove: failed for principal {principal} in {}: {e}",
                store.name()
            );
            first_err.get_or_insert(e);
        }
    }
    match first_err {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Mark all entries for one principal, then remove them.
fn remove_one_principal(store: &mut dyn Keytab, principal: &str) -> Result<()> {
    let mut matches: Vec<KeytabEntry> = Vec::new();
    for item in store.cursor()? {
        let entry = item?;
        if entry.principal.as_str() == principal {
            matches.push(entry);
        }
    }

    for entry in &matches {
        store.remove(entry)?;
    }
    log::debug!(
        "remove: {} entries for {principal} removed from {}",
        matches.len(),
        store.name()
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
