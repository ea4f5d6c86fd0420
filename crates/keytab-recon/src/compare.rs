//! Comparator predicates over pairs of keytab entries.
//!
//! Pure and stateless. Entries are grouped by `(principal, enctype)` for
//! supersession and by `(principal, enctype, magic)` for obsolescence;
//! groups are independent of each other and never compared across.

use crate::entry::KeytabEntry;

/// True iff both entries name the same principal (exact match).
pub fn same_principal(a: &KeytabEntry, b: &KeytabEntry) -> bool {
    a.principal == b.principal
}

/// True iff `existing` already covers `candidate` at least as well.
///
/// Defined over entries sharing `(principal, enctype)`; entries in
/// different groups never supersede each other. A strictly higher kvno
/// wins; at equal kvno the timestamp breaks the tie, with `existing`
/// winning on equality.
pub fn supersedes_or_equals(existing: &KeytabEntry, candidate: &KeytabEntry) -> bool {
    if !same_principal(existing, candidate) || existing.enctype != candidate.enctype {
        return false;
    }
    if existing.kvno > candidate.kvno {
        return true;
    }
    if existing.kvno == candidate.kvno {
        return existing.timestamp >= candidate.timestamp;
    }
    false
}

/// True iff the two entries are identical in every comparable field,
/// including byte-for-byte key material.
pub fn is_exact_duplicate(a: &KeytabEntry, b: &KeytabEntry) -> bool {
    a.magic == b.magic
        && a.enctype == b.enctype
        && a.key.len() == b.key.len()
        && a.kvno == b.kvno
        && same_principal(a, b)
        && a.key == b.key
}

/// True iff `newer` holds a strictly newer key for the same
/// `(principal, enctype, magic)` slot as `older`, making `older`
/// retireable.
pub fn is_obsoleted_by(older: &KeytabEntry, newer: &KeytabEntry) -> bool {
    older.magic == newer.magic
        && older.enctype == newer.enctype
        && same_principal(older, newer)
        && newer.kvno > older.kvno
}

// ── Tests ─────────────────────────────────────────────────────────────────────
