//! Integration test: full reconciliation workflow over file-backed keytabs.
//!
//! Covers the complete admin lifecycle:
//! 1. Build a rotated keytab on "machine A" and a stale one on "machine B"
//! 2. Merge A into B with `update`
//! 3. Expunge B down to one entry per slot
//! 4. Retire a principal with `remove_principals`
//! 5. Clone the result with `copy`
//!
//! Every step reopens the files to check that the results are durable.

use keytab_recon::{
    copy, expunge, list_sorted, remove_principals, update, FileKeytab, Keytab, KeytabEntry,
    Principal, Result,
};

fn entry(principal: &str, enctype: i32, kvno: u32, ts: i64) -> KeytabEntry {
    KeytabEntry::new(
        Principal::new(principal),
        enctype,
        kvno,
        ts,
        vec![kvno as u8, enctype as u8, 0x42],
        1282,
    )
}

fn entries_of(kt: &FileKeytab) -> Vec<KeytabEntry> {
    kt.cursor().unwrap().collect::<Result<Vec<_>>>().unwrap()
}

#[test]
fn full_workflow_update_expunge_remove_copy() {
    let dir = tempfile::tempdir().unwrap();
    let machine_a = dir.path().join("machine_a.keytab");
    let machine_b = dir.path().join("machine_b.keytab");
    let clone = dir.path().join("clone.keytab");

    // ── Step 1: seed the two keytabs ─────────────────────────────────────
    {
        let mut a = FileKeytab::create_or_open(&machine_a).unwrap();
        // host/web has been rotated twice on machine A.
        a.append(&entry("host/web@R", 18, 2, 200)).unwrap();
        a.append(&entry("host/web@R", 18, 3, 300)).unwrap();
        a.append(&entry("host/web@R", 23, 3, 300)).unwrap();
        // A service principal that only machine A knows about.
        a.append(&entry("svc/report@R", 18, 1, 100)).unwrap();

        let mut b = FileKeytab::create_or_open(&machine_b).unwrap();
        // Machine B is one rotation behind, plus a local-only principal.
        b.append(&entry("host/web@R", 18, 2, 200)).unwrap();
        b.append(&entry("host/db@R", 18, 5, 500)).unwrap();
    }

    // ── Step 2: merge A into B ───────────────────────────────────────────
    {
        let a = FileKeytab::open(&machine_a).unwrap();
        let mut b = FileKeytab::open(&machine_b).unwrap();
        update(&mut b, &a).unwrap();
    }

    let b = FileKeytab::open(&machine_b).unwrap();
    let entries = entries_of(&b);
    // kvno 2 for host/web was already present and is still there; kvno 3
    // and the two new principals were merged in.
    assert_eq!(entries.len(), 5);
    assert!(entries.contains(&entry("host/web@R", 18, 2, 200)));
    assert!(entries.contains(&entry("host/web@R", 18, 3, 300)));
    assert!(entries.contains(&entry("host/web@R", 23, 3, 300)));
    assert!(entries.contains(&entry("svc/report@R", 18, 1, 100)));
    assert!(entries.contains(&entry("host/db@R", 18, 5, 500)));

    // A second update is a no-op.
    {
        let a = FileKeytab::open(&machine_a).unwrap();
        let mut b = FileKeytab::open(&machine_b).unwrap();
        update(&mut b, &a).unwrap();
        assert_eq!(b.len(), 5);
    }

    // ── Step 3: expunge the merged keytab ────────────────────────────────
    {
        let mut b = FileKeytab::open(&machine_b).unwrap();
        expunge(&mut b).unwrap();
    }

    let b = FileKeytab::open(&machine_b).unwrap();
    let entries = entries_of(&b);
    // The stale host/web kvno 2 is gone; everything else was already the
    // newest in its slot.
    assert_eq!(entries.len(), 4);
    assert!(!entries.contains(&entry("host/web@R", 18, 2, 200)));
    assert!(entries.contains(&entry("host/web@R", 18, 3, 300)));

    // ── Step 4: retire a principal ───────────────────────────────────────
    {
        let mut b = FileKeytab::open(&machine_b).unwrap();
        remove_principals(&mut b, &["svc/report@R".to_string()]).unwrap();
    }

    let b = FileKeytab::open(&machine_b).unwrap();
    assert!(entries_of(&b)
        .iter()
        .all(|e| e.principal.as_str() != "svc/report@R"));
    assert_eq!(b.len(), 3);

    // ── Step 5: clone wholesale ──────────────────────────────────────────
    {
        let b = FileKeytab::open(&machine_b).unwrap();
        let mut c = FileKeytab::create_or_open(&clone).unwrap();
        copy(&mut c, &b).unwrap();
    }

    let b = FileKeytab::open(&machine_b).unwrap();
    let c = FileKeytab::open(&clone).unwrap();
    assert_eq!(entries_of(&b), entries_of(&c));
}

#[test]
fn listing_is_sorted_across_a_merged_keytab() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kt.keytab");

    let mut kt = FileKeytab::create_or_open(&path).unwrap();
    kt.append(&entry("zeta@R", 18, 1, 10)).unwrap();
    kt.append(&entry("alpha@R", 18, 1, 10)).unwrap();
    kt.append(&entry("mid@R", 18, 1, 10)).unwrap();

    let kt = FileKeytab::open(&path).unwrap();
    let mut order = Vec::new();
    list_sorted(&kt, |e| order.push(e.principal.to_string())).unwrap();

    assert_eq!(order, vec!["alpha@R", "mid@R", "zeta@R"]);
}

#[test]
fn copy_then_expunge_rebuilds_a_clean_keytab() {
    let dir = tempfile::tempdir().unwrap();
    let messy = dir.path().join("messy.keytab");
    let clean = dir.path().join("clean.keytab");

    let mut kt = FileKeytab::create_or_open(&messy).unwrap();
    kt.append(&entry("u@R", 18, 1, 10)).unwrap();
    kt.append(&entry("u@R", 18, 2, 20)).unwrap();
    kt.append(&entry("u@R", 18, 3, 30)).unwrap();
    // Exact duplicate of the newest entry: expunge must keep both copies.
    kt.append(&entry("u@R", 18, 3, 30)).unwrap();

    {
        let src = FileKeytab::open(&messy).unwrap();
        let mut dst = FileKeytab::create_or_open(&clean).unwrap();
        copy(&mut dst, &src).unwrap();
        expunge(&mut dst).unwrap();
    }

    let dst = FileKeytab::open(&clean).unwrap();
    let entries = entries_of(&dst);
    assert_eq!(entries.len(), 2);
    assert!(entries.iter().all(|e| e.kvno == 3));

    // The source was never touched.
    let src = FileKeytab::open(&messy).unwrap();
    assert_eq!(src.len(), 4);
}
