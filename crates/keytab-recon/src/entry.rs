//! Keytab entry value type.
//!
//! A [`KeytabEntry`] is one credential record read from a keytab: the
//! principal it authenticates, the encryption type and version of the key,
//! the time it was written, and the raw key material. Entries are immutable
//! once read; reconciliation appends or removes whole entries, never
//! individual fields.

use std::fmt;

use serde::{Deserialize, Serialize};

// ── Principal ─────────────────────────────────────────────────────────────────

/// Principal name, e.g. `host/www.example.com@EXAMPLE.COM`.
///
/// Compared by exact string equality for identity, and ordered
/// lexicographically for sorted display.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Principal(String);

impl Principal {
    /// Create a principal from any string-like value.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The principal name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Principal {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ── KeytabEntry ───────────────────────────────────────────────────────────────

/// One credential record in a keytab.
///
/// A keytab may legitimately hold several entries for the same
/// `(principal, enctype)` pair at different key versions — that is the
/// rotation history the reconciliation engine prunes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeytabEntry {
    /// Identity this key authenticates.
    pub principal: Principal,
    /// Encryption type identifier. Opaque to the engine.
    pub enctype: i32,
    /// Key version number; higher means newer within one
    /// `(principal, enctype)` group.
    pub kvno: u32,
    /// Seconds since the epoch at which the entry was written.
    pub timestamp: i64,
    /// Raw key material. Never interpreted, only compared byte-for-byte.
    #[serde(with = "key_bytes")]
    pub key: Vec<u8>,
    /// Format tag carried through from the store format. Opaque.
    pub magic: i32,
}

impl KeytabEntry {
    /// Construct an entry from its parts.
    pub fn new(
        principal: impl Into<Principal>,
        enctype: i32,
        kvno: u32,
        timestamp: i64,
        key: Vec<u8>,
        magic: i32,
    ) -> Self {
        Self {
            principal: principal.into(),
            enctype,
            kvno,
            timestamp,
            key,
            magic,
        }
    }
}

// ── Encryption type names ─────────────────────────────────────────────────────

/// Human-readable name for an encryption type identifier.
///
/// Covers the registered krb5 enctype numbers; anything else renders as
/// `unknown(N)`. With `short` the abbreviated form is returned, e.g.
/// `aes256-cts` instead of `aes256-cts-hmac-sha1-96`.
pub fn enctype_name(enctype: i32, short: bool) -> String {
    let (long, abbrev) = match enctype {
        1 => ("des-cbc-crc", "des-cbc-crc"),
        2 => ("des-cbc-md4", "des-cbc-md4"),
        3 => ("des-cbc-md5", "des"),
        16 => ("des3-cbc-sha1", "des3"),
        17 => ("aes128-cts-hmac-sha1-96", "aes128-cts"),
        18 => ("aes256-cts-hmac-sha1-96", "aes256-cts"),
        19 => ("aes128-cts-hmac-sha256-128", "aes128-sha2"),
        20 => ("aes256-cts-hmac-sha384-192", "aes256-sha2"),
        23 => ("arcfour-hmac", "rc4"),
        24 => ("arcfour-hmac-exp", "rc4-exp"),
        25 => ("camellia128-cts-cmac", "camellia128-cts"),
        26 => ("camellia256-cts-cmac", "camellia256-cts"),
        n => return format!("unknown({n})"),
    };
    if short {
        abbrev.to_string()
    } else {
        long.to_string()
    }
}

/// Render an entry timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(timestamp: i64) -> String {
    let dt = chrono::DateTime::from_timestamp(timestamp, 0)
        .unwrap_or_else(|| chrono::DateTime::from_timestamp(0, 0).unwrap());
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

// ── Key material serde ────────────────────────────────────────────────────────

/// Key material is stored as lowercase hex so keytab files stay diffable.
mod key_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(key: &[u8], ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&hex::encode(key))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<u8>, D::Error> {
        let s = String::deserialize(de)?;
        hex::decode(&s).map_err(serde::de::Error::custom)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
