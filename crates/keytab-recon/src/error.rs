//! Error types for keytab reconciliation.
//!
//! All errors are strongly typed and carry the name of the keytab they
//! occurred against. Key material is never included in error messages.

/// Errors surfaced by stores and reconciliation operations.
///
/// A reconciliation operation aborts on the first store error; entries
/// appended or removed before the failure stay committed. There is no
/// retry and no rollback.
#[derive(Debug, thiserror::Error)]
pub enum KeytabError {
    /// The named keytab could not be resolved or opened.
    #[error("cannot open keytab {name}: {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// I/O failure while enumerating, appending, or removing after a
    /// successful open.
    #[error("keytab {name}: {source}")]
    Io {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// The keytab file exists but cannot be parsed.
    #[error("keytab {name}: invalid file format: {message}")]
    InvalidFormat { name: String, message: String },

    /// An entry could not be serialized for writing.
    #[error("keytab {name}: serialization error: {message}")]
    Serialization { name: String, message: String },
}

impl KeytabError {
    /// The keytab the error occurred against.
    pub fn store_context(&self) -> &str {
        match self {
            Self::Open { name, .. }
            | Self::Io { name, .. }
            | Self::InvalidFormat { name, .. }
            | Self::Serialization { name, .. } => name,
        }
    }

    /// The raw OS error code, where one exists.
    pub fn native_code(&self) -> Option<i32> {
        match self {
            Self::Open { source, .. } | Self::Io { source, .. } => source.raw_os_error(),
            _ => None,
        }
    }
}

/// Convenience Result alias.
pub type Result<T> = std::result::Result<T, KeytabError>;
