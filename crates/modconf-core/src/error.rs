//! Error types for modconf-core

use std::path::PathBuf;

/// Result type for modconf-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a resolution run
///
/// A package that cannot be located is not an error: it resolves to
/// [`crate::Node::MissingPackage`] and is reported through the
/// diagnostics sink instead.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A `[module] ...` value that does not name a package
    #[error("Malformed package reference {value:?}: {reason}")]
    MalformedPackageReference { value: String, reason: String },

    /// Two mapping keys that are distinct in YAML map to the same string key
    #[error("Duplicate mapping key {key:?} (keys differ only by YAML type)")]
    DuplicateKey { key: String },

    /// A reference resolved to something that is neither file nor directory
    #[error("Unsupported filesystem entry at {path}")]
    UnsupportedEntry { path: PathBuf },

    /// Nested resolution came back to a file it is already resolving
    #[error("Reference cycle detected at {path}")]
    ReferenceCycle { path: PathBuf },

    /// A routing entry does not have the expected shape
    #[error("Invalid route {route:?}: {message}")]
    InvalidRoute { route: String, message: String },

    /// An error raised while resolving the value at `key_path`
    #[error("at {key_path}: {source}")]
    AtKey {
        key_path: String,
        #[source]
        source: Box<Error>,
    },

    /// Filesystem error from modconf-fs
    #[error(transparent)]
    Fs(#[from] modconf_fs::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(value: &str, reason: impl Into<String>) -> Self {
        Self::MalformedPackageReference {
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn at(key_path: impl ToString, source: Error) -> Self {
        Self::AtKey {
            key_path: key_path.to_string(),
            source: Box::new(source),
        }
    }

    /// The outermost key path this error was raised at, if any.
    pub fn key_path(&self) -> Option<&str> {
        match self {
            Self::AtKey { key_path, .. } => Some(key_path),
            _ => None,
        }
    }

    /// The innermost error, with all key path context stripped.
    pub fn root_cause(&self) -> &Error {
        match self {
            Self::AtKey { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
