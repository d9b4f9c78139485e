//! Notices emitted while resolving package references

use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// A notable event during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A package reference was located and joined with its subpath.
    PackageConnected { name: String, path: PathBuf },
    /// A package reference could not be located; the value became
    /// [`crate::Node::MissingPackage`].
    PackageNotFound { name: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PackageConnected { name, path } => {
                write!(f, "connected package [{name}]: {}", path.display())
            }
            Self::PackageNotFound { name } => write!(f, "package not found [{name}]"),
        }
    }
}

/// Receives diagnostics from a resolution run.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Forwards diagnostics to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::PackageConnected { name, path } => {
                tracing::info!(package = %name, path = %path.display(), "{diagnostic}");
            }
            Diagnostic::PackageNotFound { name } => {
                tracing::warn!(package = %name, "{diagnostic}");
            }
        }
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the diagnostics reported so far.
    pub fn events(&self) -> Vec<Diagnostic> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Names of packages reported as not found, in report order.
    pub fn missing_packages(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Diagnostic::PackageNotFound { name } => Some(name),
                Diagnostic::PackageConnected { .. } => None,
            })
            .collect()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        // also forwarded to tracing
        TracingSink.report(diagnostic.clone());
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic);
    }
}
