//! Filesystem layer for modconf
//!
//! Provides normalized path handling, entry classification and
//! format-aware loading of configuration documents.

pub mod config;
pub mod document;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use document::{Document, DocumentFormat, DocumentLoader};
pub use error::{Error, Result};
pub use io::EntryKind;
pub use path::NormalizedPath;
