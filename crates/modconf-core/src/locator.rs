//! Locating installed packages by name
//!
//! A [`PackageCache`] wraps a [`PackageSearch`] and memoizes its answers,
//! hits and misses alike, for the lifetime of one resolution run.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use walkdir::WalkDir;

/// Finds the root directory of an installed package.
pub trait PackageSearch: Send + Sync {
    /// Root of the package `name`, or `None` when it is not installed.
    fn search(&self, name: &str) -> Option<PathBuf>;
}

/// Searches an installed-dependencies directory such as `node_modules`.
///
/// The direct child `<modules>/<name>` wins when present. Otherwise the
/// tree is walked depth-first with entries sorted by file name, so the
/// first match is stable for a given filesystem state.
#[derive(Debug, Clone)]
pub struct ModulesDirSearch {
    modules_root: PathBuf,
}

impl ModulesDirSearch {
    pub fn new(modules_root: impl Into<PathBuf>) -> Self {
        Self {
            modules_root: modules_root.into(),
        }
    }

    pub fn modules_root(&self) -> &Path {
        &self.modules_root
    }
}

impl PackageSearch for ModulesDirSearch {
    fn search(&self, name: &str) -> Option<PathBuf> {
        let direct = self.modules_root.join(name);
        if direct.is_dir() {
            return Some(direct);
        }

        let wanted = Path::new(name);
        WalkDir::new(&self.modules_root)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    tracing::debug!(error = %err, "Skipping unreadable entry");
                    None
                }
            })
            .find(|entry| entry.file_type().is_dir() && entry.path().ends_with(wanted))
            .map(|entry| entry.into_path())
    }
}

type Slot = Arc<OnceLock<Option<PathBuf>>>;

/// Memoizing front for a [`PackageSearch`].
///
/// Safe to share between threads: concurrent first lookups of the same
/// name run the search once and the other callers wait for its result.
pub struct PackageCache {
    search: Arc<dyn PackageSearch>,
    slots: Mutex<HashMap<String, Slot>>,
    searches: AtomicUsize,
}

impl PackageCache {
    pub fn new(search: Arc<dyn PackageSearch>) -> Self {
        Self {
            search,
            slots: Mutex::new(HashMap::new()),
            searches: AtomicUsize::new(0),
        }
    }

    /// Root of the package `name`, searching on first use only.
    pub fn locate(&self, name: &str) -> Option<PathBuf> {
        let slot = {
            let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(slots.entry(name.to_string()).or_default())
        };

        slot.get_or_init(|| {
            self.searches.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(package = %name, "Searching for package");
            self.search.search(name)
        })
        .clone()
    }

    /// Number of distinct names looked up so far.
    pub fn len(&self) -> usize {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// How many times the underlying search has run.
    pub fn search_count(&self) -> usize {
        self.searches.load(Ordering::Relaxed)
    }

    /// Forget every cached answer.
    pub fn reset(&self) {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}

impl std::fmt::Debug for PackageCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageCache")
            .field("entries", &self.len())
            .field("searches", &self.search_count())
            .finish()
    }
}
