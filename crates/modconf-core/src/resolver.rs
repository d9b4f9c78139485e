//! Depth-first resolution of a configuration tree
//!
//! The [`Resolver`] walks a [`Node`] tree and produces a new one in which
//!
//! - mappings keyed exactly `"0"..="n-1"` have become sequences, and
//! - path references have been replaced by the parsed file they point at,
//!   or by the absolute path when they point at a directory.
//!
//! Package references go through a [`PackageCache`] so each package is
//! searched for at most once per run. A package that cannot be found
//! becomes [`Node::MissingPackage`] and is reported to the
//! [`DiagnosticSink`]; every other failure aborts the run with the key
//! path of the offending value.
//!
//! # Example
//!
//! ```ignore
//! use modconf_core::{Node, Resolver};
//!
//! let raw: Node = serde_yaml::from_str::<serde_yaml::Value>(source)?.into();
//! let resolved = Resolver::new("/srv/app/config").resolve(&raw)?;
//! ```

use std::fmt;
use std::sync::Arc;

use modconf_fs::{DocumentLoader, EntryKind, NormalizedPath, io};

use crate::diagnostics::{Diagnostic, DiagnosticSink, TracingSink};
use crate::locator::{ModulesDirSearch, PackageCache, PackageSearch};
use crate::node::{Mapping, Node};
use crate::options::ResolverOptions;
use crate::reference::PathReference;
use crate::{Error, Result};

/// Resolves path references and numeric-keyed mappings in a tree.
pub struct Resolver {
    base_dir: NormalizedPath,
    options: ResolverOptions,
    sink: Arc<dyn DiagnosticSink>,
    search: Option<Arc<dyn PackageSearch>>,
    loader: DocumentLoader,
}

impl Resolver {
    /// Create a resolver whose `./` references are relative to `base_dir`.
    pub fn new(base_dir: impl Into<NormalizedPath>) -> Self {
        Self {
            base_dir: base_dir.into(),
            options: ResolverOptions::default(),
            sink: Arc::new(TracingSink),
            search: None,
            loader: DocumentLoader::new(),
        }
    }

    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Send diagnostics to `sink` instead of `tracing`.
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the installed-dependencies search derived from the options.
    pub fn with_search(mut self, search: Arc<dyn PackageSearch>) -> Self {
        self.search = Some(search);
        self
    }

    pub fn base_dir(&self) -> &NormalizedPath {
        &self.base_dir
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    /// A fresh cache backed by this resolver's package search.
    pub fn new_cache(&self) -> Result<PackageCache> {
        let search = match &self.search {
            Some(search) => Arc::clone(search),
            None => Arc::new(ModulesDirSearch::new(self.options.modules_root()?)),
        };
        Ok(PackageCache::new(search))
    }

    /// Resolve `node` with a cache that lives for this call only.
    pub fn resolve(&self, node: &Node) -> Result<Node> {
        let cache = self.new_cache()?;
        self.resolve_with_cache(node, &cache)
    }

    /// Resolve `node` with a caller-owned cache.
    ///
    /// The cache must not be reused for a run against an unrelated
    /// project; call [`PackageCache::reset`] or build a new one.
    pub fn resolve_with_cache(&self, node: &Node, cache: &PackageCache) -> Result<Node> {
        let base_dir = if self.base_dir.is_absolute() {
            self.base_dir.clone()
        } else {
            NormalizedPath::absolute(self.base_dir.as_str())?
        };
        tracing::debug!(base_dir = %base_dir, "Resolving configuration tree");

        let mut run = Run {
            resolver: self,
            cache,
            files: Vec::new(),
        };
        run.walk(node, &base_dir, &mut KeyPath::default())
    }
}

impl fmt::Debug for Resolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("base_dir", &self.base_dir)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// State of one resolution run.
struct Run<'a> {
    resolver: &'a Resolver,
    cache: &'a PackageCache,
    /// Files currently being resolved in nested mode, outermost first.
    files: Vec<NormalizedPath>,
}

impl Run<'_> {
    fn walk(&mut self, node: &Node, base_dir: &NormalizedPath, path: &mut KeyPath) -> Result<Node> {
        match node {
            Node::Mapping(map) => self.walk_mapping(map, base_dir, path),
            Node::Sequence(items) => {
                let mut resolved = Vec::with_capacity(items.len());
                for (index, item) in items.iter().enumerate() {
                    path.push(Segment::Index(index));
                    let value = self.walk(item, base_dir, path);
                    path.pop();
                    resolved.push(value?);
                }
                Ok(Node::Sequence(resolved))
            }
            Node::String(value) => self
                .resolve_string(value, base_dir)
                .map_err(|err| Error::at(&*path, err)),
            scalar => Ok(scalar.clone()),
        }
    }

    fn walk_mapping(&mut self, map: &Mapping, base_dir: &NormalizedPath, path: &mut KeyPath) -> Result<Node> {
        // decided from the keys alone, before any value is resolved
        let order = sequence_order(map);

        let mut resolved = Mapping::with_capacity(map.len());
        for (key, value) in map {
            path.push(Segment::Key(key.clone()));
            let value = self.walk(value, base_dir, path);
            path.pop();
            resolved.insert(key.clone(), value?);
        }

        match order {
            Some(order) => {
                let mut values: Vec<Option<Node>> = resolved.into_values().map(Some).collect();
                Ok(Node::Sequence(
                    order.into_iter().filter_map(|pos| values[pos].take()).collect(),
                ))
            }
            None => Ok(Node::Mapping(resolved)),
        }
    }

    fn resolve_string(&mut self, value: &str, base_dir: &NormalizedPath) -> Result<Node> {
        let Some(reference) = PathReference::classify(value)? else {
            return Ok(Node::String(value.to_string()));
        };

        let target = match reference {
            PathReference::Relative(relative) => base_dir.join(&relative),
            PathReference::Package(package) => match self.cache.locate(package.name()) {
                Some(root) => {
                    let target = NormalizedPath::new(root).join(package.subpath());
                    self.resolver.sink.report(Diagnostic::PackageConnected {
                        name: package.name().to_string(),
                        path: target.to_native(),
                    });
                    target
                }
                None => {
                    self.resolver.sink.report(Diagnostic::PackageNotFound {
                        name: package.name().to_string(),
                    });
                    return Ok(Node::MissingPackage {
                        name: package.name().to_string(),
                    });
                }
            },
        };

        self.load_target(&target)
    }

    fn load_target(&mut self, target: &NormalizedPath) -> Result<Node> {
        match io::entry_kind(target)? {
            EntryKind::Directory => Ok(Node::String(target.to_string())),
            EntryKind::File => {
                let document = self.resolver.loader.load(target)?;
                let nested = self.resolver.options.resolve_nested && document.is_composite();
                let node = Node::try_from(document)?;
                if !nested {
                    return Ok(node);
                }

                if self.files.contains(target) {
                    return Err(Error::ReferenceCycle {
                        path: target.to_native(),
                    });
                }
                let dir = target.parent().unwrap_or_else(|| target.clone());
                tracing::debug!(file = %target, "Resolving references inside loaded file");

                self.files.push(target.clone());
                let resolved = self.walk(&node, &dir, &mut KeyPath::default());
                self.files.pop();
                resolved
            }
            EntryKind::Other => Err(Error::UnsupportedEntry {
                path: target.to_native(),
            }),
        }
    }
}

/// For a mapping keyed exactly `"0"..="n-1"` (n > 0, any order), the
/// position in `map` of each index in ascending order.
///
/// Keys must be canonical decimals: `"01"` or `"+1"` disqualify the map.
fn sequence_order(map: &Mapping) -> Option<Vec<usize>> {
    if map.is_empty() {
        return None;
    }

    let mut order = vec![usize::MAX; map.len()];
    for (pos, key) in map.keys().enumerate() {
        let index: usize = key.parse().ok()?;
        if index >= map.len() || index.to_string() != *key || order[index] != usize::MAX {
            return None;
        }
        order[index] = pos;
    }
    Some(order)
}

#[derive(Debug, Clone)]
enum Segment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the tree, e.g. `routes.home[0].controller`.
#[derive(Debug, Clone, Default)]
struct KeyPath(Vec<Segment>);

impl KeyPath {
    fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("<root>");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                Segment::Key(key) if i == 0 => write!(f, "{key}")?,
                Segment::Key(key) => write!(f, ".{key}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}
