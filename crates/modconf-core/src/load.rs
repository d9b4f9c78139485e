//! Loading and resolving a configuration file in one step

use std::path::Path;

use modconf_fs::{DocumentLoader, NormalizedPath};

use crate::{Node, Resolver, ResolverOptions, Result};

/// Load `file` from `dir` and resolve it with `dir` as the base directory.
///
/// YAML `!include` tags are expanded before resolution.
pub fn load_config(dir: impl AsRef<Path>, file: &str, options: ResolverOptions) -> Result<Node> {
    load_config_with(Resolver::new(dir.as_ref()).with_options(options), file)
}

/// Like [`load_config`] but with a preconfigured resolver, whose base
/// directory is also where `file` is looked up.
pub fn load_config_with(resolver: Resolver, file: &str) -> Result<Node> {
    let path = resolver.base_dir().join(file);
    tracing::debug!(path = %path, "Loading configuration");
    let raw = read_tree(&path)?;
    resolver.resolve(&raw)
}

/// Parse a file into a raw, unresolved tree.
pub fn read_tree(path: &NormalizedPath) -> Result<Node> {
    Node::try_from(DocumentLoader::new().load(path)?)
}
