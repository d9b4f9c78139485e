//! Settings for a resolution run

use std::path::PathBuf;

use modconf_fs::{ConfigStore, NormalizedPath};
use serde::{Deserialize, Serialize};

use crate::Result;

/// Default name of the installed-dependencies directory.
pub const DEFAULT_MODULES_DIR: &str = "node_modules";

/// Options controlling how references are resolved.
///
/// Can be read from a TOML, JSON or YAML file; missing fields take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverOptions {
    /// Directory that holds the installed-dependencies directory.
    /// `None` means the current working directory.
    pub project_root: Option<PathBuf>,

    /// Name of the installed-dependencies directory under `project_root`.
    pub modules_dir: String,

    /// Resolve references inside files loaded through a reference,
    /// relative to the loaded file's directory.
    pub resolve_nested: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            project_root: None,
            modules_dir: DEFAULT_MODULES_DIR.to_string(),
            resolve_nested: false,
        }
    }
}

impl ResolverOptions {
    /// Load options from a settings file.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        tracing::debug!(path = %path, "Loading resolver options");
        Ok(ConfigStore::new().load(path)?)
    }

    pub fn with_project_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.project_root = Some(root.into());
        self
    }

    pub fn with_modules_dir(mut self, modules_dir: impl Into<String>) -> Self {
        self.modules_dir = modules_dir.into();
        self
    }

    pub fn with_resolve_nested(mut self, resolve_nested: bool) -> Self {
        self.resolve_nested = resolve_nested;
        self
    }

    /// Absolute path of the installed-dependencies directory.
    pub fn modules_root(&self) -> Result<PathBuf> {
        let root = match &self.project_root {
            Some(root) => NormalizedPath::absolute(root)?,
            None => NormalizedPath::new(std::env::current_dir()?),
        };
        Ok(root.join(&self.modules_dir).to_native())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn partial_toml_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("modconf.toml");
        std::fs::write(&file, "resolve_nested = true\n").unwrap();

        let options = ResolverOptions::load(&NormalizedPath::new(&file)).unwrap();
        assert!(options.resolve_nested);
        assert_eq!(options.modules_dir, DEFAULT_MODULES_DIR);
        assert_eq!(options.project_root, None);
    }

    #[test]
    fn modules_root_joins_project_root() {
        let options = ResolverOptions::default()
            .with_project_root("/srv/app")
            .with_modules_dir("vendor");
        let root = options.modules_root().unwrap();
        assert!(root.ends_with("app/vendor"));
    }
}
