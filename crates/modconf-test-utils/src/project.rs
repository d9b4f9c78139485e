//! [`TestProject`] builder for resolution scenarios.

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary project directory with a config directory and an
/// installed-dependencies tree.
///
/// # Example
///
/// ```rust,no_run
/// use modconf_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write("config/app.yaml", "db: ./db.json\n");
/// project.write("config/db.json", r#"{"host": "localhost"}"#);
/// project.package("@acme/widgets");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Directory (relative to the root) that holds installed packages.
    pub const MODULES_DIR: &'static str = "node_modules";

    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Root of the project; the default project root for resolution.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Absolute path of `rel` inside the project.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn write(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.path(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("TestProject::write: mkdir {}: {e}", parent.display()));
        }
        fs::write(&path, content)
            .unwrap_or_else(|e| panic!("TestProject::write: {}: {e}", path.display()));
        path
    }

    /// Create the directory `rel` and its parents.
    pub fn dir(&self, rel: &str) -> PathBuf {
        let path = self.path(rel);
        fs::create_dir_all(&path)
            .unwrap_or_else(|e| panic!("TestProject::dir: {}: {e}", path.display()));
        path
    }

    /// Install an empty package directly under the modules directory.
    pub fn package(&self, name: &str) -> PathBuf {
        self.dir(&format!("{}/{name}", Self::MODULES_DIR))
    }

    /// Write a file inside an installed package.
    pub fn package_file(&self, name: &str, rel: &str, content: &str) -> PathBuf {
        self.write(&format!("{}/{name}/{rel}", Self::MODULES_DIR), content)
    }
}
