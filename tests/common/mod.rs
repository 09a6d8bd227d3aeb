//! Common test utilities

use std::path::Path;

use tempfile::TempDir;
use toolbox::Catalog;

/// Test context that owns a temporary data directory and a catalog over it
pub struct TestContext {
    pub catalog: Catalog,
    pub dir: TempDir,
}

impl TestContext {
    /// Create a new test context with an empty data directory
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let catalog = Catalog::open(dir.path()).expect("Failed to open catalog");
        TestContext { catalog, dir }
    }

    /// Create a context whose data files hold the given JSON before the catalog opens
    pub fn with_files(categories: Option<&str>, tools: Option<&str>) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        if let Some(json) = categories {
            std::fs::write(dir.path().join("categories.json"), json)
                .expect("Failed to seed categories");
        }
        if let Some(json) = tools {
            std::fs::write(dir.path().join("tools.json"), json).expect("Failed to seed tools");
        }
        let catalog = Catalog::open(dir.path()).expect("Failed to open catalog");
        TestContext { catalog, dir }
    }

    /// A second catalog over the same files, as another process would see them
    pub fn reopen(&self) -> Catalog {
        Catalog::open(self.dir.path()).expect("Failed to reopen catalog")
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn read_json(&self, file: &str) -> serde_json::Value {
        let text = std::fs::read_to_string(self.dir.path().join(file)).expect("Failed to read file");
        serde_json::from_str(&text).expect("File is not JSON")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
