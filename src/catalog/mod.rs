//! Catalog module - JSON-backed storage for categories and tools
//!
//! This module is split into focused submodules:
//! - `document`: one JSON file, its envelope shape and snapshot cache
//! - `categories`: category and subcategory CRUD
//! - `defaults`: built-in categories restored over a corrupt file
//! - `tools`: tool CRUD and category-scoped listing
//! - `normalize`: legacy category id repair
//! - `usage`: favorites and launch statistics
//! - `loader`: background tool loading

mod categories;
mod defaults;
mod document;
mod loader;
mod normalize;
mod tools;
mod usage;

pub use defaults::default_categories;
pub use document::Envelope;
pub use loader::LoadHandle;
pub use usage::COMMON_TOOLS_LIMIT;

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use directories::ProjectDirs;

use crate::error::{Result, StoreError};
use crate::models::{Category, Tool};

use document::JsonDocument;
use loader::Generation;

pub const CATEGORIES_FILE: &str = "categories.json";
pub const TOOLS_FILE: &str = "tools.json";

/// Results of `get_tools_by_category`, valid for one loaded tool list
#[derive(Default)]
struct CategoryMemo {
    source: Option<Arc<Vec<Tool>>>,
    entries: HashMap<(i64, Option<i64>), Arc<Vec<Tool>>>,
}

/// Highest ids handed out by this instance, so deleted ids are not reissued
#[derive(Debug, Default)]
struct IssuedIds {
    category: i64,
    tool: i64,
}

/// Category and tool storage rooted at one data directory
pub struct Catalog {
    data_dir: PathBuf,
    categories: Arc<JsonDocument<Category>>,
    tools: Arc<JsonDocument<Tool>>,
    by_category: Mutex<CategoryMemo>,
    issued: Mutex<IssuedIds>,
    generation: Generation,
}

impl Catalog {
    /// Open the catalog in `data_dir`, creating the directory if needed.
    ///
    /// Missing data files are not an error; they read as empty collections.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).map_err(|source| StoreError::Write {
            path: data_dir.clone(),
            source,
        })?;

        tracing::debug!(path = %data_dir.display(), "opened catalog");

        Ok(Self {
            categories: Arc::new(JsonDocument::new(
                data_dir.join(CATEGORIES_FILE),
                "categories",
            )),
            tools: Arc::new(JsonDocument::new(data_dir.join(TOOLS_FILE), "tools")),
            data_dir,
            by_category: Mutex::new(CategoryMemo::default()),
            issued: Mutex::new(IssuedIds::default()),
            generation: Generation::default(),
        })
    }

    /// Default data directory when the configuration does not name one
    pub fn default_data_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "toolbox", "toolbox").map(|dirs| dirs.data_dir().to_path_buf())
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn categories_path(&self) -> &Path {
        self.categories.path()
    }

    pub fn tools_path(&self) -> &Path {
        self.tools.path()
    }

    fn memo(&self) -> MutexGuard<'_, CategoryMemo> {
        self.by_category
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn issued(&self) -> MutexGuard<'_, IssuedIds> {
        self.issued.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Drop every derived tool view; the next read goes back to disk
    fn invalidate_tool_views(&self) {
        self.tools.invalidate();
        *self.memo() = CategoryMemo::default();
    }
}

/// `max(existing, previously issued) + 1`, recording the result as issued
fn allocate_id(
    existing: impl Iterator<Item = i64>,
    issued: &mut i64,
    kind: &'static str,
) -> Result<i64> {
    let next = existing
        .max()
        .unwrap_or(0)
        .max(*issued)
        .checked_add(1)
        .ok_or(StoreError::IdsExhausted(kind))?;
    *issued = next;
    Ok(next)
}

/// Reject names that are empty once trimmed
fn require_non_empty(value: &str, field: &'static str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(StoreError::EmptyField(field));
    }
    Ok(())
}
