//! Category and subcategory operations

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::{Result, StoreError};
use crate::models::{Category, DEFAULT_ICON, Subcategory};

use super::defaults::default_categories;
use super::document::{Contents, JsonDocument};
use super::{Catalog, allocate_id, require_non_empty};

/// Sort categories and each category's subcategories by priority (stable)
fn sort_hierarchy(categories: &mut [Category]) {
    categories.sort_by_key(|c| c.priority.unwrap_or(0));
    for category in categories.iter_mut() {
        category
            .subcategories
            .sort_by_key(|s| s.priority.unwrap_or(0));
    }
}

/// Load categories through the snapshot cache.
///
/// Malformed JSON is replaced on disk by the built-in defaults; I/O errors
/// are returned to the caller.
pub(super) fn read_categories(doc: &JsonDocument<Category>) -> Result<Arc<Vec<Category>>> {
    if let Some(cached) = doc.cached() {
        debug!(count = cached.len(), "categories served from cache");
        return Ok(cached);
    }

    match doc.read() {
        Ok(Contents::Empty { modified }) => Ok(match modified {
            Some(modified) => doc.remember(modified, Vec::new()),
            None => Arc::new(Vec::new()),
        }),
        Ok(Contents::Parsed {
            modified,
            mut items,
        }) => {
            sort_hierarchy(&mut items);
            debug!(count = items.len(), "categories loaded");
            Ok(doc.remember(modified, items))
        }
        Err(StoreError::Json(e)) => {
            warn!(
                path = %doc.path().display(),
                error = %e,
                "categories file is malformed, restoring defaults"
            );
            let defaults = default_categories();
            if let Err(e) = doc.write(&defaults) {
                error!(error = %e, "failed to write default categories");
            }
            Ok(Arc::new(defaults))
        }
        Err(e) => Err(e),
    }
}

/// Next subcategory id.
///
/// Keeps the legacy numbering (`parent * 100 + 1` for the first child, then
/// sibling max + 1) unless that value overflows or is already taken anywhere
/// in the hierarchy, in which case the next id above every existing id is used.
fn allocate_subcategory_id(
    categories: &[Category],
    parent: &Category,
    parent_id: i64,
) -> Result<i64> {
    let candidate = match parent.subcategories.iter().filter_map(|s| s.id).max() {
        Some(max) => max.checked_add(1),
        None => parent_id.checked_mul(100).and_then(|id| id.checked_add(1)),
    };

    let all_ids = || {
        categories.iter().flat_map(|c| {
            c.id.into_iter()
                .chain(c.subcategories.iter().filter_map(|s| s.id))
        })
    };

    match candidate {
        Some(id) if !all_ids().any(|existing| existing == id) => Ok(id),
        _ => all_ids()
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted("subcategory")),
    }
}

impl Catalog {
    // ==================== Category Reads ====================

    /// All categories sorted by priority; an unreadable file yields an empty list
    pub fn load_categories(&self) -> Arc<Vec<Category>> {
        read_categories(&self.categories).unwrap_or_else(|e| {
            warn!(error = %e, "failed to load categories");
            Arc::new(Vec::new())
        })
    }

    /// Alias kept for callers that populate category pickers
    pub fn get_all_categories(&self) -> Arc<Vec<Category>> {
        self.load_categories()
    }

    pub fn get_category(&self, id: i64) -> Option<Category> {
        self.load_categories()
            .iter()
            .find(|c| c.id == Some(id))
            .cloned()
    }

    /// Find a subcategory anywhere in the hierarchy
    pub fn find_subcategory(&self, id: i64) -> Option<Subcategory> {
        self.load_categories()
            .iter()
            .find_map(|c| c.subcategory(id))
            .cloned()
    }

    /// Subcategories of one category; empty if the category does not exist
    pub fn get_subcategories_by_category(&self, id: i64) -> Vec<Subcategory> {
        self.load_categories()
            .iter()
            .find(|c| c.id == Some(id))
            .map(|c| c.subcategories.clone())
            .unwrap_or_default()
    }

    // ==================== Category Writes ====================

    /// Replace categories.json, keeping its envelope shape.
    ///
    /// Tool views are invalidated too, since normalized tool ids depend on the
    /// hierarchy.
    pub fn save_categories(&self, categories: &[Category]) -> Result<()> {
        let result = self.categories.write(categories);
        self.invalidate_tool_views();

        match &result {
            Ok(()) => debug!(count = categories.len(), "saved categories"),
            Err(e) => error!(error = %e, "failed to save categories"),
        }
        result
    }

    /// Current categories as an owned list for read-modify-write
    fn categories_for_update(&self) -> Result<Vec<Category>> {
        Ok(read_categories(&self.categories)?.as_ref().clone())
    }

    /// Append a new top-level category and return it with its assigned id
    pub fn add_category(&self, mut category: Category) -> Result<Category> {
        require_non_empty(&category.name, "category name")?;

        let mut categories = self.categories_for_update()?;
        let id = allocate_id(
            categories.iter().filter_map(|c| c.id),
            &mut self.issued().category,
            "category",
        )?;

        category.id = Some(id);
        if category.icon.is_none() {
            category.icon = Some(DEFAULT_ICON.to_string());
        }
        for sub in &mut category.subcategories {
            sub.parent_id = Some(id);
        }

        categories.push(category.clone());
        self.save_categories(&categories)?;

        info!(id, name = %category.name, "added category");
        Ok(category)
    }

    /// Append a subcategory under `parent_id` and return it with its assigned id
    pub fn add_subcategory(&self, parent_id: i64, mut subcategory: Subcategory) -> Result<Subcategory> {
        require_non_empty(&subcategory.name, "subcategory name")?;

        let mut categories = self.categories_for_update()?;
        let index = categories
            .iter()
            .position(|c| c.id == Some(parent_id))
            .ok_or(StoreError::CategoryNotFound(parent_id))?;

        let id = allocate_subcategory_id(&categories, &categories[index], parent_id)?;
        subcategory.id = Some(id);
        subcategory.parent_id = Some(parent_id);

        categories[index].subcategories.push(subcategory.clone());
        self.save_categories(&categories)?;

        info!(id, parent_id, name = %subcategory.name, "added subcategory");
        Ok(subcategory)
    }

    /// Remove a category that no tool references
    pub fn delete_category(&self, id: i64) -> Result<()> {
        let mut categories = self.categories_for_update()?;

        let tools = self.tools_for_update()?;
        let in_use = tools.iter().filter(|t| t.category_id == Some(id)).count();
        if in_use > 0 {
            return Err(StoreError::CategoryInUse { id, tools: in_use });
        }

        let before = categories.len();
        categories.retain(|c| c.id != Some(id));
        if categories.len() == before {
            return Err(StoreError::CategoryNotFound(id));
        }

        self.save_categories(&categories)?;
        info!(id, "deleted category");
        Ok(())
    }

    /// Remove a subcategory that no tool references
    pub fn delete_subcategory(&self, id: i64) -> Result<()> {
        let mut categories = self.categories_for_update()?;

        let tools = self.tools_for_update()?;
        let in_use = tools.iter().filter(|t| t.subcategory_id == Some(id)).count();
        if in_use > 0 {
            return Err(StoreError::SubcategoryInUse { id, tools: in_use });
        }

        let owner = categories
            .iter_mut()
            .find(|c| c.subcategories.iter().any(|s| s.id == Some(id)))
            .ok_or(StoreError::SubcategoryNotFound(id))?;
        owner.subcategories.retain(|s| s.id != Some(id));

        self.save_categories(&categories)?;
        info!(id, "deleted subcategory");
        Ok(())
    }
}
