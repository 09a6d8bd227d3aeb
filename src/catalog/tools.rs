//! Tool operations

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::error::{Result, StoreError};
use crate::models::{Category, Tool, ToolUpdate};
use crate::search::SearchFilter;

use super::categories::read_categories;
use super::document::{Contents, JsonDocument};
use super::normalize::normalize_tools;
use super::{Catalog, allocate_id, require_non_empty};

/// Load tools through the snapshot cache, sorted by priority and normalized
/// against the current category hierarchy.
pub(super) fn read_tools(
    doc: &JsonDocument<Tool>,
    categories: &JsonDocument<Category>,
) -> Result<Arc<Vec<Tool>>> {
    if let Some(cached) = doc.cached() {
        debug!(count = cached.len(), "tools served from cache");
        return Ok(cached);
    }

    let (modified, mut tools) = match doc.read()? {
        Contents::Empty { modified } => (modified, Vec::new()),
        Contents::Parsed { modified, items } => (Some(modified), items),
    };

    tools.sort_by_key(|t| t.priority.unwrap_or(0));

    match read_categories(categories) {
        Ok(hierarchy) => {
            let changed = normalize_tools(&mut tools, &hierarchy);
            if changed > 0 {
                debug!(changed, "normalized legacy category references");
            }
        }
        Err(e) => warn!(error = %e, "skipping tool normalization, categories unavailable"),
    }

    debug!(count = tools.len(), "tools loaded");
    Ok(match modified {
        Some(modified) => doc.remember(modified, tools),
        None => Arc::new(tools),
    })
}

impl Catalog {
    // ==================== Tool Reads ====================

    /// All tools sorted by priority.
    ///
    /// A malformed or unreadable tools.json yields an empty list; the file is
    /// left as it is.
    pub fn load_tools(&self) -> Arc<Vec<Tool>> {
        read_tools(&self.tools, &self.categories).unwrap_or_else(|e| {
            warn!(path = %self.tools.path().display(), error = %e, "failed to load tools");
            Arc::new(Vec::new())
        })
    }

    /// Current tools as an owned list for read-modify-write.
    ///
    /// Unlike `load_tools` this refuses to continue over a file it could not
    /// parse, so a write never replaces data that was merely unreadable.
    pub(super) fn tools_for_update(&self) -> Result<Vec<Tool>> {
        Ok(read_tools(&self.tools, &self.categories)?.as_ref().clone())
    }

    pub fn get_tool_by_id(&self, id: i64) -> Option<Tool> {
        self.load_tools().iter().find(|t| t.id == Some(id)).cloned()
    }

    /// Tools in a category, optionally narrowed to one subcategory.
    ///
    /// Results are memoized per `(category, subcategory)` until the tool list
    /// changes.
    pub fn get_tools_by_category(&self, category_id: i64, subcategory_id: Option<i64>) -> Arc<Vec<Tool>> {
        let tools = self.load_tools();
        let mut memo = self.memo();

        let fresh = memo
            .source
            .as_ref()
            .is_some_and(|source| Arc::ptr_eq(source, &tools));
        if !fresh {
            memo.entries.clear();
            memo.source = Some(Arc::clone(&tools));
        }

        let entry = memo
            .entries
            .entry((category_id, subcategory_id))
            .or_insert_with(|| {
                Arc::new(
                    tools
                        .iter()
                        .filter(|t| t.category_id == Some(category_id))
                        .filter(|t| subcategory_id.is_none() || t.subcategory_id == subcategory_id)
                        .cloned()
                        .collect(),
                )
            });
        Arc::clone(entry)
    }

    /// Run the search filter over every tool.
    ///
    /// `None` means the query was blank and the caller should show its
    /// default view.
    pub fn search_tools(&self, filter: &SearchFilter, query: &str) -> Option<Vec<Tool>> {
        let tools = self.load_tools();
        filter
            .filter(&tools, query)
            .into_matches()
            .map(|hits| hits.into_iter().map(|hit| hit.tool.clone()).collect())
    }

    // ==================== Tool Writes ====================

    /// Replace tools.json, keeping its envelope shape
    pub fn save_tools(&self, tools: &[Tool]) -> Result<()> {
        // Anything still loading in the background read the old file
        self.generation.supersede();

        let result = self.tools.write(tools);
        self.invalidate_tool_views();

        match &result {
            Ok(()) => debug!(count = tools.len(), "saved tools"),
            Err(e) => error!(error = %e, "failed to save tools"),
        }
        result
    }

    /// Apply `f` to one tool and persist the whole list
    pub(super) fn modify_tool<R>(&self, id: i64, f: impl FnOnce(&mut Tool) -> R) -> Result<R> {
        let mut tools = self.tools_for_update()?;
        let tool = tools
            .iter_mut()
            .find(|t| t.id == Some(id))
            .ok_or(StoreError::ToolNotFound(id))?;

        let out = f(tool);
        self.save_tools(&tools)?;
        Ok(out)
    }

    /// Append a tool and return it with its assigned id
    pub fn add_tool(&self, mut tool: Tool) -> Result<Tool> {
        require_non_empty(&tool.name, "tool name")?;
        require_non_empty(&tool.path, "tool path")?;

        let mut tools = self.tools_for_update()?;
        let id = allocate_id(
            tools.iter().filter_map(|t| t.id),
            &mut self.issued().tool,
            "tool",
        )?;
        tool.id = Some(id);

        tools.push(tool.clone());
        self.save_tools(&tools)?;

        info!(id, name = %tool.name, "added tool");
        Ok(tool)
    }

    /// Replace a tool's record.
    ///
    /// The stored id is kept, as are `usage_count`/`last_used` unless the
    /// update overrides them.
    pub fn update_tool(&self, id: i64, update: impl Into<ToolUpdate>) -> Result<Tool> {
        let ToolUpdate {
            mut tool,
            usage_count,
            last_used,
        } = update.into();
        require_non_empty(&tool.name, "tool name")?;
        require_non_empty(&tool.path, "tool path")?;

        let updated = self.modify_tool(id, move |stored| {
            tool.id = Some(id);
            tool.usage_count = usage_count.unwrap_or(stored.usage_count);
            tool.last_used = last_used.unwrap_or_else(|| stored.last_used.take());
            *stored = tool;
            stored.clone()
        })?;

        info!(id, name = %updated.name, "updated tool");
        Ok(updated)
    }

    pub fn delete_tool(&self, id: i64) -> Result<()> {
        let mut tools = self.tools_for_update()?;
        let before = tools.len();
        tools.retain(|t| t.id != Some(id));
        if tools.len() == before {
            return Err(StoreError::ToolNotFound(id));
        }

        self.save_tools(&tools)?;
        info!(id, "deleted tool");
        Ok(())
    }

    /// Set or clear the background image file name of a tool
    pub fn update_tool_background(&self, id: i64, image: Option<String>) -> Result<Tool> {
        self.modify_tool(id, |tool| {
            tool.background_image = image.filter(|name| !name.trim().is_empty());
            tool.clone()
        })
    }
}
