//! Favorites and launch statistics

use chrono::Utc;
use tracing::info;

use crate::error::Result;
use crate::models::Tool;

use super::Catalog;

/// How many tools the "common tools" view shows by default
pub const COMMON_TOOLS_LIMIT: usize = 12;

impl Catalog {
    // ==================== Favorites ====================

    /// Flip `is_favorite`, returning the new value
    pub fn toggle_favorite(&self, id: i64) -> Result<bool> {
        let favorite = self.modify_tool(id, |tool| {
            tool.is_favorite = !tool.is_favorite;
            tool.is_favorite
        })?;
        info!(id, favorite, "toggled favorite");
        Ok(favorite)
    }

    pub fn get_favorite_tools(&self) -> Vec<Tool> {
        self.load_tools()
            .iter()
            .filter(|t| t.is_favorite)
            .cloned()
            .collect()
    }

    // ==================== Usage Tracking ====================

    /// Record one successful launch: bump `usage_count` and stamp `last_used`
    pub fn update_tool_usage(&self, id: i64) -> Result<Tool> {
        let tool = self.modify_tool(id, |tool| {
            tool.record_launch(Utc::now());
            tool.clone()
        })?;
        info!(id, count = tool.usage_count, "recorded tool usage");
        Ok(tool)
    }

    /// The `limit` most used tools, most used first; ties keep list order
    pub fn get_common_tools(&self, limit: usize) -> Vec<Tool> {
        let mut tools = self.load_tools().as_ref().clone();
        tools.sort_by(|a, b| b.usage_count.cmp(&a.usage_count));
        tools.truncate(limit);
        tools
    }
}
