//! Error types for the catalog data layer

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Every failure a catalog operation can report.
///
/// The `Display` text doubles as the reason shown to the user when a
/// delete is refused.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("category {0} not found")]
    CategoryNotFound(i64),

    #[error("subcategory {0} not found")]
    SubcategoryNotFound(i64),

    #[error("tool {0} not found")]
    ToolNotFound(i64),

    #[error("category {id} still has {tools} tool(s); move or delete them first")]
    CategoryInUse { id: i64, tools: usize },

    #[error("subcategory {id} still has {tools} tool(s); move or delete them first")]
    SubcategoryInUse { id: i64, tools: usize },

    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    #[error("no {0} ids left: the largest id in use is already the maximum")]
    IdsExhausted(&'static str),

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    /// True for the "operated on a missing id" family
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::CategoryNotFound(_) | Self::SubcategoryNotFound(_) | Self::ToolNotFound(_)
        )
    }
}
