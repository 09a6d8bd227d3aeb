pub mod assets;
pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod search;

pub use assets::AssetDirs;
pub use catalog::{COMMON_TOOLS_LIMIT, Catalog, Envelope, LoadHandle, default_categories};
pub use cli::{CategoryCommands, Cli, Commands, ConfigCommands, ImageCommands};
pub use config::ToolboxConfig;
pub use error::{Result, StoreError};
pub use models::{Category, Subcategory, Tool, ToolUpdate};
pub use search::{MatchTier, SearchFilter, SearchHit, SearchResult};
pub use commands::{
    NewTool, ToolEdit,
    cmd_add, cmd_edit, cmd_list, cmd_remove, cmd_search, cmd_show,
    cmd_background, cmd_common, cmd_fav, cmd_favorites, cmd_used,
    cmd_category_add, cmd_category_list, cmd_category_remove,
    cmd_subcategory_add, cmd_subcategory_remove,
    cmd_images_import, cmd_images_list, cmd_images_remove,
    cmd_config_path, cmd_config_show,
};
