//! Command implementations for the toolbox CLI
//!
//! Each submodule handles a group of related commands.

pub mod categories;
pub mod config;
pub mod helpers;
pub mod images;
pub mod tools;
pub mod usage;

pub use categories::{
    cmd_category_add, cmd_category_list, cmd_category_remove, cmd_subcategory_add,
    cmd_subcategory_remove,
};

pub use config::{cmd_config_path, cmd_config_show};

pub use tools::{NewTool, ToolEdit, cmd_add, cmd_edit, cmd_list, cmd_remove, cmd_search, cmd_show};

pub use images::{cmd_images_import, cmd_images_list, cmd_images_remove};

pub use usage::{cmd_background, cmd_common, cmd_fav, cmd_favorites, cmd_used};
