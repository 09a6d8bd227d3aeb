use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "toolbox")]
#[command(about = "A categorized launcher catalog for security and development tools")]
#[command(version)]
pub struct Cli {
    /// Directory holding categories.json and tools.json
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a tool to the catalog
    Add {
        /// Tool name
        name: String,

        /// Executable path or URL
        path: String,

        /// Description of the tool
        #[arg(short, long)]
        description: Option<String>,

        /// Category id
        #[arg(short, long)]
        category: Option<i64>,

        /// Subcategory id
        #[arg(short, long, requires = "category")]
        sub: Option<i64>,

        /// Comma-separated tags
        #[arg(short, long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Icon file name or absolute path
        #[arg(short, long)]
        icon: Option<String>,

        /// Arguments passed on launch
        #[arg(long)]
        arguments: Option<String>,

        /// Working directory for launches
        #[arg(long)]
        workdir: Option<String>,

        /// Launch in a terminal
        #[arg(long)]
        terminal: bool,

        /// Treat the path as a URL
        #[arg(long)]
        web: bool,
    },

    /// List tools
    List {
        /// Only tools in this category
        #[arg(short, long)]
        category: Option<i64>,

        /// Only tools in this subcategory
        #[arg(short, long, requires = "category")]
        sub: Option<i64>,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Show a specific tool
    Show {
        /// Tool id
        id: i64,
    },

    /// Edit a tool's fields
    Edit {
        /// Tool id
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        path: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        /// Move to this category
        #[arg(short, long)]
        category: Option<i64>,

        /// Move to this subcategory (0 clears it)
        #[arg(short, long)]
        sub: Option<i64>,

        /// Replace tags (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        #[arg(short, long)]
        icon: Option<String>,
    },

    /// Remove a tool
    Remove {
        /// Tool id
        id: i64,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Search tools by name, description or tag
    Search {
        /// Search query
        query: String,
    },

    /// Toggle a tool's favorite flag
    Fav {
        /// Tool id
        id: i64,
    },

    /// List favorite tools
    Favorites,

    /// List the most used tools
    Common {
        /// Maximum number of tools (defaults to the configured limit)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Record a launch of a tool
    Used {
        /// Tool id
        id: i64,
    },

    /// Set or clear a tool's background image
    Background {
        /// Tool id
        id: i64,

        /// Image name in the image directory; omit to clear
        image: Option<String>,
    },

    /// Manage categories
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Manage background images
    #[command(subcommand)]
    Images(ImageCommands),

    /// Show configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions {
        /// Shell type
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum CategoryCommands {
    /// List categories and their subcategories
    List,

    /// Add a category
    Add {
        name: String,

        /// Icon (emoji or file name)
        #[arg(short, long)]
        icon: Option<String>,

        #[arg(short, long)]
        priority: Option<i64>,
    },

    /// Add a subcategory under a category
    AddSub {
        /// Parent category id
        parent: i64,

        name: String,

        #[arg(short, long)]
        priority: Option<i64>,
    },

    /// Remove a category that no tool uses
    Remove {
        id: i64,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Remove a subcategory that no tool uses
    RemoveSub {
        id: i64,

        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum ImageCommands {
    /// List stored background images
    List,

    /// Copy an image into the image directory
    Import {
        /// Image file to copy
        file: PathBuf,

        /// Stored file name (defaults to the source name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// Delete a stored image
    Remove {
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print the config file path
    Path,
}
