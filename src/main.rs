//! Toolbox CLI - categorized tool launcher catalog
//!
//! This file contains only CLI dispatch logic. All command implementations
//! are in the `commands/` module.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::generate;

use toolbox::{
    AssetDirs,
    Catalog,
    CategoryCommands,
    Cli,
    Commands,
    ConfigCommands,
    ImageCommands,
    NewTool,
    ToolEdit,
    ToolboxConfig,
    // Usage commands
    cmd_background,
    // Category commands
    cmd_category_add,
    cmd_category_list,
    cmd_category_remove,
    cmd_common,
    // Config commands
    cmd_config_path,
    cmd_config_show,
    cmd_fav,
    cmd_favorites,
    // Image commands
    cmd_images_import,
    cmd_images_list,
    cmd_images_remove,
    // Tool commands
    cmd_add,
    cmd_edit,
    cmd_list,
    cmd_remove,
    cmd_search,
    cmd_show,
    cmd_subcategory_add,
    cmd_subcategory_remove,
    cmd_used,
    logging,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = ToolboxConfig::load()?;

    // Logging is best effort; a broken RUST_LOG should not stop the command
    if let Err(e) = logging::init(logging::level_for(&config.log.level, cli.verbose)) {
        eprintln!("warning: logging disabled: {e}");
    }

    if let Some(dir) = cli.data_dir {
        config.data_dir = Some(dir);
    }
    let data_dir = config.data_dir()?;

    // Only commands that touch the catalog open it
    let open_catalog = || {
        Catalog::open(&data_dir)
            .with_context(|| format!("Failed to open catalog in {}", data_dir.display()))
    };
    let assets = || -> Result<AssetDirs> { AssetDirs::open(config.icons_dir()?, config.images_dir()?) };

    match cli.command {
        // ============================================
        // TOOL COMMANDS
        // ============================================
        Commands::Add {
            name,
            path,
            description,
            category,
            sub,
            tags,
            icon,
            arguments,
            workdir,
            terminal,
            web,
        } => cmd_add(
            &open_catalog()?,
            NewTool {
                name,
                path,
                description,
                category,
                sub,
                tags,
                icon,
                arguments,
                workdir,
                terminal,
                web,
            },
        ),

        Commands::List {
            category,
            sub,
            format,
        } => cmd_list(&open_catalog()?, category, sub, &format),
        Commands::Show { id } => cmd_show(&open_catalog()?, id),
        Commands::Edit {
            id,
            name,
            path,
            description,
            category,
            sub,
            tags,
            icon,
        } => cmd_edit(
            &open_catalog()?,
            id,
            ToolEdit {
                name,
                path,
                description,
                category,
                sub,
                tags,
                icon,
            },
        ),
        Commands::Remove { id, force } => cmd_remove(&open_catalog()?, id, force),
        Commands::Search { query } => cmd_search(&open_catalog()?, &config.search, &query),

        // ============================================
        // USAGE COMMANDS
        // ============================================
        Commands::Fav { id } => cmd_fav(&open_catalog()?, id),
        Commands::Favorites => cmd_favorites(&open_catalog()?),
        Commands::Common { limit } => {
            cmd_common(&open_catalog()?, limit.unwrap_or(config.display.common_limit))
        }
        Commands::Used { id } => cmd_used(&open_catalog()?, id),
        Commands::Background { id, image } => {
            cmd_background(&open_catalog()?, &assets()?, id, image)
        }

        // ============================================
        // CATEGORY COMMANDS
        // ============================================
        Commands::Category(command) => match command {
            CategoryCommands::List => cmd_category_list(&open_catalog()?),
            CategoryCommands::Add {
                name,
                icon,
                priority,
            } => cmd_category_add(&open_catalog()?, name, icon, priority),
            CategoryCommands::AddSub {
                parent,
                name,
                priority,
            } => cmd_subcategory_add(&open_catalog()?, parent, name, priority),
            CategoryCommands::Remove { id, force } => {
                cmd_category_remove(&open_catalog()?, id, force)
            }
            CategoryCommands::RemoveSub { id, force } => {
                cmd_subcategory_remove(&open_catalog()?, id, force)
            }
        },

        // ============================================
        // IMAGE COMMANDS
        // ============================================
        Commands::Images(command) => {
            let assets = assets()?;
            match command {
                ImageCommands::List => cmd_images_list(&open_catalog()?, &assets),
                ImageCommands::Import { file, name } => {
                    cmd_images_import(&assets, &file, name.as_deref())
                }
                ImageCommands::Remove { name } => {
                    cmd_images_remove(&open_catalog()?, &assets, &name)
                }
            }
        }

        // ============================================
        // CONFIG AND COMPLETIONS
        // ============================================
        Commands::Config(ConfigCommands::Path) => cmd_config_path(),
        Commands::Config(ConfigCommands::Show) => cmd_config_show(&config, &data_dir),
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(shell, &mut cmd, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
