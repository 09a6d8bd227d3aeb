//! Background image commands: list, import, remove

use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use crate::assets::AssetDirs;
use crate::catalog::Catalog;

/// List stored images and how many tools use each
pub fn cmd_images_list(catalog: &Catalog, assets: &AssetDirs) -> Result<()> {
    let images = assets.list_images()?;
    if images.is_empty() {
        println!("No images in {}", assets.images_dir().display());
        return Ok(());
    }

    let tools = catalog.load_tools();
    for name in &images {
        let users = tools
            .iter()
            .filter(|t| t.background_image.as_deref() == Some(name.as_str()))
            .count();
        if users > 0 {
            println!("  {} {}", name, format!("(used by {users})").dimmed());
        } else {
            println!("  {}", name);
        }
    }
    println!("{} {} images", ">".cyan(), images.len());

    Ok(())
}

pub fn cmd_images_import(assets: &AssetDirs, file: &Path, name: Option<&str>) -> Result<()> {
    let stored = assets.import_image(file, name)?;
    println!("{} Imported '{}'", "+".green(), stored);
    Ok(())
}

/// Delete a stored image; tools still pointing at it are left untouched
pub fn cmd_images_remove(catalog: &Catalog, assets: &AssetDirs, name: &str) -> Result<()> {
    if !assets.delete_image(name)? {
        println!("Image '{}' not found", name);
        return Ok(());
    }
    println!("{} Removed '{}'", "-".red(), name);

    let users = catalog
        .load_tools()
        .iter()
        .filter(|t| t.background_image.as_deref() == Some(name))
        .count();
    if users > 0 {
        println!(
            "{} {} tool(s) still reference it; clear with `toolbox background <id>`",
            "!".yellow(),
            users
        );
    }

    Ok(())
}
