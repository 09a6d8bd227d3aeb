//! Usage commands: favorites, common tools, launch recording, backgrounds

use anyhow::{Result, bail};
use colored::Colorize;

use super::helpers::print_tools;
use crate::assets::AssetDirs;
use crate::catalog::Catalog;
use crate::error::StoreError;

pub fn cmd_fav(catalog: &Catalog, id: i64) -> Result<()> {
    match catalog.toggle_favorite(id) {
        Ok(true) => println!("{} Marked tool {} as favorite", "★".yellow(), id),
        Ok(false) => println!("{} Unmarked tool {} as favorite", "☆".dimmed(), id),
        Err(StoreError::ToolNotFound(_)) => println!("Tool {} not found", id),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

pub fn cmd_favorites(catalog: &Catalog) -> Result<()> {
    let tools = catalog.get_favorite_tools();
    if tools.is_empty() {
        println!("No favorite tools yet. Mark one with `toolbox fav <id>`");
        return Ok(());
    }

    print_tools(&tools, &catalog.load_categories());
    Ok(())
}

/// Show the most used tools
pub fn cmd_common(catalog: &Catalog, limit: usize) -> Result<()> {
    let tools: Vec<_> = catalog
        .get_common_tools(limit)
        .into_iter()
        .filter(|t| t.usage_count > 0)
        .collect();

    if tools.is_empty() {
        println!("No usage recorded yet");
        return Ok(());
    }

    println!("{}", "Most used tools".bold());
    for (rank, tool) in tools.iter().enumerate() {
        let last = tool
            .last_used_at()
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:>2}. {} {} {}",
            rank + 1,
            tool.name.bold(),
            format!("{} uses", tool.usage_count).cyan(),
            format!("last {last}").dimmed()
        );
    }

    Ok(())
}

/// Record one launch of a tool
pub fn cmd_used(catalog: &Catalog, id: i64) -> Result<()> {
    match catalog.update_tool_usage(id) {
        Ok(tool) => println!(
            "{} '{}' used {} times",
            "+".green(),
            tool.name,
            tool.usage_count
        ),
        Err(StoreError::ToolNotFound(_)) => println!("Tool {} not found", id),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Set or clear a tool's background image
pub fn cmd_background(
    catalog: &Catalog,
    assets: &AssetDirs,
    id: i64,
    image: Option<String>,
) -> Result<()> {
    if let Some(name) = &image
        && assets.resolve_background(name).is_none()
    {
        bail!(
            "Image '{}' not found in {}; import it with `toolbox images import`",
            name,
            assets.images_dir().display()
        );
    }

    match catalog.update_tool_background(id, image) {
        Ok(tool) => match &tool.background_image {
            Some(name) => println!("{} '{}' background set to {}", "~".yellow(), tool.name, name),
            None => println!("{} '{}' background cleared", "~".yellow(), tool.name),
        },
        Err(StoreError::ToolNotFound(_)) => println!("Tool {} not found", id),
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Tool;
    use tempfile::TempDir;

    #[test]
    fn test_background_requires_stored_image() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let catalog = Catalog::open(dir.path().join("data"))?;
        let assets = AssetDirs::open(dir.path().join("icons"), dir.path().join("images"))?;
        catalog.add_tool(Tool::new("nmap", "/usr/bin/nmap"))?;

        assert!(cmd_background(&catalog, &assets, 1, Some("kali.png".into())).is_err());

        std::fs::write(assets.images_dir().join("kali.png"), b"png")?;
        cmd_background(&catalog, &assets, 1, Some("kali.png".into()))?;
        assert_eq!(
            catalog.get_tool_by_id(1).and_then(|t| t.background_image),
            Some("kali.png".to_string())
        );

        cmd_background(&catalog, &assets, 1, None)?;
        assert_eq!(catalog.get_tool_by_id(1).and_then(|t| t.background_image), None);
        Ok(())
    }

    #[test]
    fn test_used_and_fav_on_missing_tool() -> anyhow::Result<()> {
        let dir = TempDir::new()?;
        let catalog = Catalog::open(dir.path())?;
        cmd_used(&catalog, 7)?;
        cmd_fav(&catalog, 7)?;
        assert!(catalog.load_tools().is_empty());
        Ok(())
    }
}
