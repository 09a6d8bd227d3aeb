//! Tool commands: add, list, show, edit, remove, search

use anyhow::{Context, Result, bail};
use colored::Colorize;

use super::helpers::{category_label, confirm, print_tools};
use crate::catalog::Catalog;
use crate::models::Tool;
use crate::search::SearchFilter;

/// Fields accepted by `toolbox add`
#[derive(Debug, Default)]
pub struct NewTool {
    pub name: String,
    pub path: String,
    pub description: Option<String>,
    pub category: Option<i64>,
    pub sub: Option<i64>,
    pub tags: Vec<String>,
    pub icon: Option<String>,
    pub arguments: Option<String>,
    pub workdir: Option<String>,
    pub terminal: bool,
    pub web: bool,
}

/// Fields accepted by `toolbox edit`; `None` leaves a field unchanged
#[derive(Debug, Default)]
pub struct ToolEdit {
    pub name: Option<String>,
    pub path: Option<String>,
    pub description: Option<String>,
    pub category: Option<i64>,
    pub sub: Option<i64>,
    pub tags: Option<Vec<String>>,
    pub icon: Option<String>,
}

/// Fail unless `category`/`sub` name an existing category and one of its subcategories
fn check_placement(catalog: &Catalog, category: Option<i64>, sub: Option<i64>) -> Result<()> {
    let Some(category_id) = category else {
        return Ok(());
    };
    let Some(found) = catalog.get_category(category_id) else {
        bail!("Category {} not found", category_id);
    };
    if let Some(sub_id) = sub
        && found.subcategory(sub_id).is_none()
    {
        bail!("Subcategory {} is not part of '{}'", sub_id, found.name);
    }
    Ok(())
}

/// Add a new tool to the catalog
pub fn cmd_add(catalog: &Catalog, new: NewTool) -> Result<()> {
    check_placement(catalog, new.category, new.sub)?;

    let mut tool = Tool::new(new.name, new.path).with_tags(new.tags);
    if let Some(desc) = new.description {
        tool = tool.with_description(desc);
    }
    if let Some(category) = new.category {
        tool = tool.with_category(category, new.sub);
    }
    if let Some(icon) = new.icon {
        tool = tool.with_icon(icon);
    }
    if new.web {
        tool = tool.web();
    }
    tool.arguments = new.arguments;
    tool.working_directory = new.workdir;
    tool.run_in_terminal = new.terminal;

    let added = catalog.add_tool(tool).context("Failed to add tool")?;
    println!(
        "{} Added '{}' (id {})",
        "+".green(),
        added.name,
        added.id.unwrap_or_default()
    );

    Ok(())
}

/// List tools, optionally limited to a category
pub fn cmd_list(
    catalog: &Catalog,
    category: Option<i64>,
    sub: Option<i64>,
    format: &str,
) -> Result<()> {
    let tools = match category {
        Some(id) => catalog.get_tools_by_category(id, sub),
        None => catalog.load_tools(),
    };

    if tools.is_empty() {
        println!("No tools found");
        return Ok(());
    }

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(tools.as_ref())?),
        _ => print_tools(&tools, &catalog.load_categories()),
    }

    Ok(())
}

/// Show details of a specific tool
pub fn cmd_show(catalog: &Catalog, id: i64) -> Result<()> {
    let Some(tool) = catalog.get_tool_by_id(id) else {
        println!("Tool {} not found", id);
        return Ok(());
    };

    let title = if tool.is_favorite {
        format!("{} {}", tool.name, "★".yellow())
    } else {
        tool.name.clone()
    };
    println!("{}", title.bold());
    println!("{}", "=".repeat(tool.name.chars().count()));

    if !tool.description.is_empty() {
        println!("\n{}", tool.description);
    }

    let kind = if tool.is_web() { "URL" } else { "Path" };
    println!("\n{}: {}", kind.bold(), tool.path);
    println!(
        "{}: {}",
        "Category".bold(),
        category_label(&catalog.load_categories(), &tool)
    );

    if !tool.tags.is_empty() {
        println!("{}: {}", "Tags".bold(), tool.tags.join(", "));
    }
    if let Some(args) = &tool.arguments {
        println!("{}: {}", "Arguments".bold(), args);
    }
    if let Some(dir) = &tool.working_directory {
        println!("{}: {}", "Working dir".bold(), dir);
    }
    if tool.run_in_terminal {
        println!("{}: yes", "Terminal".bold());
    }
    if let Some(image) = &tool.background_image {
        println!("{}: {}", "Background".bold(), image);
    }

    println!(
        "\n{}: {} times",
        "Usage".bold(),
        tool.usage_count.to_string().cyan()
    );
    if let Some(at) = tool.last_used_at() {
        println!("{}: {}", "Last used".dimmed(), at.format("%Y-%m-%d %H:%M"));
    }

    Ok(())
}

/// Edit fields of an existing tool, keeping its usage statistics
pub fn cmd_edit(catalog: &Catalog, id: i64, edit: ToolEdit) -> Result<()> {
    let Some(mut tool) = catalog.get_tool_by_id(id) else {
        println!("Tool {} not found", id);
        return Ok(());
    };

    if let Some(name) = edit.name {
        tool.name = name;
    }
    if let Some(path) = edit.path {
        tool.path = path;
    }
    if let Some(desc) = edit.description {
        tool.description = desc;
    }
    if let Some(category) = edit.category
        && tool.category_id != Some(category)
    {
        tool.category_id = Some(category);
        tool.subcategory_id = None;
    }
    match edit.sub {
        Some(0) => tool.subcategory_id = None,
        Some(sub) => tool.subcategory_id = Some(sub),
        None => {}
    }
    if let Some(tags) = edit.tags {
        tool.tags = tags;
    }
    if let Some(icon) = edit.icon {
        tool.icon = Some(icon);
    }

    check_placement(catalog, tool.category_id, tool.subcategory_id)?;

    let updated = catalog.update_tool(id, tool).context("Failed to update tool")?;
    println!("{} Updated '{}'", "~".yellow(), updated.name);

    Ok(())
}

/// Remove a tool from the catalog
pub fn cmd_remove(catalog: &Catalog, id: i64, force: bool) -> Result<()> {
    let Some(tool) = catalog.get_tool_by_id(id) else {
        println!("Tool {} not found", id);
        return Ok(());
    };

    if !force && !confirm(&format!("Remove tool '{}'?", tool.name))? {
        println!("Cancelled");
        return Ok(());
    }

    catalog.delete_tool(id).context("Failed to remove tool")?;
    println!("{} Removed '{}'", "-".red(), tool.name);

    Ok(())
}

/// Search for tools
pub fn cmd_search(catalog: &Catalog, filter: &SearchFilter, query: &str) -> Result<()> {
    let tools = catalog.load_tools();
    let result = filter.filter(&tools, query);

    if result.is_default_view() {
        println!("Empty query; use `toolbox list` to see every tool");
        return Ok(());
    }

    let hits = result.hits();
    if hits.is_empty() {
        println!("No tools found matching '{}'", query);
        return Ok(());
    }

    println!("Found {} tool(s):\n", hits.len());

    let categories = catalog.load_categories();
    for hit in hits {
        let tool = hit.tool;
        println!(
            "  {} {} [{}]",
            format!("#{}", tool.id.unwrap_or_default()).dimmed(),
            tool.name.bold(),
            category_label(&categories, tool)
        );
        if !tool.description.is_empty() {
            println!("    {}", tool.description.dimmed());
        }
    }

    Ok(())
}
