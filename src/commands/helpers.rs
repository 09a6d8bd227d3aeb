//! Shared helper functions for command implementations

use anyhow::Result;
use colored::Colorize;
use comfy_table::{
    Cell, Color, ContentArrangement, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};

use crate::models::{Category, Tool};

/// Prompt user for confirmation
pub fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    std::io::Write::flush(&mut std::io::stdout())?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    Ok(input.trim().eq_ignore_ascii_case("y"))
}

/// Shorten `text` to `max` characters, ending in an ellipsis when cut
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// "Category / Subcategory" for a tool, or "-" when unassigned
pub fn category_label(categories: &[Category], tool: &Tool) -> String {
    let Some(category) = tool
        .category_id
        .and_then(|id| categories.iter().find(|c| c.id == Some(id)))
    else {
        return "-".to_string();
    };

    match tool.subcategory_id.and_then(|id| category.subcategory(id)) {
        Some(sub) => format!("{} / {}", category.name, sub.name),
        None => category.name.clone(),
    }
}

fn terminal_width() -> u16 {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0)
        .unwrap_or(120)
}

/// Table of tools with their category, usage and description
pub fn tool_table(tools: &[Tool], categories: &[Category]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(terminal_width())
        .set_header(vec![
            Cell::new("Id").fg(Color::Cyan),
            Cell::new("Name").fg(Color::Cyan),
            Cell::new("Category").fg(Color::Cyan),
            Cell::new("★").fg(Color::Cyan),
            Cell::new("Uses").fg(Color::Cyan),
            Cell::new("Description").fg(Color::Cyan),
        ]);

    for tool in tools {
        let id = tool.id.map(|id| id.to_string()).unwrap_or_else(|| "-".into());
        let favorite = if tool.is_favorite {
            Cell::new("★").fg(Color::Yellow)
        } else {
            Cell::new("")
        };

        table.add_row(vec![
            Cell::new(id),
            Cell::new(&tool.name),
            Cell::new(category_label(categories, tool)),
            favorite,
            Cell::new(tool.usage_count),
            Cell::new(truncate(&tool.description, 60)),
        ]);
    }

    table
}

/// Print tools as a table followed by a count line
pub fn print_tools(tools: &[Tool], categories: &[Category]) {
    println!("{}", tool_table(tools, categories));
    println!("{} {} tools", ">".cyan(), tools.len());
}
