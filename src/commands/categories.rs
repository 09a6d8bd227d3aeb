//! Category commands: list, add, add-sub, remove, remove-sub

use anyhow::Result;
use colored::Colorize;

use super::helpers::confirm;
use crate::catalog::Catalog;
use crate::error::StoreError;
use crate::models::{Category, Subcategory};

/// Print the category tree with tool counts
pub fn cmd_category_list(catalog: &Catalog) -> Result<()> {
    let categories = catalog.load_categories();
    if categories.is_empty() {
        println!("No categories");
        return Ok(());
    }

    let tools = catalog.load_tools();
    for category in categories.iter() {
        let count = tools
            .iter()
            .filter(|t| t.category_id.is_some() && t.category_id == category.id)
            .count();
        println!(
            "{} {} {} {}",
            format!("{:>3}", category.id.unwrap_or_default()).dimmed(),
            category.icon_or_default(),
            category.name.bold(),
            format!("({count})").dimmed()
        );

        for sub in &category.subcategories {
            let count = tools
                .iter()
                .filter(|t| t.subcategory_id.is_some() && t.subcategory_id == sub.id)
                .count();
            println!(
                "    {} {} {}",
                format!("{:>5}", sub.id.unwrap_or_default()).dimmed(),
                sub.name,
                format!("({count})").dimmed()
            );
        }
    }

    Ok(())
}

pub fn cmd_category_add(
    catalog: &Catalog,
    name: String,
    icon: Option<String>,
    priority: Option<i64>,
) -> Result<()> {
    let mut category = Category::new(name);
    if let Some(icon) = icon {
        category = category.with_icon(icon);
    }
    if let Some(priority) = priority {
        category = category.with_priority(priority);
    }

    let added = catalog.add_category(category)?;
    println!(
        "{} Added category '{}' (id {})",
        "+".green(),
        added.name,
        added.id.unwrap_or_default()
    );
    Ok(())
}

pub fn cmd_subcategory_add(
    catalog: &Catalog,
    parent: i64,
    name: String,
    priority: Option<i64>,
) -> Result<()> {
    let mut sub = Subcategory::new(name);
    if let Some(priority) = priority {
        sub = sub.with_priority(priority);
    }

    match catalog.add_subcategory(parent, sub) {
        Ok(added) => {
            println!(
                "{} Added subcategory '{}' (id {})",
                "+".green(),
                added.name,
                added.id.unwrap_or_default()
            );
            Ok(())
        }
        Err(e @ StoreError::CategoryNotFound(_)) => {
            println!("{} {}", "!".yellow(), e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

/// Print why a delete was refused, or propagate real failures
fn report_refusal(result: crate::error::Result<()>, removed: &str) -> Result<()> {
    match result {
        Ok(()) => {
            println!("{} Removed {}", "-".red(), removed);
            Ok(())
        }
        Err(
            e @ (StoreError::CategoryInUse { .. }
            | StoreError::SubcategoryInUse { .. }
            | StoreError::CategoryNotFound(_)
            | StoreError::SubcategoryNotFound(_)),
        ) => {
            println!("{} {}", "!".yellow(), e);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}

pub fn cmd_category_remove(catalog: &Catalog, id: i64, force: bool) -> Result<()> {
    let label = catalog
        .get_category(id)
        .map(|c| format!("category '{}'", c.name))
        .unwrap_or_else(|| format!("category {id}"));

    if !force && !confirm(&format!("Remove {label}?"))? {
        println!("Cancelled");
        return Ok(());
    }

    report_refusal(catalog.delete_category(id), &label)
}

pub fn cmd_subcategory_remove(catalog: &Catalog, id: i64, force: bool) -> Result<()> {
    let label = catalog
        .find_subcategory(id)
        .map(|s| format!("subcategory '{}'", s.name))
        .unwrap_or_else(|| format!("subcategory {id}"));

    if !force && !confirm(&format!("Remove {label}?"))? {
        println!("Cancelled");
        return Ok(());
    }

    report_refusal(catalog.delete_subcategory(id), &label)
}
