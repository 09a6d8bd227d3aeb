//! Built-in category set restored when categories.json cannot be parsed

use crate::models::Category;

const DEFAULT_CATEGORIES: [(&str, &str); 8] = [
    ("Information Gathering", "🔍"),
    ("Vulnerability Scanning", "🚨"),
    ("Web Testing", "🌐"),
    ("Database Tools", "💾"),
    ("Password Cracking", "🔑"),
    ("Network Tools", "📡"),
    ("Development Tools", "💻"),
    ("Other Tools", "📦"),
];

/// The fallback categories, numbered 1..=8 in display order
pub fn default_categories() -> Vec<Category> {
    DEFAULT_CATEGORIES
        .iter()
        .zip(1..)
        .map(|(&(name, icon), id)| {
            let mut category = Category::new(name).with_icon(icon);
            category.id = Some(id);
            category
        })
        .collect()
}
