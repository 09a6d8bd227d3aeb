//! End-to-end catalog tests against real files

mod common;

use std::collections::HashSet;
use std::fs::{self, File};
use std::sync::mpsc;
use std::time::{Duration, SystemTime};

use common::TestContext;
use toolbox::{Catalog, Category, SearchFilter, StoreError, Subcategory, Tool};

// ==================== Full Workflow ====================

#[test]
fn test_category_tool_lifecycle() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let catalog = &ctx.catalog;

    let recon = catalog.add_category(Category::new("Recon"))?;
    assert_eq!(recon.id, Some(1));
    assert!(recon.subcategories.is_empty());

    let scanners = catalog.add_subcategory(1, Subcategory::new("Scanners"))?;
    assert_eq!(scanners.id, Some(101));
    assert_eq!(scanners.parent_id, Some(1));

    let nmap = catalog.add_tool(Tool::new("Nmap", "/usr/bin/nmap").with_category(1, Some(101)))?;
    assert_eq!(nmap.id, Some(1));
    assert_eq!(nmap.usage_count, 0);

    let listed = catalog.get_tools_by_category(1, Some(101));
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "Nmap");

    assert!(catalog.toggle_favorite(1)?);

    let refused = catalog.delete_category(1).unwrap_err();
    assert!(matches!(refused, StoreError::CategoryInUse { id: 1, tools: 1 }));
    assert!(refused.to_string().contains("tool"));
    assert!(catalog.get_category(1).is_some());

    catalog.delete_tool(1)?;
    catalog.delete_category(1)?;
    assert!(catalog.load_categories().is_empty());
    Ok(())
}

#[test]
fn test_changes_persist_across_instances() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    ctx.catalog.add_category(Category::new("Recon"))?;
    ctx.catalog.add_tool(Tool::new("Nmap", "/usr/bin/nmap").with_category(1, None))?;
    ctx.catalog.update_tool_usage(1)?;

    let other = ctx.reopen();
    let tool = other.get_tool_by_id(1).expect("tool persisted");
    assert_eq!(tool.usage_count, 1);
    assert!(tool.last_used_at().is_some());
    assert_eq!(other.get_category(1).map(|c| c.name), Some("Recon".to_string()));
    Ok(())
}

#[test]
fn test_external_edit_is_picked_up() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    ctx.catalog.add_tool(Tool::new("Nmap", "/usr/bin/nmap"))?;
    let before = ctx.catalog.load_tools();
    assert_eq!(before.len(), 1);

    // Another process rewrites the file
    let path = ctx.path().join("tools.json");
    fs::write(&path, r#"[{"id": 1, "name": "Nmap", "path": "/usr/bin/nmap"}, {"id": 2, "name": "Burp", "path": "/opt/burp"}]"#)?;
    File::options()
        .write(true)
        .open(&path)?
        .set_modified(SystemTime::now() + Duration::from_secs(5))?;

    let after = ctx.catalog.load_tools();
    assert_eq!(after.len(), 2);
    assert_eq!(after[1].name, "Burp");
    Ok(())
}

// ==================== File Shapes ====================

#[test]
fn test_wrapped_envelope_is_preserved() -> anyhow::Result<()> {
    let ctx = TestContext::with_files(
        Some(r#"{"categories": [{"id": 1, "name": "Recon"}]}"#),
        Some(r#"{"tools": [{"id": 1, "name": "Nmap", "path": "/usr/bin/nmap"}]}"#),
    );

    ctx.catalog.add_subcategory(1, Subcategory::new("Scanners"))?;
    ctx.catalog.add_tool(Tool::new("Burp", "/opt/burp"))?;

    let categories = ctx.read_json("categories.json");
    assert_eq!(categories["categories"][0]["subcategories"][0]["id"], 101);

    let tools = ctx.read_json("tools.json");
    let list = tools["tools"].as_array().expect("wrapped tool list");
    assert_eq!(list.len(), 2);
    assert_eq!(list[1]["id"], 2);
    Ok(())
}

#[test]
fn test_bare_envelope_for_new_files() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    ctx.catalog.add_category(Category::new("Recon"))?;
    ctx.catalog.add_tool(Tool::new("Nmap", "/usr/bin/nmap"))?;

    assert!(ctx.read_json("categories.json").is_array());
    assert!(ctx.read_json("tools.json").is_array());
    Ok(())
}

#[test]
fn test_save_of_loaded_categories_is_stable() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    ctx.catalog.add_category(Category::new("Recon").with_priority(1))?;
    ctx.catalog.add_category(Category::new("Web").with_priority(2))?;
    ctx.catalog.add_subcategory(1, Subcategory::new("Scanners"))?;
    let before = ctx.read_json("categories.json");

    let loaded = ctx.catalog.load_categories();
    ctx.catalog.save_categories(&loaded)?;

    assert_eq!(ctx.read_json("categories.json"), before);
    Ok(())
}

#[test]
fn test_save_of_loaded_categories_writes_priority_order() -> anyhow::Result<()> {
    let ctx = TestContext::with_files(
        Some(
            r#"[
                {"id": 1, "name": "Web", "priority": 2, "subcategories": [
                    {"id": 102, "name": "Proxies", "parent_id": 1, "priority": 9},
                    {"id": 101, "name": "Scanners", "parent_id": 1, "priority": 1}
                ]},
                {"id": 2, "name": "Recon", "priority": 1}
            ]"#,
        ),
        None,
    );

    let loaded = ctx.catalog.load_categories();
    ctx.catalog.save_categories(&loaded)?;

    // The file comes back in load order; the records themselves are unchanged
    let on_disk = ctx.read_json("categories.json");
    assert_eq!(on_disk[0]["name"], "Recon");
    assert_eq!(on_disk[1]["name"], "Web");
    assert_eq!(on_disk[1]["subcategories"][0]["id"], 101);
    assert_eq!(on_disk[1]["subcategories"][1]["id"], 102);
    assert_eq!(ctx.reopen().load_categories(), loaded);
    Ok(())
}

#[test]
fn test_unknown_tool_keys_survive_writes() -> anyhow::Result<()> {
    let ctx = TestContext::with_files(
        None,
        Some(r#"[{"id": 1, "name": "Nmap", "path": "/usr/bin/nmap", "launcher": {"sudo": true}}]"#),
    );
    ctx.catalog.toggle_favorite(1)?;

    let tools = ctx.read_json("tools.json");
    assert_eq!(tools[0]["launcher"]["sudo"], true);
    assert_eq!(tools[0]["is_favorite"], true);
    Ok(())
}

// ==================== Recovery ====================

#[test]
fn test_malformed_categories_restore_defaults() -> anyhow::Result<()> {
    let ctx = TestContext::with_files(Some("{ this is not json"), None);

    let categories = ctx.catalog.load_categories();
    assert_eq!(categories.len(), 8);
    assert_eq!(categories[0].name, "Information Gathering");

    // The defaults were written back
    let on_disk = ctx.read_json("categories.json");
    assert_eq!(on_disk.as_array().map(Vec::len), Some(8));
    Ok(())
}

#[test]
fn test_malformed_tools_are_not_overwritten() -> anyhow::Result<()> {
    let ctx = TestContext::with_files(None, Some("[{broken"));

    assert!(ctx.catalog.load_tools().is_empty());
    assert!(matches!(
        ctx.catalog.add_tool(Tool::new("Nmap", "/usr/bin/nmap")),
        Err(StoreError::Json(_))
    ));
    assert_eq!(fs::read_to_string(ctx.path().join("tools.json"))?, "[{broken");
    Ok(())
}

#[test]
fn test_unreadable_tools_file() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let path = ctx.path().join("tools.json");
    fs::create_dir(&path)?;

    assert!(ctx.catalog.load_tools().is_empty());
    assert!(ctx.catalog.get_tool_by_id(1).is_none());
    assert!(matches!(
        ctx.catalog.add_tool(Tool::new("Nmap", "/usr/bin/nmap")),
        Err(StoreError::Read { path: p, .. }) if p == path
    ));
    assert!(matches!(ctx.catalog.delete_tool(1), Err(StoreError::Read { .. })));
    assert!(path.is_dir());
    Ok(())
}

#[test]
fn test_unwritable_categories_file() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let path = ctx.path().join("categories.json");
    fs::create_dir(&path)?;

    assert!(ctx.catalog.load_categories().is_empty());
    assert!(matches!(
        ctx.catalog.save_categories(&[Category::new("Recon")]),
        Err(StoreError::Write { path: p, .. }) if p == path
    ));
    assert!(matches!(
        ctx.catalog.add_category(Category::new("Recon")),
        Err(StoreError::Read { .. })
    ));
    Ok(())
}

#[test]
fn test_open_over_a_file_fails() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let blocker = ctx.path().join("not-a-dir");
    fs::write(&blocker, b"x")?;

    assert!(matches!(Catalog::open(&blocker), Err(StoreError::Write { .. })));
    assert!(matches!(
        Catalog::open(blocker.join("data")),
        Err(StoreError::Write { .. })
    ));
    Ok(())
}

#[test]
fn test_legacy_category_ids_are_normalized() -> anyhow::Result<()> {
    let ctx = TestContext::with_files(
        Some(
            r#"[{"id": 1, "name": "Recon", "subcategories": [
                {"id": 101, "name": "Scanners", "parent_id": 1}
            ]}]"#,
        ),
        Some(r#"[{"id": 1, "name": "Nmap", "path": "/usr/bin/nmap", "category_id": 101}]"#),
    );

    let tool = ctx.catalog.get_tool_by_id(1).expect("tool");
    assert_eq!(tool.category_id, Some(1));
    assert_eq!(tool.subcategory_id, Some(101));
    assert_eq!(ctx.catalog.get_tools_by_category(1, Some(101)).len(), 1);
    Ok(())
}

// ==================== Ids ====================

#[test]
fn test_ids_are_unique_and_not_reused() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    let catalog = &ctx.catalog;

    for name in ["a", "b", "c"] {
        catalog.add_tool(Tool::new(name, format!("/bin/{name}")))?;
    }
    catalog.delete_tool(3)?;
    let next = catalog.add_tool(Tool::new("d", "/bin/d"))?;
    assert_eq!(next.id, Some(4));

    let ids: Vec<_> = catalog.load_tools().iter().filter_map(|t| t.id).collect();
    let unique: HashSet<_> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());

    // Subcategory ids never collide with category ids either
    for name in ["Recon", "Web"] {
        catalog.add_category(Category::new(name))?;
    }
    for _ in 0..3 {
        catalog.add_subcategory(1, Subcategory::new("Sub"))?;
    }
    let mut seen = HashSet::new();
    for category in catalog.load_categories().iter() {
        assert!(seen.insert(category.id));
        for sub in &category.subcategories {
            assert!(seen.insert(sub.id));
        }
    }
    Ok(())
}

// ==================== Search and Async Load ====================

#[test]
fn test_search_over_catalog() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    ctx.catalog.add_tool(Tool::new("Nmap Scanner", "/usr/bin/nmap").with_tags(["recon"]))?;
    ctx.catalog.add_tool(Tool::new("Wireshark", "/usr/bin/wireshark"))?;

    let filter = SearchFilter::default();
    assert!(ctx.catalog.search_tools(&filter, "  ").is_none());

    let found = ctx.catalog.search_tools(&filter, "nmap").expect("matches");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Nmap Scanner");

    let found = ctx.catalog.search_tools(&filter, "n").expect("matches");
    assert_eq!(found.len(), 1);
    Ok(())
}

#[test]
fn test_async_load_sees_saved_tools() -> anyhow::Result<()> {
    let ctx = TestContext::new();
    ctx.catalog.add_tool(Tool::new("Nmap", "/usr/bin/nmap"))?;
    ctx.catalog.add_tool(Tool::new("Burp", "/opt/burp"))?;

    let (tx, rx) = mpsc::channel();
    let handle = ctx.catalog.load_tools_async(move |result| {
        let names: Vec<String> = result
            .map(|tools| tools.iter().map(|t| t.name.clone()).collect())
            .unwrap_or_default();
        tx.send(names).ok();
    });

    assert!(handle.join());
    assert_eq!(rx.recv()?, vec!["Nmap", "Burp"]);
    Ok(())
}
