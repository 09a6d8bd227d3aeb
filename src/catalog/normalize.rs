//! Reconcile tool category references with the category hierarchy
//!
//! Older tools.json files sometimes stored a subcategory id (e.g. `101`) in
//! `category_id`. Such references are moved to `subcategory_id` and
//! `category_id` is pointed at the owning category. The check is a heuristic:
//! it only looks at whether the id appears among the subcategory ids.

use std::collections::{HashMap, HashSet};

use crate::models::{Category, Tool};

/// Rewrite stale category references in place, returning how many tools changed
pub(crate) fn normalize_tools(tools: &mut [Tool], categories: &[Category]) -> usize {
    let top_level: HashSet<i64> = categories.iter().filter_map(|c| c.id).collect();

    let mut sub_to_parent: HashMap<i64, Option<i64>> = HashMap::new();
    for category in categories {
        for sub in &category.subcategories {
            if let Some(sid) = sub.id {
                sub_to_parent.insert(sid, sub.parent_id.or(category.id));
            }
        }
    }

    let mut changed = 0;
    for tool in tools.iter_mut() {
        let original = (tool.category_id, tool.subcategory_id);
        let (cid, sid) = original;

        if let Some(cid) = cid
            && !top_level.contains(&cid)
            && let Some(&parent) = sub_to_parent.get(&cid)
        {
            tool.subcategory_id = sid.or(Some(cid));
            tool.category_id = parent;
        }

        if let Some(sid) = sid
            && let Some(&parent) = sub_to_parent.get(&sid)
            && tool.category_id != parent
        {
            tool.category_id = parent;
        }

        if (tool.category_id, tool.subcategory_id) != original {
            changed += 1;
        }
    }

    changed
}
