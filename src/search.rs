//! Tool search: substring matching with a fuzzy similarity fallback
//!
//! Results keep the order of the input list; fuzzy scores are reported but
//! not used for ranking.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::Tool;

/// Similarity ratio at or above which a fuzzy match counts
pub const DEFAULT_FUZZY_THRESHOLD: f32 = 0.6;

/// Shortest query (in characters) that may match fuzzily
pub const DEFAULT_MIN_FUZZY_LEN: usize = 3;

/// Which tier a tool matched in
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchTier {
    /// The query is a substring of the name, description or a tag
    Substring,
    /// Best similarity ratio across name, description and tags
    Fuzzy(f32),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub tool: &'a Tool,
    pub tier: MatchTier,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult<'a> {
    /// The query was blank: show the regular view instead of results
    DefaultView,
    /// Matching tools in input order; may be empty
    Matches(Vec<SearchHit<'a>>),
}

impl<'a> SearchResult<'a> {
    pub fn is_default_view(&self) -> bool {
        matches!(self, Self::DefaultView)
    }

    pub fn hits(&self) -> &[SearchHit<'a>] {
        match self {
            Self::DefaultView => &[],
            Self::Matches(hits) => hits,
        }
    }

    pub fn into_matches(self) -> Option<Vec<SearchHit<'a>>> {
        match self {
            Self::DefaultView => None,
            Self::Matches(hits) => Some(hits),
        }
    }

    /// Category and subcategory of the first hit, for auto-selecting them
    pub fn focus(&self) -> Option<(Option<i64>, Option<i64>)> {
        self.hits()
            .first()
            .map(|hit| (hit.tool.category_id, hit.tool.subcategory_id))
    }
}

/// Texts at least this long stop indexing their most frequent characters
const POPULAR_MIN_LEN: usize = 200;

/// Similarity of two strings as `2 * matches / total_len`, 1.0 for two empty strings.
///
/// Matches are counted Ratcliff/Obershelp style: take the longest common
/// block, then repeat on the unmatched text left and right of it. Among
/// equally long blocks the one starting earliest in `a` wins, then earliest
/// in `b`. So `similarity("rhday", "hydra")` is 0.4, not the 0.6 a common
/// subsequence count would give.
pub fn similarity(a: &str, b: &str) -> f32 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }
    let matched = BlockMatcher::new(&a, &b).matched();
    2.0 * matched as f32 / total as f32
}

struct BlockMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    /// Positions of each character in `b`, ascending
    b_index: HashMap<char, Vec<usize>>,
}

impl<'s> BlockMatcher<'s> {
    fn new(a: &'s [char], b: &'s [char]) -> Self {
        let mut b_index: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b_index.entry(c).or_default().push(j);
        }
        // In long texts, characters making up over 1% of `b` do not seed blocks
        if b.len() >= POPULAR_MIN_LEN {
            let limit = b.len() / 100 + 1;
            b_index.retain(|_, positions| positions.len() <= limit);
        }
        Self { a, b, b_index }
    }

    /// Total length of all matching blocks
    fn matched(&self) -> usize {
        let mut total = 0;
        let mut pending = vec![(0, self.a.len(), 0, self.b.len())];
        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let (i, j, len) = self.longest_block(alo, ahi, blo, bhi);
            if len == 0 {
                continue;
            }
            total += len;
            if alo < i && blo < j {
                pending.push((alo, i, blo, j));
            }
            if i + len < ahi && j + len < bhi {
                pending.push((i + len, ahi, j + len, bhi));
            }
        }
        total
    }

    /// Longest block shared by `a[alo..ahi]` and `b[blo..bhi]` as `(i, j, len)`
    fn longest_block(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> (usize, usize, usize) {
        let (mut best_i, mut best_j, mut best_len) = (alo, blo, 0);
        // Length of the block ending at each position of `b`, for the previous `a` character
        let mut run: HashMap<usize, usize> = HashMap::new();

        for i in alo..ahi {
            let mut next_run = HashMap::new();
            for &j in self.b_index.get(&self.a[i]).into_iter().flatten() {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let len = j
                    .checked_sub(1)
                    .and_then(|prev| run.get(&prev))
                    .copied()
                    .unwrap_or(0)
                    + 1;
                next_run.insert(j, len);
                if len > best_len {
                    (best_i, best_j, best_len) = (i + 1 - len, j + 1 - len, len);
                }
            }
            run = next_run;
        }

        // Popular characters are not indexed, so grow the block across them
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_len += 1;
        }
        while best_i + best_len < ahi
            && best_j + best_len < bhi
            && self.a[best_i + best_len] == self.b[best_j + best_len]
        {
            best_len += 1;
        }

        (best_i, best_j, best_len)
    }
}

/// Search settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SearchFilter {
    #[serde(default = "default_threshold")]
    pub fuzzy_threshold: f32,
    #[serde(default = "default_min_fuzzy_len")]
    pub min_fuzzy_len: usize,
}

fn default_threshold() -> f32 {
    DEFAULT_FUZZY_THRESHOLD
}

fn default_min_fuzzy_len() -> usize {
    DEFAULT_MIN_FUZZY_LEN
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            min_fuzzy_len: DEFAULT_MIN_FUZZY_LEN,
        }
    }
}

impl SearchFilter {
    /// Filter `tools` by `query`.
    ///
    /// The query is trimmed and lowercased; a blank query yields
    /// `SearchResult::DefaultView` rather than every tool.
    pub fn filter<'a>(&self, tools: &'a [Tool], query: &str) -> SearchResult<'a> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return SearchResult::DefaultView;
        }

        let fuzzy = query.chars().count() >= self.min_fuzzy_len;
        let hits = tools
            .iter()
            .filter_map(|tool| {
                self.match_tool(tool, &query, fuzzy)
                    .map(|tier| SearchHit { tool, tier })
            })
            .collect();

        SearchResult::Matches(hits)
    }

    fn match_tool(&self, tool: &Tool, query: &str, fuzzy: bool) -> Option<MatchTier> {
        let name = tool.name.to_lowercase();
        let description = tool.description.to_lowercase();
        let tags: Vec<String> = tool.tags.iter().map(|t| t.to_lowercase()).collect();

        if name.contains(query)
            || description.contains(query)
            || tags.iter().any(|t| t.contains(query))
        {
            return Some(MatchTier::Substring);
        }

        if !fuzzy {
            return None;
        }

        let best = tags
            .iter()
            .map(|t| similarity(query, t))
            .chain([similarity(query, &name), similarity(query, &description)])
            .fold(0.0_f32, f32::max);

        (best >= self.fuzzy_threshold).then_some(MatchTier::Fuzzy(best))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tools() -> Vec<Tool> {
        vec![
            Tool::new("Nmap Scanner", "/usr/bin/nmap")
                .with_description("Network mapper")
                .with_category(1, Some(101)),
            Tool::new("Wireshark", "/usr/bin/wireshark"),
            Tool::new("Burp", "/opt/burp")
                .with_tags(["proxy", "Web"])
                .with_category(3, None),
            Tool::new("nmap", "/usr/local/bin/nmap"),
        ]
    }

    fn names<'a>(result: &SearchResult<'a>) -> Vec<&'a str> {
        result.hits().iter().map(|h| h.tool.name.as_str()).collect()
    }

    // ==================== Similarity ====================

    #[test]
    fn test_similarity() {
        assert_eq!(similarity("nmap", "nmap"), 1.0);
        assert_eq!(similarity("", ""), 1.0);
        assert_eq!(similarity("abc", ""), 0.0);
        // "nm" plus one of the swapped pair
        assert!((similarity("nmpa", "nmap") - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_counts_blocks_not_subsequences() {
        // "r" is the earliest longest block; only "a" is left to its right
        assert!((similarity("rhday", "hydra") - 0.4).abs() < 1e-6);
        assert!((similarity("awsiehr", "wireshark") - 0.25).abs() < 1e-6);
        assert!((similarity("prxoy", "proxy") - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_similarity_long_text() {
        let text = format!("{}nmap", "x".repeat(300));
        // "x" is not indexed here, the block grows back over it from "nmap"
        let expected = 2.0 * 6.0 / (6.0 + text.chars().count() as f32);
        assert!((similarity("xxnmap", &text) - expected).abs() < 1e-6);
    }

    // ==================== Query Handling ====================

    #[test]
    fn test_empty_query_is_default_view() {
        let tools = tools();
        let filter = SearchFilter::default();
        assert!(filter.filter(&tools, "").is_default_view());
        assert!(filter.filter(&tools, "   \t").is_default_view());
        assert!(filter.filter(&tools, "").focus().is_none());
    }

    #[test]
    fn test_no_match_is_empty_not_default() {
        let tools = tools();
        let result = SearchFilter::default().filter(&tools, "zzzzzz");
        assert!(!result.is_default_view());
        assert!(result.hits().is_empty());
    }

    // ==================== Substring Tier ====================

    #[test]
    fn test_substring_is_case_insensitive() {
        let tools = tools();
        let result = SearchFilter::default().filter(&tools, "  NMAP ");
        assert_eq!(names(&result), vec!["Nmap Scanner", "nmap"]);
        assert!(result.hits().iter().all(|h| h.tier == MatchTier::Substring));
    }

    #[test]
    fn test_substring_description_and_tags() {
        let tools = tools();
        let filter = SearchFilter::default();
        assert_eq!(names(&filter.filter(&tools, "network")), vec!["Nmap Scanner"]);
        assert_eq!(names(&filter.filter(&tools, "web")), vec!["Burp"]);
    }

    #[test]
    fn test_short_query_skips_fuzzy() {
        let tools = vec![Tool::new("Wireshark", "/usr/bin/wireshark")];
        let filter = SearchFilter::default();
        assert!(filter.filter(&tools, "n").hits().is_empty());
        assert!(filter.filter(&tools, "xq").hits().is_empty());
        assert_eq!(filter.filter(&tools, "w").hits().len(), 1);
    }

    // ==================== Fuzzy Tier ====================

    #[test]
    fn test_fuzzy_transposition() {
        let tools = vec![Tool::new("nmap", "/usr/bin/nmap")];
        let result = SearchFilter::default().filter(&tools, "nmpa");
        let hits = result.hits();
        assert_eq!(hits.len(), 1);
        assert!(matches!(hits[0].tier, MatchTier::Fuzzy(score) if score >= 0.6));
    }

    #[test]
    fn test_fuzzy_matches_tags() {
        let tools = vec![Tool::new("Burp", "/opt/burp").with_tags(["proxy"])];
        assert_eq!(SearchFilter::default().filter(&tools, "prxoy").hits().len(), 1);
    }

    #[test]
    fn test_fuzzy_rejects_scrambled_letters() {
        let tools = vec![Tool::new("Hydra", "/usr/bin/hydra")];
        assert!(SearchFilter::default().filter(&tools, "rhday").hits().is_empty());
    }

    #[test]
    fn test_fuzzy_threshold_is_configurable() {
        let tools = vec![Tool::new("nmap", "/usr/bin/nmap")];
        let strict = SearchFilter {
            fuzzy_threshold: 0.9,
            ..SearchFilter::default()
        };
        assert!(strict.filter(&tools, "nmpa").hits().is_empty());
    }

    #[test]
    fn test_tool_without_description_or_tags() {
        let tools = vec![Tool::new("x", "/x")];
        assert!(SearchFilter::default().filter(&tools, "abcdef").hits().is_empty());
    }

    // ==================== Ordering and Focus ====================

    #[test]
    fn test_order_follows_input() {
        let tools = vec![Tool::new("nmpa", "/a"), Tool::new("nmap", "/b")];
        // first tool only matches fuzzily, second by substring; order is unchanged
        let result = SearchFilter::default().filter(&tools, "nmap");
        assert_eq!(names(&result), vec!["nmpa", "nmap"]);
        assert!(matches!(result.hits()[0].tier, MatchTier::Fuzzy(_)));
        assert_eq!(result.hits()[1].tier, MatchTier::Substring);
    }

    #[test]
    fn test_focus_exposes_first_hit_category() {
        let tools = tools();
        let filter = SearchFilter::default();
        assert_eq!(filter.filter(&tools, "scanner").focus(), Some((Some(1), Some(101))));
        assert_eq!(filter.filter(&tools, "burp").focus(), Some((Some(3), None)));
        assert_eq!(filter.filter(&tools, "qqqqq").focus(), None);
    }
}
