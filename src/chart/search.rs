use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::Node;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Names of nodes matching `query`, best match first. Ties keep insertion
/// order. An empty query matches nothing.
pub(super) fn rank_nodes<'a>(nodes: &'a [Node], query: &str) -> Vec<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return Vec::new();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = nodes
        .iter()
        .filter_map(|node| {
            fuzzy_match_score(&matcher, node.name(), query).map(|score| (score, node.name()))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, name)| name).collect()
}
