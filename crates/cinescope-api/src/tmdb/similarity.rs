//! Title-similarity ranking for the "related" strip on detail views.

use super::types::Titled;

/// Maximum number of related items returned.
pub const MAX_RELATED: usize = 6;

/// Preferred minimum number of matching words.
const STRONG_MATCH: usize = 2;

/// Fallback minimum when nothing reaches [`STRONG_MATCH`].
const WEAK_MATCH: usize = 1;

/// Lowercased whitespace-separated words of `title`.
fn words(title: &str) -> Vec<String> {
    title.split_whitespace().map(str::to_lowercase).collect()
}

/// Number of reference words that relate to some candidate word.
///
/// Two words relate when either contains the other as a substring, so `"a"`
/// relates to `"cat"`.
fn match_count(reference: &[String], candidate: &[String]) -> usize {
    reference
        .iter()
        .filter(|r| {
            candidate
                .iter()
                .any(|c| c.contains(r.as_str()) || r.contains(c.as_str()))
        })
        .count()
}

/// Ranks `candidates` by how many words they share with `reference`.
///
/// Keeps candidates matching at least two words, or at least one if none do,
/// ordered by descending match count (ties keep upstream order) and capped at
/// [`MAX_RELATED`]. When nothing matches at all the upstream order is kept.
#[must_use]
pub fn rank_similar<T: Titled>(candidates: Vec<T>, reference: &str) -> Vec<T> {
    let reference = words(reference);
    let mut scored: Vec<(usize, T)> = candidates
        .into_iter()
        .map(|c| (match_count(&reference, &words(c.display_title())), c))
        .collect();

    let threshold = if scored.iter().any(|(n, _)| *n >= STRONG_MATCH) {
        Some(STRONG_MATCH)
    } else if scored.iter().any(|(n, _)| *n >= WEAK_MATCH) {
        Some(WEAK_MATCH)
    } else {
        None
    };

    if let Some(min) = threshold {
        scored.retain(|(n, _)| *n >= min);
        scored.sort_by(|a, b| b.0.cmp(&a.0));
    }

    scored
        .into_iter()
        .take(MAX_RELATED)
        .map(|(_, c)| c)
        .collect()
}
