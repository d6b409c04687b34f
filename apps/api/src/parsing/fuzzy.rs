//! Token-set similarity, scored 0–100.
//!
//! Both strings are split on whitespace into unique word sets. Shared words are
//! factored out and the remainders are compared with a normalized Indel
//! (insert/delete only) distance, so word order and repetition do not matter.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

/// Token-set ratio of `a` and `b` in `0.0..=100.0`.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    // One side is a subset of the other.
    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    let diff_ab_joined = diff_ab.join(" ");
    let diff_ba_joined = diff_ba.join(" ");
    let ab_len = diff_ab_joined.chars().count();
    let ba_len = diff_ba_joined.chars().count();
    let sect_len = intersection.join(" ").chars().count();

    let separator = usize::from(sect_len != 0);
    let sect_ab_len = sect_len + separator + ab_len;
    let sect_ba_len = sect_len + separator + ba_len;

    let dist = indel::distance(diff_ab_joined.chars(), diff_ba_joined.chars());
    let result = ratio_from_distance(dist, sect_ab_len + sect_ba_len);
    if sect_len == 0 {
        return result;
    }

    // "sect" vs "sect + diff" differ only by the appended remainder.
    let sect_ab_ratio = ratio_from_distance(separator + ab_len, sect_len + sect_ab_len);
    let sect_ba_ratio = ratio_from_distance(separator + ba_len, sect_len + sect_ba_len);

    result.max(sect_ab_ratio).max(sect_ba_ratio)
}

/// Returns the first choice with the highest score, with its score.
///
/// Ties resolve to the earliest choice; scanning stops at a perfect score.
pub fn best_match<'a>(query: &str, choices: &'a [String]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&'a str, f64)> = None;
    for choice in choices {
        let score = token_set_ratio(query, choice);
        if best.map_or(true, |(_, s)| score > s) {
            best = Some((choice.as_str(), score));
            if score >= 100.0 {
                break;
            }
        }
    }
    best
}

/// Indel distance scaled to a 0–100 similarity over the combined length.
fn ratio_from_distance(dist: usize, lensum: usize) -> f64 {
    if lensum == 0 {
        return 100.0;
    }
    100.0 - 100.0 * dist as f64 / lensum as f64
}
