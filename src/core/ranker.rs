use std::cmp::Ordering;

use crate::core::filters::within_rent_ceiling;
use crate::models::{ScoredCandidate, SortKey};

/// Apply the caller's rent ceiling, then order by `sort_key`
///
/// The ceiling is a hard client-side filter, separate from any max-rent
/// criterion already folded into the match score. Sorting is stable: equal
/// keys keep their input (fetch) order. Numeric keys use `f64::total_cmp`,
/// so a NaN key cannot break the order of the other candidates.
pub fn rank(
    candidates: Vec<ScoredCandidate>,
    max_rent_override: Option<f64>,
    sort_key: SortKey,
) -> Vec<ScoredCandidate> {
    let mut ranked: Vec<ScoredCandidate> = candidates
        .into_iter()
        .filter(|c| within_rent_ceiling(c, max_rent_override))
        .collect();

    ranked.sort_by(|a, b| compare(a, b, sort_key));
    ranked
}

#[inline]
fn compare(a: &ScoredCandidate, b: &ScoredCandidate, sort_key: SortKey) -> Ordering {
    match sort_key {
        SortKey::Match => b.match_score.cmp(&a.match_score),
        SortKey::Rent => a.property.rent_amount.total_cmp(&b.property.rent_amount),
        SortKey::Distance => a.distance_km.total_cmp(&b.distance_km),
    }
}
