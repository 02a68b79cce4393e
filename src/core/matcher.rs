use crate::core::{
    distance::distance_km, filters::is_listable, ranker::rank, scoring::calculate_match_score,
    selector::CandidateSelector,
};
use crate::models::{
    PreferenceVector, Property, RadiusPolicy, ScoredCandidate, SearchRequest, SelectionStage,
};

/// Result of one property search
#[derive(Debug)]
pub struct SearchResult {
    pub results: Vec<ScoredCandidate>,
    /// Listable properties in the pool before radius filtering
    pub total_candidates: usize,
    pub stage: SelectionStage,
}

/// Main search orchestrator
///
/// # Pipeline Stages
/// 1. Availability filter
/// 2. Distance and match-score annotation
/// 3. Radius selection with widening fallback
/// 4. Rent ceiling and sort
/// 5. Optional truncation
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    selector: CandidateSelector,
}

impl Matcher {
    pub fn new(policy: RadiusPolicy) -> Self {
        Self {
            selector: CandidateSelector::new(policy),
        }
    }

    pub fn policy(&self) -> &RadiusPolicy {
        self.selector.policy()
    }

    /// Run a search over an already-fetched property pool
    ///
    /// # Arguments
    /// * `pool` - Properties from the data-access layer, in fetch order
    /// * `request` - Preferences (if any), rent ceiling, sort key and limit
    ///
    /// # Returns
    /// SearchResult with the ordered candidates and the widening stage reached
    pub fn search(&self, pool: Vec<Property>, request: &SearchRequest) -> SearchResult {
        let total_candidates = pool.iter().filter(|p| is_listable(p)).count();

        let selection = self.selector.select(pool, request.preferences.as_ref());
        tracing::debug!(
            "Selected {} of {} candidates at stage {:?}",
            selection.candidates.len(),
            total_candidates,
            selection.stage
        );

        let mut results = rank(
            selection.candidates,
            request.max_rent_override,
            request.sort_key,
        );

        if let Some(limit) = request.limit {
            results.truncate(limit);
        }

        SearchResult {
            results,
            total_candidates,
            stage: selection.stage,
        }
    }

    /// Score a single property for a tenant, as shown on its detail view
    ///
    /// Mirrors the browse-mode rule: no preferences means distance 0, score 0.
    pub fn score_one(
        &self,
        property: Property,
        preferences: Option<&PreferenceVector>,
    ) -> ScoredCandidate {
        match preferences {
            Some(preferences) => ScoredCandidate {
                distance_km: distance_km(preferences.origin, property.location),
                match_score: calculate_match_score(&property, preferences),
                property,
            },
            None => ScoredCandidate {
                property,
                distance_km: 0.0,
                match_score: 0,
            },
        }
    }
}
