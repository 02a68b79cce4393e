use crate::core::{
    distance::distance_km,
    filters::{is_listable, within_radius},
    scoring::calculate_match_score,
};
use crate::models::{PreferenceVector, Property, RadiusPolicy, ScoredCandidate, SelectionStage};

/// Candidates chosen for one search and the widening stage that produced them
#[derive(Debug)]
pub struct Selection {
    pub candidates: Vec<ScoredCandidate>,
    pub stage: SelectionStage,
}

/// Narrows an available-property pool to the candidates near a tenant
///
/// # Widening chain
/// 1. Preferred radius (policy default when unset or non-positive)
/// 2. Each fallback radius in order
/// 3. The whole pool, unfiltered
///
/// The first non-empty step wins. A non-empty pool never yields an empty
/// selection.
#[derive(Debug, Clone, Default)]
pub struct CandidateSelector {
    policy: RadiusPolicy,
}

impl CandidateSelector {
    pub fn new(policy: RadiusPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RadiusPolicy {
        &self.policy
    }

    /// Select candidates from `pool` for a tenant with optional `preferences`
    ///
    /// Without preferences there is no reference point, so every listable
    /// property comes back in pool order with distance 0 and score 0.
    pub fn select(&self, pool: Vec<Property>, preferences: Option<&PreferenceVector>) -> Selection {
        let listable = pool.into_iter().filter(is_listable);

        let Some(preferences) = preferences else {
            return Selection {
                candidates: listable
                    .map(|property| ScoredCandidate {
                        property,
                        distance_km: 0.0,
                        match_score: 0,
                    })
                    .collect(),
                stage: SelectionStage::Browse,
            };
        };

        // Annotate the full pool before any radius is applied
        let annotated: Vec<ScoredCandidate> = listable
            .map(|property| ScoredCandidate {
                distance_km: distance_km(preferences.origin, property.location),
                match_score: calculate_match_score(&property, preferences),
                property,
            })
            .collect();

        let preferred = self.policy.initial_radius(preferences);
        let steps = std::iter::once((preferred, SelectionStage::Preferred(preferred))).chain(
            self.policy
                .fallback_radii_km
                .iter()
                .map(|&radius| (radius, SelectionStage::Widened(radius))),
        );

        for (radius, stage) in steps {
            if annotated.iter().any(|c| within_radius(c, radius)) {
                let candidates = annotated
                    .into_iter()
                    .filter(|c| within_radius(c, radius))
                    .collect();
                return Selection { candidates, stage };
            }
            tracing::trace!("No candidates within {} km, widening", radius);
        }

        Selection {
            candidates: annotated,
            stage: SelectionStage::Unfiltered,
        }
    }
}
