use crate::models::{Property, ScoredCandidate};

/// Check if a property can be offered to tenants at all
///
/// Listings marked unavailable never reach a result list, whatever the
/// radius or fallback stage.
#[inline]
pub fn is_listable(property: &Property) -> bool {
    property.is_available
}

/// Check if a scored candidate lies within `radius_km` of the search origin
#[inline]
pub fn within_radius(candidate: &ScoredCandidate, radius_km: f64) -> bool {
    candidate.distance_km <= radius_km
}

/// Check if a candidate's rent is at or below the caller's ceiling
///
/// A missing ceiling lets every candidate through.
#[inline]
pub fn within_rent_ceiling(candidate: &ScoredCandidate, ceiling: Option<f64>) -> bool {
    match ceiling {
        Some(max_rent) => candidate.property.rent_amount <= max_rent,
        None => true,
    }
}
