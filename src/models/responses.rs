use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{FurnishedStatus, ScoredCandidate, TenantType, WaterFacility};

/// One entry in the search result list
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyCard {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub rent_amount: f64,
    pub rooms: u32,
    pub bathrooms: u32,
    pub wifi: bool,
    pub parking: bool,
    pub furnished: FurnishedStatus,
    pub water: WaterFacility,
    pub preferred_tenant: TenantType,
    pub distance_km: f64,
    pub match_score: u8,
    pub cover_image: Option<String>,
    pub detail_path: String,
    pub contact_path: String,
}

impl From<ScoredCandidate> for PropertyCard {
    fn from(candidate: ScoredCandidate) -> Self {
        let ScoredCandidate {
            property,
            distance_km,
            match_score,
        } = candidate;

        Self {
            detail_path: format!("/property/{}", property.id),
            contact_path: format!(
                "/messages?property={}&owner={}",
                property.id, property.owner_id
            ),
            cover_image: property.cover_image().map(str::to_string),
            id: property.id,
            owner_id: property.owner_id,
            title: property.title,
            rent_amount: property.rent_amount,
            rooms: property.rooms,
            bathrooms: property.bathrooms,
            wifi: property.wifi,
            parking: property.parking,
            furnished: property.furnished,
            water: property.water,
            preferred_tenant: property.preferred_tenant,
            distance_km,
            match_score,
        }
    }
}

/// Response for the property search endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchPropertiesResponse {
    pub properties: Vec<PropertyCard>,
    pub total_results: usize,
    pub total_candidates: usize,
    /// False when the user has no saved preferences and results are unranked
    pub has_preferences: bool,
    pub search_stage: String,
}

/// Response for the single-property score endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyScoreResponse {
    pub property_id: Uuid,
    pub has_preferences: bool,
    pub distance_km: f64,
    pub match_score: u8,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub cache: CacheHealth,
}

/// Pool cache occupancy as reported by the health endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHealth {
    pub entries: u64,
    pub ttl_secs: u64,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
