// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    FurnishedStatus, GeoPoint, PreferenceVector, Property, RadiusPolicy, ScoredCandidate,
    SearchRequest, SelectionStage, SortKey, TenantType, WaterFacility, DEFAULT_RADIUS_KM,
    FALLBACK_RADIUS_KM,
};
pub use requests::{parse_rent_ceiling, RequestError, ScorePropertyRequest, SearchPropertiesRequest};
pub use responses::{
    CacheHealth, ErrorResponse, HealthResponse, PropertyCard, PropertyScoreResponse, SearchPropertiesResponse,
};
