use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fallback search radius when a tenant has not set a usable one
pub const DEFAULT_RADIUS_KM: f64 = 3.0;

/// Fixed widening step used when the preferred radius finds nothing
pub const FALLBACK_RADIUS_KM: f64 = 5.0;

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FurnishedStatus {
    Furnished,
    SemiFurnished,
    Unfurnished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaterFacility {
    #[serde(rename = "24hr")]
    AllDay,
    #[serde(rename = "limited")]
    Limited,
    #[serde(rename = "tanker")]
    Tanker,
}

/// Tenant category an owner prefers, or a tenant identifies as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantType {
    Family,
    Bachelor,
    Female,
    Married,
    Any,
}

/// Snapshot of a rental unit at query time
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(flatten)]
    pub location: GeoPoint,
    pub rent_amount: f64,
    pub rooms: u32,
    #[serde(default)]
    pub bathrooms: u32,
    pub furnished: FurnishedStatus,
    pub water: WaterFacility,
    pub wifi: bool,
    pub parking: bool,
    pub preferred_tenant: TenantType,
    pub is_available: bool,
    #[serde(default)]
    pub image_paths: Vec<String>,
    #[serde(default)]
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl Property {
    /// First uploaded image, used as the card cover
    pub fn cover_image(&self) -> Option<&str> {
        self.image_paths.first().map(String::as_str)
    }
}

/// A tenant's saved search criteria
///
/// Every criterion is optional. `None` (or `false` for the amenity flags)
/// means the tenant does not care and the field carries no scoring weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreferenceVector {
    pub origin: GeoPoint,
    #[serde(default)]
    pub radius_km: Option<f64>,
    #[serde(default)]
    pub min_rooms: Option<u32>,
    #[serde(default)]
    pub furnished: Option<FurnishedStatus>,
    #[serde(default)]
    pub water: Option<WaterFacility>,
    #[serde(default)]
    pub wifi_required: bool,
    #[serde(default)]
    pub parking_required: bool,
    #[serde(default)]
    pub max_rent: Option<f64>,
    #[serde(default)]
    pub tenant_type: Option<TenantType>,
}

impl PreferenceVector {
    /// Preferences anchored at `origin` with no criteria set
    pub fn at(origin: GeoPoint) -> Self {
        Self {
            origin,
            radius_km: None,
            min_rooms: None,
            furnished: None,
            water: None,
            wifi_required: false,
            parking_required: false,
            max_rent: None,
            tenant_type: None,
        }
    }
}

/// Property enriched with per-search derived fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub property: Property,
    pub distance_km: f64,
    pub match_score: u8,
}

/// Result ordering chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Best match first
    #[default]
    Match,
    /// Lowest rent first
    Rent,
    /// Nearest first
    Distance,
}

/// Parameters for one search invocation
#[derive(Debug, Clone, Default)]
pub struct SearchRequest {
    pub preferences: Option<PreferenceVector>,
    pub max_rent_override: Option<f64>,
    pub sort_key: SortKey,
    pub limit: Option<usize>,
}

/// Radius widening chain applied by the candidate selector
///
/// The preferred radius is tried first, then each fallback in order. If every
/// step comes back empty the unfiltered pool is returned.
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusPolicy {
    pub default_radius_km: f64,
    pub fallback_radii_km: Vec<f64>,
}

impl RadiusPolicy {
    /// Radius to try first for the given preferences.
    ///
    /// Unset and non-positive radii fall back to `default_radius_km`.
    pub fn initial_radius(&self, preferences: &PreferenceVector) -> f64 {
        match preferences.radius_km {
            Some(r) if r > 0.0 => r,
            _ => self.default_radius_km,
        }
    }
}

impl Default for RadiusPolicy {
    fn default() -> Self {
        Self {
            default_radius_km: DEFAULT_RADIUS_KM,
            fallback_radii_km: vec![FALLBACK_RADIUS_KM],
        }
    }
}

/// How far down the widening chain a selection had to go
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "radiusKm", rename_all = "camelCase")]
pub enum SelectionStage {
    /// No preferences, so no radius was applied
    Browse,
    /// Candidates found within the preferred radius
    Preferred(f64),
    /// Candidates found only after widening to this radius
    Widened(f64),
    /// Every radius was empty; the full pool was returned
    Unfiltered,
}

impl SelectionStage {
    pub fn label(&self) -> &'static str {
        match self {
            SelectionStage::Browse => "browse",
            SelectionStage::Preferred(_) => "preferred",
            SelectionStage::Widened(_) => "widened",
            SelectionStage::Unfiltered => "unfiltered",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enum_wire_names() {
        assert_eq!(serde_json::to_string(&WaterFacility::AllDay).unwrap(), "\"24hr\"");
        assert_eq!(
            serde_json::to_string(&FurnishedStatus::SemiFurnished).unwrap(),
            "\"semi-furnished\""
        );
        let tenant: TenantType = serde_json::from_str("\"married\"").unwrap();
        assert_eq!(tenant, TenantType::Married);
        let sort: SortKey = serde_json::from_str("\"distance\"").unwrap();
        assert_eq!(sort, SortKey::Distance);
    }

    #[test]
    fn test_initial_radius_defaults() {
        let policy = RadiusPolicy::default();
        let mut prefs = PreferenceVector::at(GeoPoint::new(27.7, 85.3));
        assert_eq!(policy.initial_radius(&prefs), 3.0);

        prefs.radius_km = Some(0.0);
        assert_eq!(policy.initial_radius(&prefs), 3.0);

        prefs.radius_km = Some(-2.0);
        assert_eq!(policy.initial_radius(&prefs), 3.0);

        prefs.radius_km = Some(7.5);
        assert_eq!(policy.initial_radius(&prefs), 7.5);
    }
}
