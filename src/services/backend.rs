use crate::models::{
    FurnishedStatus, GeoPoint, PreferenceVector, Property, TenantType, WaterFacility,
};
use reqwest::Client;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when interacting with the managed backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Table names in the backend schema
#[derive(Debug, Clone)]
pub struct BackendTables {
    pub properties: String,
    pub preferences: String,
    pub image_bucket: String,
}

/// REST client for the managed Postgres backend (PostgREST dialect)
///
/// Handles the reads the search flow needs:
/// - Fetching a tenant's saved preferences
/// - Listing available properties, newest first
/// - Fetching a single property
pub struct BackendClient {
    base_url: String,
    api_key: String,
    client: Client,
    tables: BackendTables,
}

impl BackendClient {
    /// Create a new backend client
    pub fn new(
        base_url: String,
        api_key: String,
        tables: BackendTables,
        timeout: Duration,
    ) -> Result<Self, BackendError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            client,
            tables,
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// Public URL of an object in the image bucket
    fn public_image_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url,
            self.tables.image_bucket,
            path.trim_start_matches('/')
        )
    }

    async fn get_rows(&self, url: &str) -> Result<Vec<Value>, BackendError> {
        let response = self
            .client
            .get(url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(BackendError::Unauthorized);
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read body".to_string());
            tracing::error!("Backend request to {} failed: {} - {}", url, status, body);
            return Err(BackendError::ApiError(format!("{}: {}", status, body)));
        }

        let json: Value = response.json().await?;
        match json {
            Value::Array(rows) => Ok(rows),
            other => Err(BackendError::InvalidResponse(format!(
                "Expected array of rows, got {}",
                other
            ))),
        }
    }

    /// Fetch the saved preferences for a user
    ///
    /// A user who never saved preferences yields `Ok(None)`.
    pub async fn get_preferences(
        &self,
        user_id: &str,
    ) -> Result<Option<PreferenceVector>, BackendError> {
        let url = format!(
            "{}?user_id=eq.{}&select=*&limit=1",
            self.table_url(&self.tables.preferences),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching preferences for user: {}", user_id);

        let rows = self.get_rows(&url).await?;
        let Some(row) = rows.into_iter().next() else {
            return Ok(None);
        };

        let row: PreferenceRow = serde_json::from_value(row).map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse preferences: {}", e))
        })?;

        Ok(Some(row.into_preferences()))
    }

    /// List every property flagged available, newest first
    ///
    /// Rows that do not parse are skipped and logged rather than failing the
    /// whole listing.
    pub async fn list_available_properties(&self) -> Result<Vec<Property>, BackendError> {
        let url = format!(
            "{}?select=*,property_images(*)&is_available=eq.true&order=created_at.desc",
            self.table_url(&self.tables.properties)
        );

        let rows = self.get_rows(&url).await?;
        let total = rows.len();

        let properties: Vec<Property> = rows
            .into_iter()
            .filter_map(|row| match serde_json::from_value::<PropertyRow>(row) {
                Ok(row) => Some(self.to_property(row)),
                Err(e) => {
                    tracing::warn!("Skipping malformed property row: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Listed {} available properties ({} rows)", properties.len(), total);

        Ok(properties)
    }

    /// Get a single property by ID
    pub async fn get_property(&self, property_id: Uuid) -> Result<Property, BackendError> {
        let url = format!(
            "{}?id=eq.{}&select=*,property_images(*)&limit=1",
            self.table_url(&self.tables.properties),
            property_id
        );

        let rows = self.get_rows(&url).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or_else(|| BackendError::NotFound(format!("Property {} not found", property_id)))?;

        let row: PropertyRow = serde_json::from_value(row).map_err(|e| {
            BackendError::InvalidResponse(format!("Failed to parse property: {}", e))
        })?;

        Ok(self.to_property(row))
    }

    /// Check that the backend answers at all
    pub async fn health_check(&self) -> Result<bool, BackendError> {
        let url = format!(
            "{}?select=id&limit=1",
            self.table_url(&self.tables.properties)
        );

        let response = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        Ok(response.status().is_success())
    }

    fn to_property(&self, row: PropertyRow) -> Property {
        let mut images = row.property_images;
        images.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        Property {
            id: row.id,
            owner_id: row.owner_id,
            title: row.title,
            location: GeoPoint::new(row.latitude, row.longitude),
            rent_amount: row.rent_amount,
            rooms: row.rooms,
            bathrooms: row.bathrooms,
            furnished: row.furnished,
            water: row.water,
            wifi: row.wifi,
            parking: row.parking,
            preferred_tenant: row.preferred_tenant,
            is_available: row.is_available,
            image_paths: images
                .iter()
                .map(|img| self.public_image_url(&img.image_url))
                .collect(),
            created_at: row.created_at,
        }
    }
}

/// `properties` row as returned by the REST layer
#[derive(Debug, Deserialize)]
struct PropertyRow {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    #[serde(deserialize_with = "numeric")]
    latitude: f64,
    #[serde(deserialize_with = "numeric")]
    longitude: f64,
    #[serde(deserialize_with = "numeric")]
    rent_amount: f64,
    #[serde(default)]
    rooms: u32,
    #[serde(default)]
    bathrooms: u32,
    furnished: FurnishedStatus,
    water: WaterFacility,
    #[serde(default)]
    wifi: bool,
    #[serde(default)]
    parking: bool,
    preferred_tenant: TenantType,
    is_available: bool,
    #[serde(default)]
    property_images: Vec<ImageRow>,
    #[serde(default)]
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
struct ImageRow {
    image_url: String,
    #[serde(default)]
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// `tenant_preferences` row as returned by the REST layer
#[derive(Debug, Deserialize)]
struct PreferenceRow {
    #[serde(default, deserialize_with = "optional_numeric")]
    preferred_lat: Option<f64>,
    #[serde(default, deserialize_with = "optional_numeric")]
    preferred_lng: Option<f64>,
    #[serde(default, deserialize_with = "optional_numeric")]
    search_radius_km: Option<f64>,
    #[serde(default)]
    rooms: Option<u32>,
    #[serde(default)]
    furnished_pref: Option<FurnishedStatus>,
    #[serde(default)]
    water_req: Option<WaterFacility>,
    #[serde(default)]
    wifi_req: Option<bool>,
    #[serde(default)]
    parking_req: Option<bool>,
    #[serde(default, deserialize_with = "optional_numeric")]
    max_rent: Option<f64>,
    #[serde(default)]
    tenant_type: Option<TenantType>,
}

impl PreferenceRow {
    /// Zero rooms, zero rent and `any` tenant are stored by the form as
    /// "no preference".
    fn into_preferences(self) -> PreferenceVector {
        PreferenceVector {
            origin: GeoPoint::new(
                self.preferred_lat.unwrap_or(0.0),
                self.preferred_lng.unwrap_or(0.0),
            ),
            radius_km: self.search_radius_km.filter(|r| *r > 0.0),
            min_rooms: self.rooms.filter(|r| *r > 0),
            furnished: self.furnished_pref,
            water: self.water_req,
            wifi_required: self.wifi_req.unwrap_or(false),
            parking_required: self.parking_req.unwrap_or(false),
            max_rent: self.max_rent.filter(|r| *r > 0.0),
            tenant_type: self.tenant_type.filter(|t| *t != TenantType::Any),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

impl NumberOrString {
    fn into_f64<E: serde::de::Error>(self) -> Result<f64, E> {
        match self {
            NumberOrString::Number(n) => Ok(n),
            NumberOrString::Text(s) => s
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid numeric value {:?}", s))),
        }
    }
}

/// Postgres `numeric` columns may be serialized as strings
fn numeric<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    NumberOrString::deserialize(deserializer)?.into_f64()
}

fn optional_numeric<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    Option::<NumberOrString>::deserialize(deserializer)?
        .map(NumberOrString::into_f64)
        .transpose()
}
