use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;
use validator::Validate;

use crate::models::domain::SortKey;

/// Errors raised while interpreting runtime search controls
#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("maxRent must be a non-negative number, got {0:?}")]
    InvalidRentCeiling(String),
}

/// Request to search available properties
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchPropertiesRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    /// Free-text rent ceiling as typed into the search box
    #[serde(default)]
    #[serde(alias = "max_rent", rename = "maxRent")]
    pub max_rent: Option<String>,
    #[serde(default)]
    #[serde(alias = "sort_by", rename = "sortBy")]
    pub sort_by: SortKey,
    #[validate(range(min = 1))]
    #[serde(default)]
    pub limit: Option<u16>,
}

impl SearchPropertiesRequest {
    pub fn rent_ceiling(&self) -> Result<Option<f64>, RequestError> {
        parse_rent_ceiling(self.max_rent.as_deref().unwrap_or(""))
    }
}

/// Request for one property's match against a user's preferences
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ScorePropertyRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "user_id", rename = "userId")]
    pub user_id: String,
    #[serde(alias = "property_id", rename = "propertyId")]
    pub property_id: Uuid,
}

/// Parse the max-rent search box.
///
/// Blank input means no ceiling.
pub fn parse_rent_ceiling(raw: &str) -> Result<Option<f64>, RequestError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(Some(value)),
        _ => Err(RequestError::InvalidRentCeiling(raw.to_string())),
    }
}
