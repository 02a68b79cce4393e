//! Rental Match - property discovery and matching for a rental marketplace
//!
//! This library provides the search engine behind the tenant's "find
//! properties" view: radius selection with fallback widening, preference
//! scoring, and client-side ranking over a pool of available listings.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{Matcher, SearchResult, distance::{distance_km, haversine_distance}};
pub use models::{Property, PreferenceVector, ScoredCandidate, SearchRequest, SortKey, RadiusPolicy};
