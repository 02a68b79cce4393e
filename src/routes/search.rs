use actix_web::{web, HttpResponse, Responder};
use validator::Validate;
use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::{
    CacheHealth, ErrorResponse, HealthResponse, PropertyCard, PropertyScoreResponse, ScorePropertyRequest,
    SearchPropertiesRequest, SearchPropertiesResponse, SearchRequest,
};
use crate::services::{BackendClient, BackendError, PoolCache};
use std::sync::Arc;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<BackendClient>,
    pub cache: Arc<PoolCache>,
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all search-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/properties/search", web::post().to(search_properties))
        .route("/properties/score", web::post().to(score_property));
}

fn validation_error(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: "Validation failed".to_string(),
        message,
        status_code: 400,
    })
}

fn backend_error(context: &str, e: &BackendError) -> HttpResponse {
    match e {
        BackendError::NotFound(_) => HttpResponse::NotFound().json(ErrorResponse {
            error: context.to_string(),
            message: e.to_string(),
            status_code: 404,
        }),
        _ => HttpResponse::InternalServerError().json(ErrorResponse {
            error: context.to_string(),
            message: e.to_string(),
            status_code: 500,
        }),
    }
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let backend_healthy = state.backend.health_check().await.unwrap_or(false);

    let status = if backend_healthy { "healthy" } else { "degraded" };
    let stats = state.cache.stats().await;

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        cache: CacheHealth {
            entries: stats.entries,
            ttl_secs: stats.ttl_secs,
        },
    })
}

/// Search properties endpoint
///
/// POST /api/v1/properties/search
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "maxRent": "40000",
///   "sortBy": "match|rent|distance",
///   "limit": 20
/// }
/// ```
async fn search_properties(
    state: web::Data<AppState>,
    req: web::Json<SearchPropertiesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for search request: field_errors={:?}", errors);
        return validation_error(errors.to_string());
    }

    let max_rent_override = match req.rent_ceiling() {
        Ok(ceiling) => ceiling,
        Err(e) => return validation_error(e.to_string()),
    };

    let user_id = &req.user_id;
    let limit = state.matching.effective_limit(req.limit);

    tracing::info!(
        "Searching properties for user: {}, sort: {:?}, limit: {:?}",
        user_id,
        req.sort_by,
        limit
    );

    // Absence of preferences is a normal state, not an error
    let preferences = match state.backend.get_preferences(user_id).await {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::error!("Failed to fetch preferences for {}: {}", user_id, e);
            return backend_error("Failed to fetch preferences", &e);
        }
    };

    let backend = state.backend.clone();
    let pool = match state
        .cache
        .get_or_load(|| async move { backend.list_available_properties().await })
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to list properties for {}: {}", user_id, e);
            return HttpResponse::InternalServerError().json(ErrorResponse {
                error: "Failed to list properties".to_string(),
                message: e.to_string(),
                status_code: 500,
            });
        }
    };

    let has_preferences = preferences.is_some();
    let request = SearchRequest {
        preferences,
        max_rent_override,
        sort_key: req.sort_by,
        limit,
    };

    let result = state.matcher.search((*pool).clone(), &request);

    let response = SearchPropertiesResponse {
        total_results: result.results.len(),
        properties: result.results.into_iter().map(PropertyCard::from).collect(),
        total_candidates: result.total_candidates,
        has_preferences,
        search_stage: result.stage.label().to_string(),
    };

    tracing::info!(
        "Returning {} properties for user {} (from {} candidates, stage {})",
        response.total_results,
        user_id,
        response.total_candidates,
        response.search_stage
    );

    HttpResponse::Ok().json(response)
}

/// Score a single property for a user
///
/// POST /api/v1/properties/score
///
/// Request body:
/// ```json
/// {
///   "userId": "string",
///   "propertyId": "uuid"
/// }
/// ```
async fn score_property(
    state: web::Data<AppState>,
    req: web::Json<ScorePropertyRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_error(errors.to_string());
    }

    let preferences = match state.backend.get_preferences(&req.user_id).await {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::error!("Failed to fetch preferences for {}: {}", req.user_id, e);
            return backend_error("Failed to fetch preferences", &e);
        }
    };

    let property = match state.backend.get_property(req.property_id).await {
        Ok(property) => property,
        Err(e) => {
            tracing::warn!("Failed to fetch property {}: {}", req.property_id, e);
            return backend_error("Failed to fetch property", &e);
        }
    };

    let scored = state.matcher.score_one(property, preferences.as_ref());

    HttpResponse::Ok().json(PropertyScoreResponse {
        property_id: scored.property.id,
        has_preferences: preferences.is_some(),
        distance_km: scored.distance_km,
        match_score: scored.match_score,
    })
}
