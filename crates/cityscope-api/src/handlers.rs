//! HTTP handlers: thin adapters from query parameters to the resolver and
//! the freshness engine. No business logic lives here.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use cityscope_core::{Category, CategoryRecord, Location};

use crate::{ApiError, AppState};

/// The `data` query parameter every route takes.
#[derive(Debug, Deserialize)]
pub struct RawDataQuery {
    pub data: String,
}

/// Category routes carry the location id as a JSON object in `data`.
///
/// Clients historically also sent latitude/longitude/search_query; those are
/// ignored and the location is re-read by id, so category rows always
/// reference a row that actually exists.
#[derive(Debug, Deserialize)]
pub struct CategoryQuery {
    pub id: i64,
}

/// Resolve a free-text place query to a location.
///
/// # Returns
/// - 200 OK with the Location (cached or freshly geocoded)
/// - 404 Not Found if the geocoder has zero matches
/// - 400 Bad Request if the query is blank
pub async fn get_location(
    State(state): State<AppState>,
    Query(query): Query<RawDataQuery>,
) -> Result<Json<Location>, ApiError> {
    let location = state.resolver.resolve(&query.data).await?;
    Ok(Json(location))
}

/// Weather for a resolved location.
pub async fn get_weather(
    State(state): State<AppState>,
    Query(query): Query<RawDataQuery>,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    category_lookup(&state, Category::Weather, &query.data).await
}

/// Events for a resolved location.
pub async fn get_events(
    State(state): State<AppState>,
    Query(query): Query<RawDataQuery>,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    category_lookup(&state, Category::Events, &query.data).await
}

/// Movies for a resolved location.
pub async fn get_movies(
    State(state): State<AppState>,
    Query(query): Query<RawDataQuery>,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    category_lookup(&state, Category::Movies, &query.data).await
}

async fn category_lookup(
    state: &AppState,
    category: Category,
    data: &str,
) -> Result<Json<Vec<CategoryRecord>>, ApiError> {
    let query: CategoryQuery = serde_json::from_str(data)
        .map_err(|e| ApiError::BadRequest(format!("invalid data parameter: {}", e)))?;

    let location = state
        .locations
        .find_by_id(query.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("location {} not found", query.id)))?;

    let records = state.cache.get(category, &location).await?;
    Ok(Json(records))
}

/// Liveness probe.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
