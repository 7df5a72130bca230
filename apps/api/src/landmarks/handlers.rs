//! Axum route handlers for the landmark cache.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::landmarks::cache::{self, CategoryError, RefreshStats, TypeCount};
use crate::locations::{find_owned, UserIdQuery};
use crate::models::landmark::LandmarkRow;
use crate::models::location::LocationRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LandmarkListResponse {
    pub landmarks: Vec<LandmarkRow>,
    pub types: Vec<TypeCount>,
    pub cache_age_days: Option<i64>,
    pub total: usize,
}

/// GET /api/locations/:id/landmarks
pub async fn handle_get_landmarks(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<LandmarkListResponse>, AppError> {
    find_owned(&state.db, location_id, params.user_id).await?;

    let landmarks = cache::find_by_location(&state.db, location_id).await?;
    let types = cache::type_counts(&state.db, location_id).await?;
    let cache_age_days = cache::cache_age_days(&state.db, location_id).await?;

    Ok(Json(LandmarkListResponse {
        total: landmarks.len(),
        landmarks,
        types,
        cache_age_days,
    }))
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub message: String,
    pub location: LocationRow,
    pub landmarks: Vec<LandmarkRow>,
    pub stats: RefreshStats,
    pub errors: Vec<CategoryError>,
}

/// POST /api/locations/:id/refresh-landmarks
///
/// Partial failures still return 200 with whatever succeeded plus the per-type
/// error list, so the caller can retry just the failed categories.
pub async fn handle_refresh_landmarks(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    find_owned(&state.db, location_id, request.user_id).await?;

    let outcome =
        cache::refresh_landmarks(&state.db, state.places.as_ref(), location_id).await?;

    Ok(Json(RefreshResponse {
        message: "Landmarks refreshed".to_string(),
        location: outcome.location,
        landmarks: outcome.landmarks,
        stats: outcome.stats,
        errors: outcome.errors,
    }))
}
