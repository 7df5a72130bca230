//! Axum route handlers for content generation.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::orchestrator::{
    generate_gbp_post, generate_location_page, generate_social_posts,
};
use crate::locations::find_owned;
use crate::models::content::ContentRow;
use crate::state::AppState;

const DEFAULT_TONE: &str = "professional";
const DEFAULT_SOCIAL_POST_COUNT: u32 = 3;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GbpPostRequest {
    pub user_id: Uuid,
    pub tone: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LocationPageRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct SocialPostsRequest {
    pub user_id: Uuid,
    pub count: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentResponse {
    pub message: String,
    pub content: ContentRow,
    pub tokens_used: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/locations/:id/content/gbp-post
pub async fn handle_generate_gbp_post(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(request): Json<GbpPostRequest>,
) -> Result<(StatusCode, Json<GenerateContentResponse>), AppError> {
    let location = find_owned(&state.db, location_id, request.user_id).await?;
    let tone = request.tone.as_deref().unwrap_or(DEFAULT_TONE);

    let generated = generate_gbp_post(&state.db, &state.llm, &location, tone).await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateContentResponse {
            message: "GBP post generated".to_string(),
            content: generated.content,
            tokens_used: generated.tokens_used,
        }),
    ))
}

/// POST /api/locations/:id/content/location-page
pub async fn handle_generate_location_page(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(request): Json<LocationPageRequest>,
) -> Result<(StatusCode, Json<GenerateContentResponse>), AppError> {
    let location = find_owned(&state.db, location_id, request.user_id).await?;

    let generated = generate_location_page(&state.db, &state.llm, &location).await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateContentResponse {
            message: "Location page generated".to_string(),
            content: generated.content,
            tokens_used: generated.tokens_used,
        }),
    ))
}

/// POST /api/locations/:id/content/social-posts
pub async fn handle_generate_social_posts(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(request): Json<SocialPostsRequest>,
) -> Result<(StatusCode, Json<GenerateContentResponse>), AppError> {
    let location = find_owned(&state.db, location_id, request.user_id).await?;
    let count = request.count.unwrap_or(DEFAULT_SOCIAL_POST_COUNT);

    let generated = generate_social_posts(&state.db, &state.llm, &location, count).await?;

    Ok((
        StatusCode::CREATED,
        Json(GenerateContentResponse {
            message: "Social posts generated".to_string(),
            content: generated.content,
            tokens_used: generated.tokens_used,
        }),
    ))
}
