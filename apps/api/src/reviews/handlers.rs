//! Axum route handlers for review management and response generation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::orchestrator::{generate_review_response, ReviewContext};
use crate::locations::{find_owned, UserIdQuery};
use crate::models::review::{ReviewRow, ReviewStats};
use crate::state::AppState;

const DEFAULT_TONE: &str = "professional";
const DEFAULT_LIST_LIMIT: i64 = 50;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ReviewListQuery {
    pub user_id: Uuid,
    pub pending: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewRow>,
    pub stats: ReviewStats,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    pub user_id: Uuid,
    pub reviewer_name: Option<String>,
    pub rating: i32,
    pub review_text: String,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub message: String,
    pub review: ReviewRow,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponseRequest {
    pub user_id: Uuid,
    pub tone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratedResponseBody {
    pub message: String,
    pub response: String,
    pub tokens_used: u32,
    pub review: ReviewRow,
}

#[derive(Debug, Deserialize)]
pub struct SaveResponseRequest {
    pub user_id: Uuid,
    pub response_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/locations/:id/reviews
pub async fn handle_get_reviews(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Query(params): Query<ReviewListQuery>,
) -> Result<Json<ReviewListResponse>, AppError> {
    find_owned(&state.db, location_id, params.user_id).await?;

    let reviews = if params.pending.unwrap_or(false) {
        sqlx::query_as::<_, ReviewRow>(
            r#"
            SELECT * FROM reviews
            WHERE location_id = $1 AND response_text IS NULL
            ORDER BY created_at DESC
            "#,
        )
        .bind(location_id)
        .fetch_all(&state.db)
        .await?
    } else {
        sqlx::query_as::<_, ReviewRow>(
            "SELECT * FROM reviews WHERE location_id = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(location_id)
        .bind(DEFAULT_LIST_LIMIT)
        .fetch_all(&state.db)
        .await?
    };

    let stats = sqlx::query_as::<_, ReviewStats>(
        r#"
        SELECT
            COUNT(*) AS total,
            AVG(rating)::double precision AS avg_rating,
            COUNT(*) FILTER (WHERE response_text IS NOT NULL) AS responded,
            COUNT(*) FILTER (WHERE response_text IS NULL) AS pending
        FROM reviews
        WHERE location_id = $1
        "#,
    )
    .bind(location_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(ReviewListResponse {
        total: reviews.len(),
        reviews,
        stats,
    }))
}

/// POST /api/locations/:id/reviews
pub async fn handle_add_review(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(request): Json<AddReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), AppError> {
    find_owned(&state.db, location_id, request.user_id).await?;

    if !(1..=5).contains(&request.rating) {
        return Err(AppError::Validation("Rating must be 1-5".to_string()));
    }
    if request.review_text.trim().is_empty() {
        return Err(AppError::Validation("Review text required".to_string()));
    }

    let review = sqlx::query_as::<_, ReviewRow>(
        r#"
        INSERT INTO reviews (id, location_id, reviewer_name, rating, review_text)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(location_id)
    .bind(&request.reviewer_name)
    .bind(request.rating)
    .bind(request.review_text.trim())
    .fetch_one(&state.db)
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReviewResponse {
            message: "Review added".to_string(),
            review,
        }),
    ))
}

/// POST /api/locations/:id/reviews/:review_id/generate-response
pub async fn handle_generate_response(
    State(state): State<AppState>,
    Path((location_id, review_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<GenerateResponseRequest>,
) -> Result<Json<GeneratedResponseBody>, AppError> {
    let location = find_owned(&state.db, location_id, request.user_id).await?;
    let review = find_location_review(&state.db, location_id, review_id).await?;

    let context = ReviewContext {
        reviewer_name: review.reviewer_name.as_deref(),
        rating: review.rating,
        review_text: &review.review_text,
        tone: request.tone.as_deref().unwrap_or(DEFAULT_TONE),
    };
    let generated = generate_review_response(&state.llm, &location, &context).await?;

    Ok(Json(GeneratedResponseBody {
        message: "Response generated".to_string(),
        response: generated.response_text,
        tokens_used: generated.tokens_used,
        review,
    }))
}

/// PUT /api/locations/:id/reviews/:review_id/response
pub async fn handle_save_response(
    State(state): State<AppState>,
    Path((location_id, review_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<SaveResponseRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    find_owned(&state.db, location_id, request.user_id).await?;
    find_location_review(&state.db, location_id, review_id).await?;

    if request.response_text.trim().is_empty() {
        return Err(AppError::Validation("Response text required".to_string()));
    }

    let review = sqlx::query_as::<_, ReviewRow>(
        r#"
        UPDATE reviews
        SET response_text = $1, responded_at = NOW()
        WHERE id = $2
        RETURNING *
        "#,
    )
    .bind(request.response_text.trim())
    .bind(review_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(ReviewResponse {
        message: "Response saved".to_string(),
        review,
    }))
}

/// DELETE /api/locations/:id/reviews/:review_id
pub async fn handle_delete_review(
    State(state): State<AppState>,
    Path((location_id, review_id)): Path<(Uuid, Uuid)>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    find_owned(&state.db, location_id, params.user_id).await?;
    find_location_review(&state.db, location_id, review_id).await?;

    sqlx::query("DELETE FROM reviews WHERE id = $1")
        .bind(review_id)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Review deleted" })))
}

/// Loads a review and checks it belongs to the given location.
async fn find_location_review(
    pool: &PgPool,
    location_id: Uuid,
    review_id: Uuid,
) -> Result<ReviewRow, AppError> {
    let review = sqlx::query_as::<_, ReviewRow>("SELECT * FROM reviews WHERE id = $1")
        .bind(review_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Review {review_id} not found")))?;

    if review.location_id != location_id {
        return Err(AppError::Forbidden);
    }

    Ok(review)
}
