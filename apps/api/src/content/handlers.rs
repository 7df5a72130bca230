//! Axum route handlers for the content history.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::locations::{find_owned, UserIdQuery};
use crate::models::content::{ContentRow, ContentTypeCount, CONTENT_STATUSES};
use crate::state::AppState;

const DEFAULT_HISTORY_LIMIT: i64 = 50;
const DEFAULT_TYPED_HISTORY_LIMIT: i64 = 20;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ContentHistoryQuery {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ContentHistoryResponse {
    pub content: Vec<ContentRow>,
    pub stats: Vec<ContentTypeCount>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
pub struct ContentItemResponse {
    pub content: ContentRow,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContentStatusRequest {
    pub user_id: Uuid,
    pub status: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/locations/:id/content
pub async fn handle_content_history(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Query(params): Query<ContentHistoryQuery>,
) -> Result<Json<ContentHistoryResponse>, AppError> {
    find_owned(&state.db, location_id, params.user_id).await?;

    let content = match params.content_type.as_deref() {
        Some(content_type) => {
            let limit = params.limit.unwrap_or(DEFAULT_TYPED_HISTORY_LIMIT);
            sqlx::query_as::<_, ContentRow>(
                r#"
                SELECT * FROM content
                WHERE location_id = $1 AND content_type = $2
                ORDER BY created_at DESC
                LIMIT $3
                "#,
            )
            .bind(location_id)
            .bind(content_type)
            .bind(limit)
            .fetch_all(&state.db)
            .await?
        }
        None => {
            let limit = params.limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
            sqlx::query_as::<_, ContentRow>(
                "SELECT * FROM content WHERE location_id = $1 ORDER BY created_at DESC LIMIT $2",
            )
            .bind(location_id)
            .bind(limit)
            .fetch_all(&state.db)
            .await?
        }
    };

    let stats = sqlx::query_as::<_, ContentTypeCount>(
        r#"
        SELECT content_type, COUNT(*) AS count
        FROM content
        WHERE location_id = $1
        GROUP BY content_type
        "#,
    )
    .bind(location_id)
    .fetch_all(&state.db)
    .await?;

    Ok(Json(ContentHistoryResponse {
        total: content.len(),
        content,
        stats,
    }))
}

/// GET /api/content/:id
pub async fn handle_get_content(
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<ContentItemResponse>, AppError> {
    let content = find_owned_content(&state, content_id, params.user_id).await?;
    Ok(Json(ContentItemResponse { content }))
}

/// DELETE /api/content/:id
pub async fn handle_delete_content(
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    let content = find_owned_content(&state, content_id, params.user_id).await?;

    sqlx::query("DELETE FROM content WHERE id = $1")
        .bind(content.id)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Content deleted" })))
}

/// PATCH /api/content/:id/status
pub async fn handle_update_content_status(
    State(state): State<AppState>,
    Path(content_id): Path<Uuid>,
    Json(request): Json<UpdateContentStatusRequest>,
) -> Result<Json<ContentItemResponse>, AppError> {
    if !CONTENT_STATUSES.contains(&request.status.as_str()) {
        return Err(AppError::Validation(format!(
            "Invalid status '{}': must be one of {}",
            request.status,
            CONTENT_STATUSES.join(", ")
        )));
    }

    find_owned_content(&state, content_id, request.user_id).await?;

    let content = sqlx::query_as::<_, ContentRow>(
        "UPDATE content SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(&request.status)
    .bind(content_id)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(ContentItemResponse { content }))
}

/// Loads a content item and enforces ownership through its location.
async fn find_owned_content(
    state: &AppState,
    content_id: Uuid,
    user_id: Uuid,
) -> Result<ContentRow, AppError> {
    let content = sqlx::query_as::<_, ContentRow>("SELECT * FROM content WHERE id = $1")
        .bind(content_id)
        .fetch_optional(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Content {content_id} not found")))?;

    find_owned(&state.db, content.location_id, user_id).await?;

    Ok(content)
}
