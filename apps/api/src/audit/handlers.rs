//! Axum route handlers for the citation audit.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audit::directories::{Directory, CITATION_DIRECTORIES};
use crate::audit::engine::{self, AuditSummary};
use crate::audit::scoring::{audit_score, recommendations, Recommendation};
use crate::errors::AppError;
use crate::locations::{find_owned, UserIdQuery};
use crate::models::citation::{CitationRow, CitationStatus};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct CitationListResponse {
    pub citations: Vec<CitationRow>,
    pub summary: AuditSummary,
    pub score: u32,
    pub directories: Vec<Directory>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCitationRequest {
    pub user_id: Uuid,
    pub status: String,
    pub nap_consistent: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct UpdateCitationResponse {
    pub message: String,
    pub citation: CitationRow,
}

#[derive(Debug, Serialize)]
pub struct AuditSummaryResponse {
    pub summary: AuditSummary,
    pub score: u32,
    pub missing_priority: Vec<CitationRow>,
    pub recommendations: Vec<Recommendation>,
}

#[derive(Debug, Deserialize)]
pub struct InitializeRequest {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct InitializeResponse {
    pub message: String,
    pub citations: Vec<CitationRow>,
    pub total: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/locations/:id/citations
pub async fn handle_get_citations(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<CitationListResponse>, AppError> {
    find_owned(&state.db, location_id, params.user_id).await?;

    let citations = engine::find_by_location(&state.db, location_id).await?;
    let summary = engine::summarize(&state.db, location_id).await?;
    let score = audit_score(&summary);

    Ok(Json(CitationListResponse {
        citations,
        summary,
        score,
        directories: CITATION_DIRECTORIES.to_vec(),
    }))
}

/// PUT /api/locations/:id/citations/:citation_id
pub async fn handle_update_citation(
    State(state): State<AppState>,
    Path((location_id, citation_id)): Path<(Uuid, Uuid)>,
    Json(request): Json<UpdateCitationRequest>,
) -> Result<Json<UpdateCitationResponse>, AppError> {
    let location = find_owned(&state.db, location_id, request.user_id).await?;

    let status = CitationStatus::parse(&request.status).ok_or_else(|| {
        AppError::Validation(format!(
            "Invalid status '{}': must be one of unchecked, found, missing, pending",
            request.status
        ))
    })?;

    let citation = engine::find_by_id(&state.db, citation_id).await?;
    if citation.location_id != location.id {
        return Err(AppError::Forbidden);
    }

    let citation =
        engine::update_status(&state.db, citation_id, status, request.nap_consistent).await?;

    Ok(Json(UpdateCitationResponse {
        message: "Citation updated".to_string(),
        citation,
    }))
}

/// GET /api/locations/:id/audit-summary
pub async fn handle_audit_summary(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<AuditSummaryResponse>, AppError> {
    find_owned(&state.db, location_id, params.user_id).await?;

    let citations = engine::find_by_location(&state.db, location_id).await?;
    let summary = engine::summarize(&state.db, location_id).await?;
    let score = audit_score(&summary);
    let recommendations = recommendations(&summary, &citations);

    let missing_priority: Vec<CitationRow> = citations
        .iter()
        .filter(|c| c.status == "missing")
        .take(5)
        .cloned()
        .collect();

    Ok(Json(AuditSummaryResponse {
        summary,
        score,
        missing_priority,
        recommendations,
    }))
}

/// POST /api/locations/:id/citations/initialize
///
/// Idempotent — safe to call again after location creation already seeded the
/// checklist.
pub async fn handle_initialize_citations(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(request): Json<InitializeRequest>,
) -> Result<Json<InitializeResponse>, AppError> {
    find_owned(&state.db, location_id, request.user_id).await?;

    let citations = engine::initialize(&state.db, location_id).await?;

    Ok(Json(InitializeResponse {
        message: "Citations initialized".to_string(),
        total: citations.len(),
        citations,
    }))
}
