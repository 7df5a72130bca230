//! Axum route handlers for location CRUD.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::audit::engine;
use crate::errors::AppError;
use crate::landmarks::cache::{self, TypeCount};
use crate::locations::{find_owned, UserIdQuery};
use crate::models::landmark::LandmarkRow;
use crate::models::location::{LocationRow, LocationStats};
use crate::state::AppState;

const DEFAULT_RADIUS_MILES: f64 = 5.0;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub user_id: Uuid,
    pub business_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub service_type: String,
    pub keywords: Option<String>,
    pub radius_miles: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLocationRequest {
    pub user_id: Uuid,
    pub business_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub service_type: Option<String>,
    pub keywords: Option<String>,
    pub radius_miles: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct LocationWithStats {
    #[serde(flatten)]
    pub location: LocationRow,
    pub stats: LocationStats,
}

#[derive(Debug, Serialize)]
pub struct LocationListResponse {
    pub locations: Vec<LocationWithStats>,
}

#[derive(Debug, Serialize)]
pub struct CreateLocationResponse {
    pub message: String,
    pub location: LocationRow,
    pub next_step: String,
}

#[derive(Debug, Serialize)]
pub struct LandmarkSummary {
    pub items: Vec<LandmarkRow>,
    pub types: Vec<TypeCount>,
    pub cache_age_days: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct LocationDetailResponse {
    pub location: LocationRow,
    pub stats: LocationStats,
    pub landmarks: LandmarkSummary,
}

#[derive(Debug, Serialize)]
pub struct UpdateLocationResponse {
    pub message: String,
    pub location: LocationRow,
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

fn validate_radius(radius_miles: f64) -> Result<(), AppError> {
    if !(1.0..=50.0).contains(&radius_miles) {
        return Err(AppError::Validation(
            "Service radius must be between 1 and 50 miles".to_string(),
        ));
    }
    Ok(())
}

/// Validates and uppercases a 2-letter state code.
fn normalize_state(state: &str) -> Result<String, AppError> {
    let trimmed = state.trim();
    if trimmed.len() != 2 || !trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(AppError::Validation(
            "State required (2 letter code)".to_string(),
        ));
    }
    Ok(trimmed.to_uppercase())
}

fn require_field(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/locations
pub async fn handle_list_locations(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<LocationListResponse>, AppError> {
    let locations = sqlx::query_as::<_, LocationRow>(
        "SELECT * FROM locations WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(params.user_id)
    .fetch_all(&state.db)
    .await?;

    let mut with_stats = Vec::with_capacity(locations.len());
    for location in locations {
        let stats = location_stats(&state.db, location.id).await?;
        with_stats.push(LocationWithStats { location, stats });
    }

    Ok(Json(LocationListResponse {
        locations: with_stats,
    }))
}

/// POST /api/locations
pub async fn handle_create_location(
    State(state): State<AppState>,
    Json(request): Json<CreateLocationRequest>,
) -> Result<(StatusCode, Json<CreateLocationResponse>), AppError> {
    require_field(&request.business_name, "Business name required")?;
    require_field(&request.address, "Address required")?;
    require_field(&request.city, "City required")?;
    require_field(&request.zip_code, "ZIP code required")?;
    require_field(&request.service_type, "Service type required")?;
    let state_code = normalize_state(&request.state)?;
    let radius_miles = request.radius_miles.unwrap_or(DEFAULT_RADIUS_MILES);
    validate_radius(radius_miles)?;

    let location = sqlx::query_as::<_, LocationRow>(
        r#"
        INSERT INTO locations
            (id, user_id, business_name, address, city, state, zip_code,
             service_type, keywords, radius_miles)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(request.user_id)
    .bind(request.business_name.trim())
    .bind(request.address.trim())
    .bind(request.city.trim())
    .bind(&state_code)
    .bind(request.zip_code.trim())
    .bind(request.service_type.trim())
    .bind(&request.keywords)
    .bind(radius_miles)
    .fetch_one(&state.db)
    .await?;

    // Seed the citation checklist on creation; the endpoint stays available
    // for manual re-initialization.
    engine::initialize(&state.db, location.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreateLocationResponse {
            message: "Location created".to_string(),
            location,
            next_step: "Fetch landmarks to enable content generation".to_string(),
        }),
    ))
}

/// GET /api/locations/:id
pub async fn handle_get_location(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<LocationDetailResponse>, AppError> {
    let location = find_owned(&state.db, location_id, params.user_id).await?;

    let stats = location_stats(&state.db, location_id).await?;
    let items = cache::find_by_location(&state.db, location_id).await?;
    let types = cache::type_counts(&state.db, location_id).await?;
    let cache_age_days = cache::cache_age_days(&state.db, location_id).await?;

    Ok(Json(LocationDetailResponse {
        location,
        stats,
        landmarks: LandmarkSummary {
            items,
            types,
            cache_age_days,
        },
    }))
}

/// PUT /api/locations/:id
pub async fn handle_update_location(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Json(request): Json<UpdateLocationRequest>,
) -> Result<Json<UpdateLocationResponse>, AppError> {
    find_owned(&state.db, location_id, request.user_id).await?;

    let state_code = request.state.as_deref().map(normalize_state).transpose()?;
    if let Some(radius_miles) = request.radius_miles {
        validate_radius(radius_miles)?;
    }

    let location = sqlx::query_as::<_, LocationRow>(
        r#"
        UPDATE locations SET
            business_name = COALESCE($2, business_name),
            address = COALESCE($3, address),
            city = COALESCE($4, city),
            state = COALESCE($5, state),
            zip_code = COALESCE($6, zip_code),
            service_type = COALESCE($7, service_type),
            keywords = COALESCE($8, keywords),
            radius_miles = COALESCE($9, radius_miles),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(location_id)
    .bind(&request.business_name)
    .bind(&request.address)
    .bind(&request.city)
    .bind(&state_code)
    .bind(&request.zip_code)
    .bind(&request.service_type)
    .bind(&request.keywords)
    .bind(request.radius_miles)
    .fetch_one(&state.db)
    .await?;

    Ok(Json(UpdateLocationResponse {
        message: "Location updated".to_string(),
        location,
    }))
}

/// DELETE /api/locations/:id
///
/// Cascades landmarks, content, reviews, and citations at the schema level.
pub async fn handle_delete_location(
    State(state): State<AppState>,
    Path(location_id): Path<Uuid>,
    Query(params): Query<UserIdQuery>,
) -> Result<Json<serde_json::Value>, AppError> {
    find_owned(&state.db, location_id, params.user_id).await?;

    sqlx::query("DELETE FROM locations WHERE id = $1")
        .bind(location_id)
        .execute(&state.db)
        .await?;

    Ok(Json(serde_json::json!({ "message": "Location deleted" })))
}

async fn location_stats(pool: &PgPool, location_id: Uuid) -> Result<LocationStats, AppError> {
    let landmark_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM landmarks WHERE location_id = $1")
            .bind(location_id)
            .fetch_one(pool)
            .await?;
    let content_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM content WHERE location_id = $1")
            .bind(location_id)
            .fetch_one(pool)
            .await?;
    let review_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM reviews WHERE location_id = $1")
            .bind(location_id)
            .fetch_one(pool)
            .await?;

    Ok(LocationStats {
        landmark_count,
        content_count,
        review_count,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radius_bounds_are_inclusive() {
        assert!(validate_radius(1.0).is_ok());
        assert!(validate_radius(50.0).is_ok());
        assert!(validate_radius(5.0).is_ok());
    }

    #[test]
    fn test_radius_outside_bounds_rejected() {
        assert!(validate_radius(0.5).is_err());
        assert!(validate_radius(50.1).is_err());
        assert!(validate_radius(-3.0).is_err());
    }

    #[test]
    fn test_state_code_uppercased() {
        assert_eq!(normalize_state("tx").unwrap(), "TX");
        assert_eq!(normalize_state(" ca ").unwrap(), "CA");
    }

    #[test]
    fn test_state_code_rejects_full_names_and_digits() {
        assert!(normalize_state("Texas").is_err());
        assert!(normalize_state("T1").is_err());
        assert!(normalize_state("").is_err());
    }

    #[test]
    fn test_require_field_rejects_blank() {
        assert!(require_field("  ", "Business name required").is_err());
        assert!(require_field("Austin Plumbing", "Business name required").is_ok());
    }
}
