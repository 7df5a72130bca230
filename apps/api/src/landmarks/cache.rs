//! Landmark cache — keeps each location's point-of-interest cache
//! authoritative and fresh, and samples it for prompt construction.
//!
//! Flow: load location → geocode if coordinates missing → sequential
//! nearby-search per catalog entry (per-type failures collected, not fatal) →
//! dedupe by place id → atomic delete+insert swap of the cached set.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::landmarks::dedupe::{dedupe_by_place_id, group_by_type};
use crate::models::landmark::LandmarkRow;
use crate::models::location::LocationRow;
use crate::places::{Category, PlacesProvider, PLACE_TYPES};

pub const METERS_PER_MILE: f64 = 1609.34;

/// Fixed pause between category queries to respect provider rate limits.
const INTER_QUERY_DELAY: std::time::Duration = std::time::Duration::from_millis(100);

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// A landmark fetched from the places collaborator, tagged with its catalog
/// category, before it is persisted.
#[derive(Debug, Clone)]
pub struct LandmarkCandidate {
    pub place_id: String,
    pub name: String,
    pub place_type: String,
    pub category: Category,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i32>,
}

/// One failed category query. The refresh carries on past these.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryError {
    pub place_type: String,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshStats {
    pub total: usize,
    pub by_type: HashMap<String, usize>,
}

/// Everything a caller needs to decide whether to retry failed categories.
#[derive(Debug, Serialize)]
pub struct RefreshOutcome {
    pub location: LocationRow,
    pub landmarks: Vec<LandmarkRow>,
    pub stats: RefreshStats,
    pub errors: Vec<CategoryError>,
}

pub fn miles_to_meters(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

// ────────────────────────────────────────────────────────────────────────────
// Refresh pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Refreshes the landmark cache for a location.
///
/// Geocoding failure is fatal (no coordinates, no radius search) and leaves
/// the prior cache untouched. Individual category-query failures are collected
/// into the outcome's error list. The delete+insert swap runs in one
/// transaction so the location never ends up with a mixed or empty cache
/// after a partial failure.
pub async fn refresh_landmarks(
    pool: &PgPool,
    places: &dyn PlacesProvider,
    location_id: Uuid,
) -> Result<RefreshOutcome, AppError> {
    let location =
        sqlx::query_as::<_, LocationRow>("SELECT * FROM locations WHERE id = $1")
            .bind(location_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Location {location_id} not found")))?;

    // One-time enrichment: geocode only when coordinates are absent.
    let (latitude, longitude) = match (location.latitude, location.longitude) {
        (Some(lat), Some(lng)) => (lat, lng),
        _ => {
            let geocoded = places
                .geocode(
                    &location.address,
                    &location.city,
                    &location.state,
                    &location.zip_code,
                )
                .await
                .map_err(|e| AppError::Geocoding(e.to_string()))?;

            sqlx::query(
                "UPDATE locations SET latitude = $1, longitude = $2, updated_at = NOW() WHERE id = $3",
            )
            .bind(geocoded.latitude)
            .bind(geocoded.longitude)
            .bind(location_id)
            .execute(pool)
            .await?;

            info!(
                "Geocoded location {} to ({}, {})",
                location_id, geocoded.latitude, geocoded.longitude
            );
            (geocoded.latitude, geocoded.longitude)
        }
    };

    let radius_meters = miles_to_meters(location.radius_miles);

    // Sequential by design: category queries run in catalog order with a fixed
    // delay between them.
    let mut candidates = Vec::new();
    let mut errors = Vec::new();

    for query in PLACE_TYPES {
        match places
            .search_nearby(latitude, longitude, radius_meters, query.place_type)
            .await
        {
            Ok(found) => {
                candidates.extend(found.into_iter().map(|place| LandmarkCandidate {
                    place_id: place.place_id,
                    name: place.name,
                    place_type: query.place_type.to_string(),
                    category: query.category,
                    address: place.address,
                    latitude: place.latitude,
                    longitude: place.longitude,
                    rating: place.rating,
                    user_ratings_total: place.user_ratings_total,
                }));
            }
            Err(e) => {
                warn!("Nearby search for '{}' failed: {e}", query.place_type);
                errors.push(CategoryError {
                    place_type: query.place_type.to_string(),
                    error: e.to_string(),
                });
            }
        }

        tokio::time::sleep(INTER_QUERY_DELAY).await;
    }

    let unique = dedupe_by_place_id(candidates);
    let stats = RefreshStats {
        total: unique.len(),
        by_type: group_by_type(&unique),
    };

    replace_cache(pool, location_id, &unique).await?;

    let location =
        sqlx::query_as::<_, LocationRow>("SELECT * FROM locations WHERE id = $1")
            .bind(location_id)
            .fetch_one(pool)
            .await?;
    let landmarks = find_by_location(pool, location_id).await?;

    info!(
        "Cached {} landmarks for location {} ({} category errors)",
        landmarks.len(),
        location_id,
        errors.len()
    );

    Ok(RefreshOutcome {
        location,
        landmarks,
        stats,
        errors,
    })
}

/// Replaces the location's cached set wholesale. Runs in a transaction: if any
/// insert fails the delete rolls back and the prior generation survives.
async fn replace_cache(
    pool: &PgPool,
    location_id: Uuid,
    candidates: &[LandmarkCandidate],
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM landmarks WHERE location_id = $1")
        .bind(location_id)
        .execute(&mut *tx)
        .await?;

    let cached_at = Utc::now();
    for candidate in candidates {
        sqlx::query(
            r#"
            INSERT INTO landmarks
                (id, location_id, place_id, name, place_type, category,
                 address, latitude, longitude, rating, user_ratings_total, cached_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(location_id)
        .bind(&candidate.place_id)
        .bind(&candidate.name)
        .bind(&candidate.place_type)
        .bind(candidate.category.as_str())
        .bind(&candidate.address)
        .bind(candidate.latitude)
        .bind(candidate.longitude)
        .bind(candidate.rating)
        .bind(candidate.user_ratings_total)
        .bind(cached_at)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Cache queries
// ────────────────────────────────────────────────────────────────────────────

pub async fn find_by_location(
    pool: &PgPool,
    location_id: Uuid,
) -> Result<Vec<LandmarkRow>, AppError> {
    Ok(sqlx::query_as::<_, LandmarkRow>(
        "SELECT * FROM landmarks WHERE location_id = $1 ORDER BY place_type, name",
    )
    .bind(location_id)
    .fetch_all(pool)
    .await?)
}

/// Whole days since the OLDEST cached landmark — the age of the cache as a
/// whole, since replacement is all-or-nothing. `None` when nothing is cached.
pub async fn cache_age_days(pool: &PgPool, location_id: Uuid) -> Result<Option<i64>, AppError> {
    let oldest: Option<DateTime<Utc>> =
        sqlx::query_scalar("SELECT MIN(cached_at) FROM landmarks WHERE location_id = $1")
            .bind(location_id)
            .fetch_one(pool)
            .await?;

    Ok(oldest.map(|cached_at| (Utc::now() - cached_at).num_days()))
}

/// Returns up to `n` cached landmarks chosen uniformly at random without
/// replacement, optionally filtered to one place type. Callers must tolerate
/// fewer than `n` — including zero — when the cache is small or empty.
pub async fn sample(
    pool: &PgPool,
    location_id: Uuid,
    n: usize,
    filter_type: Option<&str>,
) -> Result<Vec<LandmarkRow>, AppError> {
    let cached = match filter_type {
        Some(place_type) => {
            sqlx::query_as::<_, LandmarkRow>(
                "SELECT * FROM landmarks WHERE location_id = $1 AND place_type = $2",
            )
            .bind(location_id)
            .bind(place_type)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, LandmarkRow>("SELECT * FROM landmarks WHERE location_id = $1")
                .bind(location_id)
                .fetch_all(pool)
                .await?
        }
    };

    Ok(sample_from(cached, n, &mut rand::thread_rng()))
}

/// Uniform sampling without replacement: shuffle, then keep the first `n`.
pub fn sample_from<T, R: Rng>(mut items: Vec<T>, n: usize, rng: &mut R) -> Vec<T> {
    items.shuffle(rng);
    items.truncate(n);
    items
}

/// Counts per place type, ordered by descending count.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct TypeCount {
    pub place_type: String,
    pub count: i64,
}

pub async fn type_counts(pool: &PgPool, location_id: Uuid) -> Result<Vec<TypeCount>, AppError> {
    Ok(sqlx::query_as::<_, TypeCount>(
        r#"
        SELECT place_type, COUNT(*) AS count
        FROM landmarks
        WHERE location_id = $1
        GROUP BY place_type
        ORDER BY count DESC
        "#,
    )
    .bind(location_id)
    .fetch_all(pool)
    .await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_five_miles_converts_to_expected_meters() {
        let meters = miles_to_meters(5.0);
        assert!((meters - 8046.7).abs() < 1e-9, "got {meters}");
    }

    #[test]
    fn test_one_mile_is_1609_34_meters() {
        assert_eq!(miles_to_meters(1.0), 1609.34);
    }

    #[test]
    fn test_sample_bounded_by_cache_size() {
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = sample_from(vec![1, 2, 3], 5, &mut rng);
        assert_eq!(sampled.len(), 3);
    }

    #[test]
    fn test_sample_returns_exactly_n_from_larger_cache() {
        let mut rng = StdRng::seed_from_u64(7);
        let sampled = sample_from((0..20).collect::<Vec<_>>(), 5, &mut rng);
        assert_eq!(sampled.len(), 5);
    }

    #[test]
    fn test_sample_has_no_repeats() {
        let mut rng = StdRng::seed_from_u64(42);
        let sampled = sample_from((0..50).collect::<Vec<_>>(), 25, &mut rng);
        let distinct: HashSet<i32> = sampled.iter().copied().collect();
        assert_eq!(distinct.len(), sampled.len());
    }

    #[test]
    fn test_sample_from_empty_cache_is_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        let sampled: Vec<i32> = sample_from(vec![], 5, &mut rng);
        assert!(sampled.is_empty());
    }

    #[test]
    fn test_sample_draws_only_cached_items() {
        let mut rng = StdRng::seed_from_u64(99);
        let cache: Vec<i32> = (100..110).collect();
        let sampled = sample_from(cache.clone(), 4, &mut rng);
        assert!(sampled.iter().all(|item| cache.contains(item)));
    }
}
