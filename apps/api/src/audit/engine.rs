//! Citation audit engine — row lifecycle for the per-location directory
//! checklist. Scoring and recommendations live in `audit::scoring`.

use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::audit::directories::{Directory, CITATION_DIRECTORIES};
use crate::errors::AppError;
use crate::models::citation::{CitationRow, CitationStatus};

/// Aggregate counts over a location's citation rows. `consistent` counts
/// nap_consistent=true rows regardless of status, matching the stored
/// semantics of the two independent fields.
#[derive(Debug, Clone, Copy, Serialize, sqlx::FromRow)]
pub struct AuditSummary {
    pub total: i64,
    pub found: i64,
    pub missing: i64,
    pub unchecked: i64,
    pub consistent: i64,
}

/// Seeds one unchecked citation row per catalog directory that does not
/// already have a row for this location. Idempotent — re-running never
/// duplicates existing rows.
pub async fn initialize(pool: &PgPool, location_id: Uuid) -> Result<Vec<CitationRow>, AppError> {
    let existing = find_by_location(pool, location_id).await?;
    let missing = missing_directories(&existing);

    for dir in &missing {
        sqlx::query(
            r#"
            INSERT INTO citations (id, location_id, directory_name, directory_url, status)
            VALUES ($1, $2, $3, $4, 'unchecked')
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(location_id)
        .bind(dir.name)
        .bind(dir.url)
        .execute(pool)
        .await?;
    }

    if !missing.is_empty() {
        info!(
            "Initialized {} citation rows for location {location_id}",
            missing.len()
        );
    }

    find_by_location(pool, location_id).await
}

/// Catalog entries with no citation row yet for this location. The guard that
/// makes initialization idempotent.
fn missing_directories(existing: &[CitationRow]) -> Vec<&'static Directory> {
    CITATION_DIRECTORIES
        .iter()
        .filter(|dir| !existing.iter().any(|c| c.directory_name == dir.name))
        .collect()
}

pub async fn find_by_location(
    pool: &PgPool,
    location_id: Uuid,
) -> Result<Vec<CitationRow>, AppError> {
    Ok(sqlx::query_as::<_, CitationRow>(
        "SELECT * FROM citations WHERE location_id = $1 ORDER BY directory_name",
    )
    .bind(location_id)
    .fetch_all(pool)
    .await?)
}

pub async fn find_by_id(pool: &PgPool, citation_id: Uuid) -> Result<CitationRow, AppError> {
    sqlx::query_as::<_, CitationRow>("SELECT * FROM citations WHERE id = $1")
        .bind(citation_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Citation {citation_id} not found")))
}

/// Applies a caller-driven status transition and stamps `last_checked`.
/// `nap_consistent` is stored as-is when provided, independent of status.
pub async fn update_status(
    pool: &PgPool,
    citation_id: Uuid,
    status: CitationStatus,
    nap_consistent: Option<bool>,
) -> Result<CitationRow, AppError> {
    match nap_consistent {
        Some(flag) => {
            sqlx::query(
                "UPDATE citations SET status = $1, nap_consistent = $2, last_checked = NOW() WHERE id = $3",
            )
            .bind(status.as_str())
            .bind(flag)
            .bind(citation_id)
            .execute(pool)
            .await?;
        }
        None => {
            sqlx::query("UPDATE citations SET status = $1, last_checked = NOW() WHERE id = $2")
                .bind(status.as_str())
                .bind(citation_id)
                .execute(pool)
                .await?;
        }
    }

    find_by_id(pool, citation_id).await
}

/// Aggregates the audit counts for a location in one pass.
pub async fn summarize(pool: &PgPool, location_id: Uuid) -> Result<AuditSummary, AppError> {
    Ok(sqlx::query_as::<_, AuditSummary>(
        r#"
        SELECT
            COUNT(*) AS total,
            COUNT(*) FILTER (WHERE status = 'found') AS found,
            COUNT(*) FILTER (WHERE status = 'missing') AS missing,
            COUNT(*) FILTER (WHERE status = 'unchecked') AS unchecked,
            COUNT(*) FILTER (WHERE nap_consistent) AS consistent
        FROM citations
        WHERE location_id = $1
        "#,
    )
    .bind(location_id)
    .fetch_one(pool)
    .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_citation(directory_name: &str) -> CitationRow {
        CitationRow {
            id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            directory_name: directory_name.to_string(),
            directory_url: None,
            status: "unchecked".to_string(),
            nap_consistent: false,
            last_checked: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_missing_directories_for_fresh_location_is_full_catalog() {
        assert_eq!(missing_directories(&[]).len(), CITATION_DIRECTORIES.len());
    }

    #[test]
    fn test_missing_directories_after_full_init_is_empty() {
        let existing: Vec<CitationRow> = CITATION_DIRECTORIES
            .iter()
            .map(|d| make_citation(d.name))
            .collect();
        assert!(missing_directories(&existing).is_empty());
    }

    #[test]
    fn test_missing_directories_skips_only_present_rows() {
        let existing = vec![make_citation("Yelp"), make_citation("BBB")];
        let missing = missing_directories(&existing);

        assert_eq!(missing.len(), CITATION_DIRECTORIES.len() - 2);
        assert!(missing.iter().all(|d| d.name != "Yelp" && d.name != "BBB"));
    }
}
