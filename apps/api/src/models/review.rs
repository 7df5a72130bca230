use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A customer review captured for response generation.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ReviewRow {
    pub id: Uuid,
    pub location_id: Uuid,
    pub reviewer_name: Option<String>,
    pub rating: i32,
    pub review_text: String,
    pub response_text: Option<String>,
    pub responded_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Aggregate review counts for a location.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReviewStats {
    pub total: i64,
    pub avg_rating: Option<f64>,
    pub responded: i64,
    pub pending: i64,
}
