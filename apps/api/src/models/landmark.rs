use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A cached point of interest near a location. The full set for a location is
/// replaced wholesale on each refresh; `place_id` is unique within that set.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LandmarkRow {
    pub id: Uuid,
    pub location_id: Uuid,
    pub place_id: String,
    pub name: String,
    pub place_type: String,
    pub category: String,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<i32>,
    pub cached_at: DateTime<Utc>,
}
