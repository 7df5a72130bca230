use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered business location. Coordinates stay NULL until the first
/// landmark refresh geocodes the address.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LocationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub service_type: String,
    pub keywords: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub radius_miles: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LocationRow {
    /// Splits the free-text keyword field into trimmed, non-empty keywords.
    pub fn keyword_list(&self) -> Vec<String> {
        self.keywords
            .as_deref()
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Per-location counts shown on the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct LocationStats {
    pub landmark_count: i64,
    pub content_count: i64,
    pub review_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_location(keywords: Option<&str>) -> LocationRow {
        LocationRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            business_name: "Austin Plumbing Co".to_string(),
            address: "123 Main St".to_string(),
            city: "Austin".to_string(),
            state: "TX".to_string(),
            zip_code: "78701".to_string(),
            service_type: "Plumber".to_string(),
            keywords: keywords.map(str::to_string),
            latitude: None,
            longitude: None,
            radius_miles: 5.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_keyword_list_splits_and_trims() {
        let location = make_location(Some("emergency plumber, water heater , drain cleaning"));
        assert_eq!(
            location.keyword_list(),
            vec!["emergency plumber", "water heater", "drain cleaning"]
        );
    }

    #[test]
    fn test_keyword_list_empty_when_absent() {
        assert!(make_location(None).keyword_list().is_empty());
    }

    #[test]
    fn test_keyword_list_drops_empty_segments() {
        let location = make_location(Some("plumber,, ,"));
        assert_eq!(location.keyword_list(), vec!["plumber"]);
    }
}
