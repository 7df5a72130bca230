use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Generated marketing copy persisted per location.
/// `landmarks_used` is a JSON array of landmark names fed into the prompt.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ContentRow {
    pub id: Uuid,
    pub location_id: Uuid,
    pub content_type: String,
    pub title: Option<String>,
    pub body: String,
    pub landmarks_used: Option<Value>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Valid lifecycle states for a content item.
pub const CONTENT_STATUSES: &[&str] = &["draft", "posted", "scheduled", "archived"];

/// Per-type counts for the content history view.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ContentTypeCount {
    pub content_type: String,
    pub count: i64,
}
