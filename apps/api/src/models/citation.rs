use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One presence-check entry per (location, directory) pair.
///
/// `nap_consistent` is stored independently of `status` — callers are expected
/// to set it meaningfully when status is `found`, but the engine does not
/// enforce that coupling.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CitationRow {
    pub id: Uuid,
    pub location_id: Uuid,
    pub directory_name: String,
    pub directory_url: Option<String>,
    pub status: String,
    pub nap_consistent: bool,
    pub last_checked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Citation audit status. All transitions are caller-driven; any state may
/// move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitationStatus {
    Unchecked,
    Found,
    Missing,
    Pending,
}

impl CitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CitationStatus::Unchecked => "unchecked",
            CitationStatus::Found => "found",
            CitationStatus::Missing => "missing",
            CitationStatus::Pending => "pending",
        }
    }

    /// Parses a stored/submitted status string. Anything outside the four
    /// valid values is an input-validation failure, not a system fault.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "unchecked" => Some(CitationStatus::Unchecked),
            "found" => Some(CitationStatus::Found),
            "missing" => Some(CitationStatus::Missing),
            "pending" => Some(CitationStatus::Pending),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_all_valid_statuses() {
        for status in ["unchecked", "found", "missing", "pending"] {
            let parsed = CitationStatus::parse(status).expect("valid status must parse");
            assert_eq!(parsed.as_str(), status);
        }
    }

    #[test]
    fn test_parse_rejects_unknown_status() {
        assert!(CitationStatus::parse("verified").is_none());
        assert!(CitationStatus::parse("").is_none());
        assert!(CitationStatus::parse("FOUND").is_none());
    }
}
