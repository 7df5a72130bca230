//! Citation audit scoring — pure functions over the audit summary.
//!
//! Presence across directories is weighted above listing accuracy:
//! score = (found/total)·100·0.6 + (consistent/found)·100·0.4, rounded.
//! Both divisions short-circuit to 0 instead of propagating NaN.

use serde::{Deserialize, Serialize};

use crate::audit::directories::priority_directory_names;
use crate::audit::engine::AuditSummary;
use crate::models::citation::CitationRow;

const FOUND_WEIGHT: f64 = 0.6;
const CONSISTENT_WEIGHT: f64 = 0.4;

/// Composite 0–100 audit health score.
pub fn audit_score(summary: &AuditSummary) -> u32 {
    if summary.total == 0 {
        return 0;
    }

    let found_score = (summary.found as f64 / summary.total as f64) * 100.0 * FOUND_WEIGHT;
    let consistent_score = if summary.found > 0 {
        (summary.consistent as f64 / summary.found as f64) * 100.0 * CONSISTENT_WEIGHT
    } else {
        0.0
    };

    (found_score + consistent_score).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    Critical,
    High,
    Medium,
}

/// One advisory entry derived from the audit state.
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub priority: RecommendationPriority,
    pub message: String,
    pub action: String,
}

/// Derives prioritized recommendations from the summary and citation rows.
/// Rules are independent declarative checks, emitted in fixed order —
/// several can fire for the same audit.
pub fn recommendations(
    summary: &AuditSummary,
    citations: &[CitationRow],
) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if summary.missing > 0 {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::High,
            message: format!(
                "You're missing from {} directories. Add your business to increase visibility.",
                summary.missing
            ),
            action: "Add to missing directories".to_string(),
        });
    }

    if summary.found > 0 && summary.consistent < summary.found {
        let inconsistent = summary.found - summary.consistent;
        recommendations.push(Recommendation {
            priority: RecommendationPriority::High,
            message: format!(
                "{inconsistent} listings have inconsistent NAP data. This hurts your local SEO."
            ),
            action: "Fix NAP consistency".to_string(),
        });
    }

    if summary.unchecked > 0 {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Medium,
            message: format!(
                "{} directories haven't been checked. Review your presence.",
                summary.unchecked
            ),
            action: "Audit unchecked directories".to_string(),
        });
    }

    let priority_names = priority_directory_names();
    let missing_priority: Vec<&str> = citations
        .iter()
        .filter(|c| c.status == "missing" && priority_names.contains(&c.directory_name.as_str()))
        .map(|c| c.directory_name.as_str())
        .collect();

    if !missing_priority.is_empty() {
        recommendations.push(Recommendation {
            priority: RecommendationPriority::Critical,
            message: format!(
                "You're missing from key directories: {}",
                missing_priority.join(", ")
            ),
            action: "Add to priority directories immediately".to_string(),
        });
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_summary(total: i64, found: i64, missing: i64, unchecked: i64, consistent: i64) -> AuditSummary {
        AuditSummary {
            total,
            found,
            missing,
            unchecked,
            consistent,
        }
    }

    fn make_citation(directory_name: &str, status: &str) -> CitationRow {
        CitationRow {
            id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            directory_name: directory_name.to_string(),
            directory_url: None,
            status: status.to_string(),
            nap_consistent: false,
            last_checked: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_score_all_found_and_consistent_is_100() {
        assert_eq!(audit_score(&make_summary(10, 10, 0, 0, 10)), 100);
    }

    #[test]
    fn test_score_half_found_all_consistent_is_70() {
        // (5/10)*100*0.6 + (5/5)*100*0.4 = 30 + 40 = 70
        assert_eq!(audit_score(&make_summary(10, 5, 0, 5, 5)), 70);
    }

    #[test]
    fn test_score_all_found_none_consistent_is_60() {
        assert_eq!(audit_score(&make_summary(10, 10, 0, 0, 0)), 60);
    }

    #[test]
    fn test_score_empty_audit_is_0() {
        assert_eq!(audit_score(&make_summary(0, 0, 0, 0, 0)), 0);
    }

    #[test]
    fn test_score_zero_found_short_circuits_consistency_term() {
        // 15 directories, none found — consistency term must not divide by zero
        assert_eq!(audit_score(&make_summary(15, 0, 10, 5, 0)), 0);
    }

    #[test]
    fn test_score_mixed_audit_is_62() {
        // round(8/15*100*0.6 + 6/8*100*0.4) = round(32 + 30) = 62
        assert_eq!(audit_score(&make_summary(15, 8, 4, 3, 6)), 62);
    }

    #[test]
    fn test_recommendations_fire_independently() {
        let summary = make_summary(15, 8, 4, 3, 6);
        let recs = recommendations(&summary, &[]);

        assert_eq!(recs.len(), 3);
        assert_eq!(recs[0].priority, RecommendationPriority::High);
        assert!(recs[0].message.contains("missing from 4 directories"));
        assert_eq!(recs[1].priority, RecommendationPriority::High);
        assert!(recs[1].message.contains("2 listings have inconsistent NAP"));
        assert_eq!(recs[2].priority, RecommendationPriority::Medium);
        assert!(recs[2].message.contains("3 directories haven't been checked"));
    }

    #[test]
    fn test_missing_priority_directory_is_critical() {
        let summary = make_summary(15, 0, 2, 13, 0);
        let citations = vec![
            make_citation("Google Business Profile", "missing"),
            make_citation("Yelp", "missing"),
            make_citation("MapQuest", "found"),
        ];

        let recs = recommendations(&summary, &citations);
        let critical = recs
            .iter()
            .find(|r| r.priority == RecommendationPriority::Critical)
            .expect("critical recommendation must fire");
        assert!(critical.message.contains("Google Business Profile"));
        assert!(critical.message.contains("Yelp"));
    }

    #[test]
    fn test_missing_low_tier_directory_is_not_critical() {
        let summary = make_summary(15, 0, 1, 14, 0);
        let citations = vec![make_citation("Superpages", "missing")];

        let recs = recommendations(&summary, &citations);
        assert!(recs
            .iter()
            .all(|r| r.priority != RecommendationPriority::Critical));
    }

    #[test]
    fn test_clean_audit_yields_no_recommendations() {
        let summary = make_summary(15, 15, 0, 0, 15);
        assert!(recommendations(&summary, &[]).is_empty());
    }

    #[test]
    fn test_rule_order_is_stable() {
        let summary = make_summary(15, 8, 4, 3, 6);
        let citations = vec![make_citation("Apple Maps", "missing")];
        let recs = recommendations(&summary, &citations);

        assert_eq!(recs.len(), 4);
        // missing → NAP → unchecked → priority directories
        assert!(recs[0].action.contains("missing directories"));
        assert!(recs[1].action.contains("NAP"));
        assert!(recs[2].action.contains("unchecked"));
        assert_eq!(recs[3].priority, RecommendationPriority::Critical);
    }
}
