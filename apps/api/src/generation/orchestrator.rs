//! Content orchestration — combines location data with sampled landmarks into
//! generation requests and persists the results.
//!
//! Flow: sample landmarks → build prompt → LLM generate → INSERT into content.
//! Review responses skip landmarks and persistence: the caller saves the
//! response onto the review explicitly.

use chrono::Utc;
use serde_json::json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::prompts::{
    format_landmark_mentions, sentiment_for_rating, sentiment_instruction, GBP_POST_SYSTEM,
    GBP_POST_TEMPLATE, LOCATION_PAGE_SYSTEM, LOCATION_PAGE_TEMPLATE, REVIEW_RESPONSE_SYSTEM,
    REVIEW_RESPONSE_TEMPLATE, SOCIAL_POSTS_SYSTEM, SOCIAL_POSTS_TEMPLATE,
};
use crate::landmarks::cache;
use crate::llm_client::LlmClient;
use crate::models::content::ContentRow;
use crate::models::landmark::LandmarkRow;
use crate::models::location::LocationRow;

/// Landmark sample sizes per content type.
const GBP_POST_SAMPLE: usize = 5;
const LOCATION_PAGE_SAMPLE: usize = 8;
const SOCIAL_POSTS_SAMPLE: usize = 5;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct GeneratedContent {
    pub content: ContentRow,
    pub tokens_used: u32,
}

#[derive(Debug)]
pub struct GeneratedReviewResponse {
    pub response_text: String,
    pub tokens_used: u32,
}

/// Inputs for a review response, lifted off the stored review row.
pub struct ReviewContext<'a> {
    pub reviewer_name: Option<&'a str>,
    pub rating: i32,
    pub review_text: &'a str,
    pub tone: &'a str,
}

// ────────────────────────────────────────────────────────────────────────────
// Generation pipelines
// ────────────────────────────────────────────────────────────────────────────

/// Generates and persists a Google Business Profile post.
/// Requires at least one cached landmark — an empty cache is a validation
/// error instructing the caller to refresh first.
pub async fn generate_gbp_post(
    pool: &PgPool,
    llm: &LlmClient,
    location: &LocationRow,
    tone: &str,
) -> Result<GeneratedContent, AppError> {
    let landmarks = cache::sample(pool, location.id, GBP_POST_SAMPLE, None).await?;
    if landmarks.is_empty() {
        return Err(AppError::Validation(
            "No landmarks cached. Refresh landmarks before generating content.".to_string(),
        ));
    }

    let prompt = build_gbp_post_prompt(location, &landmarks, tone);
    let generated = llm
        .generate(GBP_POST_SYSTEM, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("GBP post generation failed: {e}")))?;

    let landmarks_used: Vec<String> = landmarks.iter().take(3).map(|l| l.name.clone()).collect();
    let title = format!("GBP Post - {}", Utc::now().format("%m/%d/%Y"));
    let content = insert_content(
        pool,
        location.id,
        "gbp_post",
        &title,
        &generated.text,
        &landmarks_used,
    )
    .await?;

    info!(
        "Generated GBP post {} for location {} ({} tokens)",
        content.id, location.id, generated.tokens_used
    );

    Ok(GeneratedContent {
        content,
        tokens_used: generated.tokens_used,
    })
}

/// Generates and persists an SEO location page.
pub async fn generate_location_page(
    pool: &PgPool,
    llm: &LlmClient,
    location: &LocationRow,
) -> Result<GeneratedContent, AppError> {
    let landmarks = cache::sample(pool, location.id, LOCATION_PAGE_SAMPLE, None).await?;
    if landmarks.is_empty() {
        return Err(AppError::Validation(
            "No landmarks cached. Refresh landmarks before generating content.".to_string(),
        ));
    }

    let prompt = build_location_page_prompt(location, &landmarks);
    let generated = llm
        .generate(LOCATION_PAGE_SYSTEM, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Location page generation failed: {e}")))?;

    let landmarks_used: Vec<String> = landmarks.iter().map(|l| l.name.clone()).collect();
    let title = format!(
        "{} in {}, {}",
        location.service_type, location.city, location.state
    );
    let content = insert_content(
        pool,
        location.id,
        "location_page",
        &title,
        &generated.text,
        &landmarks_used,
    )
    .await?;

    info!(
        "Generated location page {} for location {} ({} tokens)",
        content.id, location.id, generated.tokens_used
    );

    Ok(GeneratedContent {
        content,
        tokens_used: generated.tokens_used,
    })
}

/// Generates and persists a batch of social media posts.
/// Tolerates an empty landmark cache — the prompt carries a fallback line.
pub async fn generate_social_posts(
    pool: &PgPool,
    llm: &LlmClient,
    location: &LocationRow,
    count: u32,
) -> Result<GeneratedContent, AppError> {
    let landmarks = cache::sample(pool, location.id, SOCIAL_POSTS_SAMPLE, None).await?;

    let prompt = build_social_posts_prompt(location, &landmarks, count);
    let generated = llm
        .generate(SOCIAL_POSTS_SYSTEM, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Social post generation failed: {e}")))?;

    let landmarks_used: Vec<String> = landmarks.iter().map(|l| l.name.clone()).collect();
    let title = format!("Social Posts - {}", Utc::now().format("%m/%d/%Y"));
    let content = insert_content(
        pool,
        location.id,
        "social_posts",
        &title,
        &generated.text,
        &landmarks_used,
    )
    .await?;

    info!(
        "Generated {} social posts for location {} ({} tokens)",
        count, location.id, generated.tokens_used
    );

    Ok(GeneratedContent {
        content,
        tokens_used: generated.tokens_used,
    })
}

/// Generates a review response. Not persisted here — the caller decides
/// whether to save it onto the review.
pub async fn generate_review_response(
    llm: &LlmClient,
    location: &LocationRow,
    review: &ReviewContext<'_>,
) -> Result<GeneratedReviewResponse, AppError> {
    let prompt = build_review_response_prompt(location, review);
    let generated = llm
        .generate(REVIEW_RESPONSE_SYSTEM, &prompt)
        .await
        .map_err(|e| AppError::Llm(format!("Review response generation failed: {e}")))?;

    Ok(GeneratedReviewResponse {
        response_text: generated.text,
        tokens_used: generated.tokens_used,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Prompt building
// ────────────────────────────────────────────────────────────────────────────

fn build_gbp_post_prompt(location: &LocationRow, landmarks: &[LandmarkRow], tone: &str) -> String {
    let keywords = location.keyword_list();
    let keywords = if keywords.is_empty() {
        location.service_type.clone()
    } else {
        keywords.join(", ")
    };

    GBP_POST_TEMPLATE
        .replace("{service_type}", &location.service_type)
        .replace("{business_name}", &location.business_name)
        .replace("{city}", &location.city)
        .replace("{state}", &location.state)
        .replace("{keywords}", &keywords)
        .replace("{tone}", tone)
        .replace("{landmark_mentions}", &format_landmark_mentions(landmarks))
}

fn build_location_page_prompt(location: &LocationRow, landmarks: &[LandmarkRow]) -> String {
    let keywords = location.keyword_list();
    let keywords = if keywords.is_empty() {
        format!("{} {}", location.service_type, location.city)
    } else {
        keywords.join(", ")
    };

    LOCATION_PAGE_TEMPLATE
        .replace("{business_name}", &location.business_name)
        .replace("{service_type}", &location.service_type)
        .replace("{city}", &location.city)
        .replace("{state}", &location.state)
        .replace("{zip_code}", &location.zip_code)
        .replace("{keywords}", &keywords)
        .replace("{landmark_mentions}", &format_landmark_mentions(landmarks))
}

fn build_social_posts_prompt(
    location: &LocationRow,
    landmarks: &[LandmarkRow],
    count: u32,
) -> String {
    SOCIAL_POSTS_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{business_name}", &location.business_name)
        .replace("{service_type}", &location.service_type)
        .replace("{city}", &location.city)
        .replace("{landmark_mentions}", &format_landmark_mentions(landmarks))
}

fn build_review_response_prompt(location: &LocationRow, review: &ReviewContext<'_>) -> String {
    let sentiment = sentiment_for_rating(review.rating);

    REVIEW_RESPONSE_TEMPLATE
        .replace("{business_name}", &location.business_name)
        .replace("{service_type_lower}", &location.service_type.to_lowercase())
        .replace("{service_type}", &location.service_type)
        .replace("{reviewer_name}", review.reviewer_name.unwrap_or("Customer"))
        .replace("{rating}", &review.rating.to_string())
        .replace("{review_text}", review.review_text)
        .replace("{sentiment_instruction}", sentiment_instruction(sentiment))
        .replace("{sentiment}", sentiment)
        .replace("{tone}", review.tone)
}

/// Persists one generated content row and returns it.
async fn insert_content(
    pool: &PgPool,
    location_id: Uuid,
    content_type: &str,
    title: &str,
    body: &str,
    landmarks_used: &[String],
) -> Result<ContentRow, AppError> {
    Ok(sqlx::query_as::<_, ContentRow>(
        r#"
        INSERT INTO content (id, location_id, content_type, title, body, landmarks_used, status)
        VALUES ($1, $2, $3, $4, $5, $6, 'draft')
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(location_id)
    .bind(content_type)
    .bind(title)
    .bind(body)
    .bind(json!(landmarks_used))
    .fetch_one(pool)
    .await?)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

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
            latitude: Some(30.2672),
            longitude: Some(-97.7431),
            radius_miles: 5.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn make_landmark(name: &str) -> LandmarkRow {
        LandmarkRow {
            id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            place_id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            place_type: "school".to_string(),
            category: "education".to_string(),
            address: None,
            latitude: None,
            longitude: None,
            rating: None,
            user_ratings_total: None,
            cached_at: Utc::now(),
        }
    }

    #[test]
    fn test_gbp_prompt_fills_all_placeholders() {
        let location = make_location(Some("emergency plumber, water heater"));
        let landmarks = vec![make_landmark("Austin High")];
        let prompt = build_gbp_post_prompt(&location, &landmarks, "professional");

        assert!(prompt.contains("Austin Plumbing Co"));
        assert!(prompt.contains("Austin, TX"));
        assert!(prompt.contains("emergency plumber, water heater"));
        assert!(prompt.contains("Austin High"));
        assert!(!prompt.contains('{'), "unfilled placeholder in:\n{prompt}");
    }

    #[test]
    fn test_gbp_prompt_falls_back_to_service_type_keywords() {
        let location = make_location(None);
        let prompt = build_gbp_post_prompt(&location, &[make_landmark("Zilker Park")], "casual");
        assert!(prompt.contains("Keywords to naturally include: Plumber"));
    }

    #[test]
    fn test_location_page_prompt_includes_h1_and_zip() {
        let location = make_location(None);
        let prompt = build_location_page_prompt(&location, &[make_landmark("Austin High")]);

        assert!(prompt.contains("H1: \"Plumber in Austin, TX\""));
        assert!(prompt.contains("78701"));
        assert!(prompt.contains("Plumber Austin")); // keyword fallback
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_social_posts_prompt_carries_count_and_fallback() {
        let location = make_location(None);
        let prompt = build_social_posts_prompt(&location, &[], 3);

        assert!(prompt.contains("Create 3 unique social media posts"));
        assert!(prompt.contains("No specific landmarks available."));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_review_prompt_positive_sentiment() {
        let location = make_location(None);
        let review = ReviewContext {
            reviewer_name: Some("Dana"),
            rating: 5,
            review_text: "Fixed our water heater same day!",
            tone: "professional",
        };
        let prompt = build_review_response_prompt(&location, &review);

        assert!(prompt.contains("Reviewer: Dana"));
        assert!(prompt.contains("Sentiment: positive"));
        assert!(prompt.contains("genuine gratitude"));
        assert!(prompt.contains("fix your plumber"));
        assert!(!prompt.contains('{'));
    }

    #[test]
    fn test_review_prompt_negative_sentiment_and_anonymous_reviewer() {
        let location = make_location(None);
        let review = ReviewContext {
            reviewer_name: None,
            rating: 1,
            review_text: "Showed up two hours late.",
            tone: "professional",
        };
        let prompt = build_review_response_prompt(&location, &review);

        assert!(prompt.contains("Reviewer: Customer"));
        assert!(prompt.contains("Sentiment: negative"));
        assert!(prompt.contains("Apologizes sincerely"));
    }
}
