// All LLM prompt constants for the content orchestrator.

use crate::models::landmark::LandmarkRow;

/// System prompt for Google Business Profile posts.
pub const GBP_POST_SYSTEM: &str =
    "You are an expert local SEO copywriter who creates authentic, location-specific content.";

/// GBP post prompt template.
/// Replace: {service_type}, {business_name}, {city}, {state}, {keywords},
///          {tone}, {landmark_mentions}
pub const GBP_POST_TEMPLATE: &str = r#"You are a local SEO expert writing a Google Business Profile post for a {service_type} business.

Business: {business_name}
Location: {city}, {state}
Keywords to naturally include: {keywords}
Tone: {tone}

Local landmarks and points of interest to mention naturally:
{landmark_mentions}

Write a compelling 150-200 word Google Business Profile post that:
1. Highlights the business's service
2. Naturally mentions 2-3 of the local landmarks to establish local relevance
3. Includes a call-to-action
4. Feels authentic and local, not generic

The post should feel like it was written by someone who actually knows the area. Do NOT use phrases like "in your area" or "local community" - be specific with the landmarks."#;

/// System prompt for SEO location pages.
pub const LOCATION_PAGE_SYSTEM: &str =
    "You are an expert local SEO copywriter who creates authentic, location-specific content \
    that ranks well in Google Map Pack.";

/// Location page prompt template.
/// Replace: {business_name}, {service_type}, {city}, {state}, {zip_code},
///          {keywords}, {landmark_mentions}
pub const LOCATION_PAGE_TEMPLATE: &str = r#"You are a local SEO expert writing a location-specific service page.

Business: {business_name}
Service: {service_type}
Location: {city}, {state} {zip_code}
Target Keywords: {keywords}

Local landmarks to reference naturally:
{landmark_mentions}

Write an SEO-optimized location page (400-500 words) that includes:
1. H1: "{service_type} in {city}, {state}"
2. Introduction establishing local presence
3. Services section with local context
4. "Areas We Serve" section mentioning specific neighborhoods/landmarks
5. Why choose us section
6. Call-to-action

Make the content hyper-local by referencing specific landmarks, schools, and neighborhoods. This should NOT read like generic content with the city name inserted."#;

/// System prompt for review responses.
pub const REVIEW_RESPONSE_SYSTEM: &str =
    "You are a business owner who personally responds to every review with authenticity and care.";

/// Review response prompt template.
/// Replace: {business_name}, {service_type}, {reviewer_name}, {rating},
///          {review_text}, {sentiment}, {tone}, {sentiment_instruction},
///          {service_type_lower}
pub const REVIEW_RESPONSE_TEMPLATE: &str = r#"You are responding to a customer review for {business_name}, a {service_type} business.

Reviewer: {reviewer_name}
Rating: {rating}/5 stars
Review: "{review_text}"
Sentiment: {sentiment}
Desired Tone: {tone}

Write a personalized response (50-100 words) that:
1. Thanks them by name if provided
2. {sentiment_instruction}
3. Mentions the specific service if relevant (e.g., "Glad we could fix your {service_type_lower}...")
4. Invites them back or to contact you directly

Do NOT use generic phrases like "valued customer" - make it personal and authentic."#;

/// System prompt for social media posts.
pub const SOCIAL_POSTS_SYSTEM: &str = "You are a social media expert for local businesses.";

/// Social posts prompt template.
/// Replace: {count}, {business_name}, {service_type}, {city}, {landmark_mentions}
pub const SOCIAL_POSTS_TEMPLATE: &str = r#"Create {count} unique social media posts for {business_name}, a {service_type} in {city}.

Local landmarks to reference:
{landmark_mentions}

For each post:
- Keep it under 280 characters
- Include a local reference
- Include a call-to-action
- Make each post distinct in approach (tip, promotion, community mention, etc.)

Format as a numbered list."#;

/// Renders sampled landmarks as prompt bullet lines, with an explicit
/// fallback when the sample is empty.
pub fn format_landmark_mentions(landmarks: &[LandmarkRow]) -> String {
    if landmarks.is_empty() {
        return "No specific landmarks available.".to_string();
    }

    landmarks
        .iter()
        .map(|landmark| {
            let mut line = format!("- {} ({})", landmark.name, landmark.place_type);
            if let Some(address) = &landmark.address {
                line.push_str(&format!(" - near {address}"));
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Maps a star rating to the sentiment label used in review prompts.
pub fn sentiment_for_rating(rating: i32) -> &'static str {
    if rating >= 4 {
        "positive"
    } else if rating >= 3 {
        "neutral"
    } else {
        "negative"
    }
}

/// The response-framing line injected per sentiment.
pub fn sentiment_instruction(sentiment: &str) -> &'static str {
    match sentiment {
        "positive" => "Expresses genuine gratitude and mentions a specific point from their review",
        "neutral" => "Acknowledges their feedback and offers to improve",
        _ => "Apologizes sincerely, takes responsibility, and offers to make it right",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn make_landmark(name: &str, place_type: &str, address: Option<&str>) -> LandmarkRow {
        LandmarkRow {
            id: Uuid::new_v4(),
            location_id: Uuid::new_v4(),
            place_id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            place_type: place_type.to_string(),
            category: "education".to_string(),
            address: address.map(str::to_string),
            latitude: None,
            longitude: None,
            rating: None,
            user_ratings_total: None,
            cached_at: Utc::now(),
        }
    }

    #[test]
    fn test_format_landmark_mentions_includes_name_type_and_address() {
        let landmarks = vec![
            make_landmark("Austin High", "school", Some("123 Main")),
            make_landmark("Zilker Park", "park", None),
        ];

        let formatted = format_landmark_mentions(&landmarks);
        assert!(formatted.contains("Austin High"));
        assert!(formatted.contains("(school)"));
        assert!(formatted.contains("near 123 Main"));
        assert!(formatted.contains("Zilker Park"));
    }

    #[test]
    fn test_format_landmark_mentions_empty_fallback() {
        assert_eq!(
            format_landmark_mentions(&[]),
            "No specific landmarks available."
        );
    }

    #[test]
    fn test_sentiment_thresholds() {
        assert_eq!(sentiment_for_rating(5), "positive");
        assert_eq!(sentiment_for_rating(4), "positive");
        assert_eq!(sentiment_for_rating(3), "neutral");
        assert_eq!(sentiment_for_rating(2), "negative");
        assert_eq!(sentiment_for_rating(1), "negative");
    }
}
