pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::audit::handlers as audit;
use crate::content::handlers as content;
use crate::generation::handlers as generation;
use crate::landmarks::handlers as landmarks;
use crate::locations::handlers as locations;
use crate::reviews::handlers as reviews;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Locations
        .route(
            "/api/locations",
            get(locations::handle_list_locations).post(locations::handle_create_location),
        )
        .route(
            "/api/locations/:id",
            get(locations::handle_get_location)
                .put(locations::handle_update_location)
                .delete(locations::handle_delete_location),
        )
        // Landmarks
        .route(
            "/api/locations/:id/landmarks",
            get(landmarks::handle_get_landmarks),
        )
        .route(
            "/api/locations/:id/refresh-landmarks",
            post(landmarks::handle_refresh_landmarks),
        )
        // Content generation + history
        .route(
            "/api/locations/:id/content",
            get(content::handle_content_history),
        )
        .route(
            "/api/locations/:id/content/gbp-post",
            post(generation::handle_generate_gbp_post),
        )
        .route(
            "/api/locations/:id/content/location-page",
            post(generation::handle_generate_location_page),
        )
        .route(
            "/api/locations/:id/content/social-posts",
            post(generation::handle_generate_social_posts),
        )
        .route(
            "/api/content/:id",
            get(content::handle_get_content).delete(content::handle_delete_content),
        )
        .route(
            "/api/content/:id/status",
            patch(content::handle_update_content_status),
        )
        // Reviews
        .route(
            "/api/locations/:id/reviews",
            get(reviews::handle_get_reviews).post(reviews::handle_add_review),
        )
        .route(
            "/api/locations/:id/reviews/:review_id",
            delete(reviews::handle_delete_review),
        )
        .route(
            "/api/locations/:id/reviews/:review_id/generate-response",
            post(reviews::handle_generate_response),
        )
        .route(
            "/api/locations/:id/reviews/:review_id/response",
            put(reviews::handle_save_response),
        )
        // Citation audit
        .route(
            "/api/locations/:id/citations",
            get(audit::handle_get_citations),
        )
        .route(
            "/api/locations/:id/citations/initialize",
            post(audit::handle_initialize_citations),
        )
        .route(
            "/api/locations/:id/citations/:citation_id",
            put(audit::handle_update_citation),
        )
        .route(
            "/api/locations/:id/audit-summary",
            get(audit::handle_audit_summary),
        )
        .with_state(state)
}
