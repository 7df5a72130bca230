use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::places::PlacesProvider;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Pluggable places collaborator. Default: GooglePlacesClient.
    pub places: Arc<dyn PlacesProvider>,
    pub llm: LlmClient,
    pub config: Config,
}
