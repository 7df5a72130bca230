pub mod handlers;

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::location::LocationRow;

/// Query parameter carrying the acting user, shared by the GET handlers.
#[derive(Debug, Deserialize)]
pub struct UserIdQuery {
    pub user_id: Uuid,
}

/// Loads a location and enforces ownership. A nonexistent id is NotFound;
/// a location owned by another user is Forbidden — distinct conditions,
/// never silently defaulted.
pub async fn find_owned(
    pool: &PgPool,
    location_id: Uuid,
    user_id: Uuid,
) -> Result<LocationRow, AppError> {
    let location = sqlx::query_as::<_, LocationRow>("SELECT * FROM locations WHERE id = $1")
        .bind(location_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Location {location_id} not found")))?;

    if location.user_id != user_id {
        return Err(AppError::Forbidden);
    }

    Ok(location)
}
