//! Snowflake Inspection Handler
//!
//! Any identifier can be classified without a lookup; this endpoint unpacks
//! one back into its fields.

use axum::{extract::Path, Json};

use crate::application::dto::response::SnowflakeInfoResponse;
use crate::domain::Snowflake;
use crate::shared::error::AppError;

/// Parse a snowflake and report its fields
pub async fn get_snowflake_info(
    Path(id): Path<String>,
) -> Result<Json<SnowflakeInfoResponse>, AppError> {
    let id: Snowflake = id.parse()?;
    let (_, category, sequence) = id.parts()?;

    Ok(Json(SnowflakeInfoResponse {
        id,
        timestamp: id.created_at().to_rfc3339(),
        category,
        sequence,
    }))
}
