//! Server Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::application::dto::request::CreateServerRequest;
use crate::application::dto::response::ServerResponse;
use crate::application::services::{ServerError, ServerService, ServerServiceImpl};
use crate::domain::Snowflake;
use crate::infrastructure::repositories::PgServerRepository;
use crate::presentation::middleware::AuthUser;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn server_service(state: &AppState) -> ServerServiceImpl<PgServerRepository> {
    let server_repo = Arc::new(PgServerRepository::new(state.db.clone()));
    ServerServiceImpl::new(server_repo, state.snowflake.clone())
}

fn map_server_error(e: ServerError) -> AppError {
    match e {
        ServerError::NotFound => AppError::NotFound("Server not found".into()),
        ServerError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Create a server
pub async fn create_server(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(body): Json<CreateServerRequest>,
) -> Result<(StatusCode, Json<ServerResponse>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let server = server_service(&state)
        .create_server(&body.name, auth.user_id)
        .await
        .map_err(map_server_error)?;

    Ok((StatusCode::CREATED, Json(ServerResponse::from(server))))
}

/// Get a server by ID
pub async fn get_server(
    State(state): State<AppState>,
    Path(server_id): Path<String>,
) -> Result<Json<ServerResponse>, AppError> {
    let server_id: Snowflake = server_id.parse()?;

    let server = server_service(&state)
        .get_server(server_id)
        .await
        .map_err(map_server_error)?;

    Ok(Json(ServerResponse::from(server)))
}
