//! Authentication Handlers

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use validator::Validate;

use crate::application::dto::request::{LoginRequest, RegisterRequest};
use crate::application::dto::response::{TokenResponse, UserResponse};
use crate::application::services::{AuthError, AuthService, AuthServiceImpl};
use crate::infrastructure::repositories::PgUserRepository;
use crate::shared::error::AppError;
use crate::startup::AppState;

fn auth_service(state: &AppState) -> AuthServiceImpl<PgUserRepository> {
    let user_repo = Arc::new(PgUserRepository::new(state.db.clone()));
    AuthServiceImpl::new(
        user_repo,
        state.snowflake.clone(),
        state.settings.jwt.clone(),
    )
}

fn map_auth_error(e: AuthError) -> AppError {
    match e {
        AuthError::InvalidCredentials => AppError::Unauthorized("Invalid credentials".into()),
        AuthError::TokenExpired => AppError::Unauthorized("Token expired".into()),
        AuthError::InvalidToken => AppError::Unauthorized("Invalid token".into()),
        AuthError::UserNotFound => AppError::NotFound("User not found".into()),
        AuthError::UsernameExists => AppError::Conflict("Username already taken".into()),
        AuthError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Register a new user account
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let user = auth_service(&state)
        .register(&body.username, &body.password)
        .await
        .map_err(map_auth_error)?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Verify credentials and issue an access token
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let tokens = auth_service(&state)
        .authenticate(&body.username, &body.password)
        .await
        .map_err(map_auth_error)?;

    Ok(Json(TokenResponse::from(tokens)))
}
