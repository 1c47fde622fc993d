//! Bearer-token authentication middleware.
//!
//! Protected routes see only the authenticated user's snowflake, attached as
//! an [`AuthUser`] request extension. Credential material stops here.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, DecodingKey, Validation};

use crate::application::services::Claims;
use crate::domain::Snowflake;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// The authenticated caller, attached to requests that pass the middleware.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Snowflake,
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&request)?;
    let user_id = decode_user_id(token, state.settings.jwt.secret.as_bytes())?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing bearer token".into()))
}

fn decode_user_id(token: &str, secret: &[u8]) -> Result<Snowflake, AppError> {
    let claims = decode::<Claims>(token, &DecodingKey::from_secret(secret), &Validation::default())
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                AppError::Unauthorized("Token expired".into())
            }
            _ => AppError::Unauthorized("Invalid token".into()),
        })?
        .claims;

    claims
        .sub
        .parse()
        .map_err(|_| AppError::Unauthorized("Invalid token claims".into()))
}
