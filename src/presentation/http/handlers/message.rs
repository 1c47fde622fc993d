//! Message Handlers

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::Validate;

use crate::application::dto::request::SendMessageRequest;
use crate::application::dto::response::MessageResponse;
use crate::application::services::{
    MessageError, MessageQueryDto, MessageService, MessageServiceImpl,
};
use crate::domain::Snowflake;
use crate::infrastructure::repositories::PgMessageRepository;
use crate::presentation::middleware::AuthUser;
use crate::presentation::websocket::messages::GatewaySend;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// History query parameters
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub before: Option<String>,
    pub after: Option<String>,
    pub limit: Option<i64>,
}

fn message_service(state: &AppState) -> MessageServiceImpl<PgMessageRepository> {
    let message_repo = Arc::new(PgMessageRepository::new(state.db.clone()));
    MessageServiceImpl::new(message_repo, state.snowflake.clone())
}

fn map_message_error(e: MessageError) -> AppError {
    match e {
        MessageError::NotFound => AppError::NotFound("Message not found".into()),
        MessageError::ContentTooLong => AppError::BadRequest("Message too long".into()),
        MessageError::Snowflake(e) => AppError::Snowflake(e),
        MessageError::Internal(msg) => AppError::Internal(msg),
    }
}

/// Get a page of channel history
pub async fn get_messages(
    State(state): State<AppState>,
    Path(channel_id): Path<String>,
    Query(query): Query<MessageQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let channel_id: Snowflake = channel_id.parse()?;

    let query_dto = MessageQueryDto {
        before: query.before.as_deref().map(str::parse).transpose()?,
        after: query.after.as_deref().map(str::parse).transpose()?,
        limit: query.limit,
    };

    let messages = message_service(&state)
        .get_messages(channel_id, query_dto)
        .await
        .map_err(map_message_error)?;

    Ok(Json(messages.into_iter().map(MessageResponse::from).collect()))
}

/// Get a single message from a channel
pub async fn get_message(
    State(state): State<AppState>,
    Path((channel_id, message_id)): Path<(String, String)>,
) -> Result<Json<MessageResponse>, AppError> {
    let channel_id: Snowflake = channel_id.parse()?;
    let message_id: Snowflake = message_id.parse()?;

    let message = message_service(&state)
        .get_message(channel_id, message_id)
        .await
        .map_err(map_message_error)?;

    Ok(Json(MessageResponse::from(message)))
}

/// Send a message to a channel
///
/// The stored record is handed to the gateway, which pushes it to every
/// connection currently subscribed to the channel.
pub async fn send_message(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(channel_id): Path<String>,
    Json(body): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let channel_id: Snowflake = channel_id.parse()?;

    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let message = message_service(&state)
        .send_message(channel_id, auth.user_id, body.content)
        .await
        .map_err(map_message_error)?;

    let response = MessageResponse::from(message);
    let payload = serde_json::to_value(&response).unwrap_or_default();
    state
        .gateway
        .broadcast(channel_id, GatewaySend::dispatch("MESSAGE_CREATE", payload));

    Ok((StatusCode::CREATED, Json(response)))
}
