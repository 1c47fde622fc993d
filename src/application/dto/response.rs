//! Response DTOs
//!
//! Data structures for API response bodies. Snowflake fields serialize as
//! decimal strings (the only wire form of identifiers).

use serde::Serialize;

use crate::application::services::AuthTokens;
use crate::domain::{Message, Server, Snowflake, User};
use crate::shared::snowflake::Category;

/// Authentication tokens response
#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub expires_in: i64,
    pub token_type: String,
}

impl From<AuthTokens> for TokenResponse {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            access_token: tokens.access_token,
            expires_in: tokens.expires_in,
            token_type: tokens.token_type,
        }
    }
}

/// User response (never includes the password hash)
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Snowflake,
    pub username: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}

/// Message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub content: String,
    pub edited: bool,
}

impl From<Message> for MessageResponse {
    fn from(message: Message) -> Self {
        Self {
            id: message.id,
            channel_id: message.channel_id,
            author_id: message.author_id,
            content: message.content,
            edited: message.edited,
        }
    }
}

/// Server response
#[derive(Debug, Serialize)]
pub struct ServerResponse {
    pub id: Snowflake,
    pub name: String,
    pub owner_id: Snowflake,
}

impl From<Server> for ServerResponse {
    fn from(server: Server) -> Self {
        Self {
            id: server.id,
            name: server.name,
            owner_id: server.owner_id,
        }
    }
}

/// Parsed snowflake fields, for the inspection endpoint
#[derive(Debug, Serialize)]
pub struct SnowflakeInfoResponse {
    pub id: Snowflake,
    pub timestamp: String,
    pub category: Category,
    pub sequence: u64,
}
