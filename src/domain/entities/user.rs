//! User entity and repository trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Snowflake;
use crate::shared::error::AppError;

/// A registered user account.
///
/// `password_hash` is an argon2 PHC string and never leaves the auth layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Snowflake ID (primary key)
    pub id: Snowflake,

    pub username: String,

    #[serde(skip_serializing)]
    pub password_hash: String,
}

/// Repository trait for user persistence.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Snowflake) -> Result<Option<User>, AppError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError>;
}
