//! Server entity and repository trait.
//!
//! A server groups channels; channel membership bookkeeping beyond what the
//! gateway and pagination need is out of scope, so the entity stays thin.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Snowflake;
use crate::shared::error::AppError;

/// A chat server owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Server {
    /// Snowflake ID (primary key)
    pub id: Snowflake,

    pub name: String,

    pub owner_id: Snowflake,
}

/// Repository trait for server persistence.
#[async_trait]
pub trait ServerRepository: Send + Sync {
    async fn create(&self, server: &Server) -> Result<Server, AppError>;

    async fn find_by_id(&self, id: Snowflake) -> Result<Option<Server>, AppError>;
}
