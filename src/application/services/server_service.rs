//! Server Service

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{Server, ServerRepository, Snowflake};
use crate::shared::snowflake::{Category, SnowflakeGenerator};

/// Server service trait
#[async_trait]
pub trait ServerService: Send + Sync {
    /// Create a new server owned by `owner_id`, minting its ID.
    async fn create_server(&self, name: &str, owner_id: Snowflake)
        -> Result<Server, ServerError>;

    /// Look up a server by ID.
    async fn get_server(&self, id: Snowflake) -> Result<Server, ServerError>;
}

/// Server service errors
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server not found")]
    NotFound,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// ServerService implementation
pub struct ServerServiceImpl<S>
where
    S: ServerRepository,
{
    server_repo: Arc<S>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<S> ServerServiceImpl<S>
where
    S: ServerRepository,
{
    pub fn new(server_repo: Arc<S>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            server_repo,
            id_generator,
        }
    }
}

#[async_trait]
impl<S> ServerService for ServerServiceImpl<S>
where
    S: ServerRepository + 'static,
{
    async fn create_server(
        &self,
        name: &str,
        owner_id: Snowflake,
    ) -> Result<Server, ServerError> {
        let server = Server {
            id: self
                .id_generator
                .generate(Category::Server)
                .map_err(|e| ServerError::Internal(e.to_string()))?,
            name: name.to_string(),
            owner_id,
        };

        self.server_repo
            .create(&server)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }

    async fn get_server(&self, id: Snowflake) -> Result<Server, ServerError> {
        self.server_repo
            .find_by_id(id)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .ok_or(ServerError::NotFound)
    }
}
