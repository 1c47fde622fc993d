//! Server Repository Implementation

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Server, ServerRepository, Snowflake};
use crate::shared::error::AppError;

/// PostgreSQL server repository.
pub struct PgServerRepository {
    pool: PgPool,
}

impl PgServerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ServerRow {
    id: i64,
    name: String,
    owner_id: i64,
}

impl ServerRow {
    fn into_server(self) -> Server {
        Server {
            id: Snowflake::new(self.id),
            name: self.name,
            owner_id: Snowflake::new(self.owner_id),
        }
    }
}

#[async_trait]
impl ServerRepository for PgServerRepository {
    async fn create(&self, server: &Server) -> Result<Server, AppError> {
        let row = sqlx::query_as::<_, ServerRow>(
            r#"
            INSERT INTO servers (id, name, owner_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, owner_id
            "#,
        )
        .bind(server.id.as_i64())
        .bind(&server.name)
        .bind(server.owner_id.as_i64())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_server())
    }

    async fn find_by_id(&self, id: Snowflake) -> Result<Option<Server>, AppError> {
        let row = sqlx::query_as::<_, ServerRow>(
            "SELECT id, name, owner_id FROM servers WHERE id = $1",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_server()))
    }
}
