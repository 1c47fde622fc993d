//! Message Repository Implementation
//!
//! PostgreSQL implementation of message persistence. History queries are
//! keyset scans over the snowflake primary key, so pagination never consults
//! wall-clock timestamps.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::domain::{Message, MessageRepository, Snowflake};
use crate::shared::error::AppError;

/// PostgreSQL message repository.
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Internal row type for message queries.
#[derive(Debug, sqlx::FromRow)]
struct MessageRow {
    id: i64,
    channel_id: i64,
    author_id: i64,
    content: String,
    edited: bool,
}

impl MessageRow {
    fn into_message(self) -> Message {
        Message {
            id: Snowflake::new(self.id),
            channel_id: Snowflake::new(self.channel_id),
            author_id: Snowflake::new(self.author_id),
            content: self.content,
            edited: self.edited,
        }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    /// Insert a message keyed by its pre-minted snowflake ID.
    async fn create(&self, message: &Message) -> Result<Message, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            INSERT INTO messages (id, channel_id, author_id, content, edited)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, channel_id, author_id, content, edited
            "#,
        )
        .bind(message.id.as_i64())
        .bind(message.channel_id.as_i64())
        .bind(message.author_id.as_i64())
        .bind(&message.content)
        .bind(message.edited)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    async fn find_by_id(&self, id: Snowflake) -> Result<Option<Message>, AppError> {
        let row = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, channel_id, author_id, content, edited
            FROM messages
            WHERE id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_message()))
    }

    /// Ordered range query against a channel's history.
    ///
    /// - `before`: the `limit` largest IDs below the cursor, descending
    /// - `after`: IDs above the cursor, ascending
    /// - neither: the most recent messages, descending
    ///
    /// The service layer re-orders pages into ascending order for callers.
    async fn find_by_channel(
        &self,
        channel_id: Snowflake,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
        limit: i64,
    ) -> Result<Vec<Message>, AppError> {
        let rows = match (before, after) {
            (Some(before_id), _) => {
                sqlx::query_as::<_, MessageRow>(
                    r#"
                    SELECT id, channel_id, author_id, content, edited
                    FROM messages
                    WHERE channel_id = $1 AND id < $2
                    ORDER BY id DESC
                    LIMIT $3
                    "#,
                )
                .bind(channel_id.as_i64())
                .bind(before_id.as_i64())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            (None, Some(after_id)) => {
                sqlx::query_as::<_, MessageRow>(
                    r#"
                    SELECT id, channel_id, author_id, content, edited
                    FROM messages
                    WHERE channel_id = $1 AND id > $2
                    ORDER BY id ASC
                    LIMIT $3
                    "#,
                )
                .bind(channel_id.as_i64())
                .bind(after_id.as_i64())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
            (None, None) => {
                sqlx::query_as::<_, MessageRow>(
                    r#"
                    SELECT id, channel_id, author_id, content, edited
                    FROM messages
                    WHERE channel_id = $1
                    ORDER BY id DESC
                    LIMIT $2
                    "#,
                )
                .bind(channel_id.as_i64())
                .bind(limit)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }
}
