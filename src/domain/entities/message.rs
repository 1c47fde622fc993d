//! Message entity and repository trait.
//!
//! Maps to the `messages` table. The primary key is the snowflake minted at
//! send time, so the table's natural order is creation order and history
//! queries never need a timestamp column.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::Snowflake;
use crate::shared::error::AppError;

/// Content length cap, counted in characters. A body of this length or
/// longer is rejected, so 4095 characters is the longest accepted message.
pub const MAX_CONTENT_LENGTH: usize = 4096;

/// A message sent to a channel.
///
/// `id` is immutable once minted; `content` and `edited` may change on the
/// edit path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Snowflake ID (primary key)
    pub id: Snowflake,

    /// Channel the message was sent to
    pub channel_id: Snowflake,

    /// Author user ID
    pub author_id: Snowflake,

    /// Message body
    pub content: String,

    /// Whether the message has been edited since it was sent
    pub edited: bool,
}

/// Repository trait for message persistence.
///
/// `find_by_channel` is a keyset range query on the snowflake primary key:
/// - `before`: the `limit` largest IDs below the cursor, descending
/// - `after`: IDs above the cursor, ascending
/// - neither: the `limit` most recent messages, descending
#[async_trait]
pub trait MessageRepository: Send + Sync {
    async fn create(&self, message: &Message) -> Result<Message, AppError>;

    async fn find_by_id(&self, id: Snowflake) -> Result<Option<Message>, AppError>;

    async fn find_by_channel(
        &self,
        channel_id: Snowflake,
        before: Option<Snowflake>,
        after: Option<Snowflake>,
        limit: i64,
    ) -> Result<Vec<Message>, AppError>;
}
