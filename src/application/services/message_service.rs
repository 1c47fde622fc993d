//! Message Service
//!
//! Sending messages and paging through channel history.
//!
//! Pagination is cursor-based: a pivot snowflake plus a direction. Because
//! message IDs are strictly ordered by creation time, "before"/"after" a
//! pivot are pure keyset comparisons and never look at wall-clock time.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::entities::message::MAX_CONTENT_LENGTH;
use crate::domain::{Message, MessageRepository, Snowflake};
use crate::shared::snowflake::{Category, SnowflakeError, SnowflakeGenerator};

/// Page size bounds. Out-of-range requests are clamped, not rejected.
pub const MIN_PAGE_SIZE: i64 = 1;
pub const MAX_PAGE_SIZE: i64 = 50;
pub const DEFAULT_PAGE_SIZE: i64 = 25;

/// Message service trait
#[async_trait]
pub trait MessageService: Send + Sync {
    /// Mint an ID, persist the message, and return the stored record.
    async fn send_message(
        &self,
        channel_id: Snowflake,
        author_id: Snowflake,
        content: String,
    ) -> Result<Message, MessageError>;

    /// Return a page of channel history relative to a cursor.
    async fn get_messages(
        &self,
        channel_id: Snowflake,
        query: MessageQueryDto,
    ) -> Result<Vec<Message>, MessageError>;

    /// Look up a single message, requiring it to exist in the given channel.
    async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<Message, MessageError>;
}

/// History query parameters. At most one of `before`/`after` is meaningful;
/// `before` wins when both are supplied.
#[derive(Debug, Clone, Default)]
pub struct MessageQueryDto {
    pub before: Option<Snowflake>,
    pub after: Option<Snowflake>,
    pub limit: Option<i64>,
}

/// Message service errors
#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Message not found")]
    NotFound,

    #[error("Message too long")]
    ContentTooLong,

    #[error(transparent)]
    Snowflake(#[from] SnowflakeError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// MessageService implementation
pub struct MessageServiceImpl<M>
where
    M: MessageRepository,
{
    message_repo: Arc<M>,
    id_generator: Arc<SnowflakeGenerator>,
}

impl<M> MessageServiceImpl<M>
where
    M: MessageRepository,
{
    pub fn new(message_repo: Arc<M>, id_generator: Arc<SnowflakeGenerator>) -> Self {
        Self {
            message_repo,
            id_generator,
        }
    }
}

#[async_trait]
impl<M> MessageService for MessageServiceImpl<M>
where
    M: MessageRepository + 'static,
{
    async fn send_message(
        &self,
        channel_id: Snowflake,
        author_id: Snowflake,
        content: String,
    ) -> Result<Message, MessageError> {
        // Character count, not bytes; the cap itself is excluded.
        if content.chars().count() >= MAX_CONTENT_LENGTH {
            return Err(MessageError::ContentTooLong);
        }

        let message = Message {
            id: self.id_generator.generate(Category::Message)?,
            channel_id,
            author_id,
            content,
            edited: false,
        };

        let created = self
            .message_repo
            .create(&message)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        Ok(created)
    }

    async fn get_messages(
        &self,
        channel_id: Snowflake,
        query: MessageQueryDto,
    ) -> Result<Vec<Message>, MessageError> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE);

        let before = query.before;
        let after = if before.is_some() { None } else { query.after };

        let mut messages = self
            .message_repo
            .find_by_channel(channel_id, before, after, limit)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?;

        // "before" pages (and the no-cursor page) come back newest-first so
        // the query selects the largest qualifying IDs; flip them so callers
        // always receive chronological order regardless of direction.
        if after.is_none() {
            messages.reverse();
        }

        Ok(messages)
    }

    async fn get_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> Result<Message, MessageError> {
        let message = self
            .message_repo
            .find_by_id(message_id)
            .await
            .map_err(|e| MessageError::Internal(e.to_string()))?
            .ok_or(MessageError::NotFound)?;

        if message.channel_id != channel_id {
            return Err(MessageError::NotFound);
        }

        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::error::AppError;
    use mockall::mock;
    use mockall::predicate::eq;
    use pretty_assertions::assert_eq;

    mock! {
        MessageRepo {}

        #[async_trait]
        impl MessageRepository for MessageRepo {
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
    }

    fn message(id: i64, channel_id: i64) -> Message {
        Message {
            id: Snowflake::new(id),
            channel_id: Snowflake::new(channel_id),
            author_id: Snowflake::new(1),
            content: format!("message {id}"),
            edited: false,
        }
    }

    fn service(repo: MockMessageRepo) -> MessageServiceImpl<MockMessageRepo> {
        MessageServiceImpl::new(Arc::new(repo), Arc::new(SnowflakeGenerator::default()))
    }

    fn ids(messages: &[Message]) -> Vec<i64> {
        messages.iter().map(|m| m.id.as_i64()).collect()
    }

    #[tokio::test]
    async fn before_page_returns_largest_qualifying_ids_ascending() {
        // History [100..=104]; page(X, 102, BEFORE, 2) must yield [100, 101].
        let channel = Snowflake::new(9);
        let mut repo = MockMessageRepo::new();
        repo.expect_find_by_channel()
            .with(
                eq(channel),
                eq(Some(Snowflake::new(102))),
                eq(None),
                eq(2i64),
            )
            .returning(move |c, _, _, _| Ok(vec![message(101, c.as_i64()), message(100, c.as_i64())]));

        let page = service(repo)
            .get_messages(
                channel,
                MessageQueryDto {
                    before: Some(Snowflake::new(102)),
                    after: None,
                    limit: Some(2),
                },
            )
            .await
            .unwrap();

        assert_eq!(ids(&page), vec![100, 101]);
    }

    #[tokio::test]
    async fn after_page_returns_ascending_ids() {
        let channel = Snowflake::new(9);
        let mut repo = MockMessageRepo::new();
        repo.expect_find_by_channel()
            .with(
                eq(channel),
                eq(None),
                eq(Some(Snowflake::new(102))),
                eq(2i64),
            )
            .returning(move |c, _, _, _| Ok(vec![message(103, c.as_i64()), message(104, c.as_i64())]));

        let page = service(repo)
            .get_messages(
                channel,
                MessageQueryDto {
                    before: None,
                    after: Some(Snowflake::new(102)),
                    limit: Some(2),
                },
            )
            .await
            .unwrap();

        assert_eq!(ids(&page), vec![103, 104]);
    }

    #[tokio::test]
    async fn out_of_range_limits_are_clamped_silently() {
        let channel = Snowflake::new(9);

        for (requested, effective) in [(Some(500), 50i64), (Some(0), 1), (Some(-3), 1), (None, 25)]
        {
            let mut repo = MockMessageRepo::new();
            repo.expect_find_by_channel()
                .withf(move |_, _, _, limit| *limit == effective)
                .returning(|_, _, _, _| Ok(vec![]));

            let page = service(repo)
                .get_messages(
                    channel,
                    MessageQueryDto {
                        before: None,
                        after: None,
                        limit: requested,
                    },
                )
                .await
                .unwrap();
            assert!(page.is_empty());
        }
    }

    #[tokio::test]
    async fn empty_page_is_not_an_error() {
        let mut repo = MockMessageRepo::new();
        repo.expect_find_by_channel().returning(|_, _, _, _| Ok(vec![]));

        let page = service(repo)
            .get_messages(Snowflake::new(9), MessageQueryDto::default())
            .await
            .unwrap();
        assert!(page.is_empty());
    }

    #[tokio::test]
    async fn single_lookup_requires_pivot_existence() {
        let mut repo = MockMessageRepo::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let result = service(repo)
            .get_message(Snowflake::new(9), Snowflake::new(123))
            .await;
        assert!(matches!(result, Err(MessageError::NotFound)));
    }

    #[tokio::test]
    async fn single_lookup_rejects_wrong_channel() {
        let mut repo = MockMessageRepo::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(message(id.as_i64(), 777))));

        let result = service(repo)
            .get_message(Snowflake::new(9), Snowflake::new(123))
            .await;
        assert!(matches!(result, Err(MessageError::NotFound)));
    }

    #[tokio::test]
    async fn send_mints_a_message_category_id() {
        let mut repo = MockMessageRepo::new();
        repo.expect_create().returning(|m| Ok(m.clone()));

        let sent = service(repo)
            .send_message(Snowflake::new(9), Snowflake::new(1), "hello".into())
            .await
            .unwrap();

        assert_eq!(sent.id.category().unwrap(), Category::Message);
        assert_eq!(sent.content, "hello");
        assert!(!sent.edited);
    }

    #[tokio::test]
    async fn content_at_the_cap_is_rejected() {
        let repo = MockMessageRepo::new();

        let result = service(repo)
            .send_message(
                Snowflake::new(9),
                Snowflake::new(1),
                "x".repeat(MAX_CONTENT_LENGTH),
            )
            .await;
        assert!(matches!(result, Err(MessageError::ContentTooLong)));
    }

    #[tokio::test]
    async fn content_just_under_the_cap_is_accepted() {
        let mut repo = MockMessageRepo::new();
        repo.expect_create().returning(|m| Ok(m.clone()));

        let sent = service(repo)
            .send_message(
                Snowflake::new(9),
                Snowflake::new(1),
                "x".repeat(MAX_CONTENT_LENGTH - 1),
            )
            .await
            .unwrap();
        assert_eq!(sent.content.chars().count(), MAX_CONTENT_LENGTH - 1);
    }

    #[tokio::test]
    async fn content_cap_counts_characters_not_bytes() {
        let mut repo = MockMessageRepo::new();
        repo.expect_create().returning(|m| Ok(m.clone()));

        // 4095 two-byte characters: over the cap in bytes, under it in chars.
        let content = "é".repeat(MAX_CONTENT_LENGTH - 1);
        assert!(content.len() > MAX_CONTENT_LENGTH);

        let sent = service(repo)
            .send_message(Snowflake::new(9), Snowflake::new(1), content)
            .await
            .unwrap();
        assert_eq!(sent.content.chars().count(), MAX_CONTENT_LENGTH - 1);
    }
}
