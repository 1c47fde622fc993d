//! PostgreSQL repository implementations.

pub mod message_repository;
pub mod server_repository;
pub mod user_repository;

pub use message_repository::PgMessageRepository;
pub use server_repository::PgServerRepository;
pub use user_repository::PgUserRepository;
