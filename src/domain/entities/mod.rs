//! Domain entities and their repository traits.

pub mod message;
pub mod server;
pub mod user;

pub use message::{Message, MessageRepository};
pub use server::{Server, ServerRepository};
pub use user::{User, UserRepository};
