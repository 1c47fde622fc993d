//! Domain layer: entities, value objects, and repository traits.

pub mod entities;
pub mod value_objects;

pub use entities::{
    Message, MessageRepository, Server, ServerRepository, User, UserRepository,
};
pub use value_objects::Snowflake;
