//! HTTP request handlers.

pub mod auth;
pub mod health;
pub mod message;
pub mod server;
pub mod snowflake;
pub mod user;
