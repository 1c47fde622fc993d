//! Infrastructure layer: database pool and repository implementations.

pub mod database;
pub mod repositories;
