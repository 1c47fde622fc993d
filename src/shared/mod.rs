//! Shared utilities used across all layers.

pub mod error;
pub mod snowflake;
