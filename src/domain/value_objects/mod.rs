//! Domain value objects.

pub mod snowflake;

pub use snowflake::Snowflake;
