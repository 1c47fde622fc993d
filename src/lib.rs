//! # Rollplayer Chat
//!
//! Backend server for Rollplayer Chat:
//! - Snowflake identifiers: time-sortable 64-bit IDs minted without
//!   coordination, carrying a category tag and a per-millisecond sequence
//! - Cursor-based message history pagination over those IDs
//! - A WebSocket gateway that fans messages out to per-channel delivery
//!   groups
//! - RESTful HTTP API for accounts, servers, and messages
//!
//! ## Module Structure
//!
//! ```text
//! rollplayer_chat/
//! +-- config/         Configuration management
//! +-- domain/         Entities, value objects, repository traits
//! +-- application/    Services and DTOs
//! +-- infrastructure/ Database pool and repository implementations
//! +-- presentation/   HTTP routes and WebSocket gateway
//! +-- shared/         Errors and the snowflake generator
//! ```

// Configuration module
pub mod config;

// Domain layer
pub mod domain;

// Application layer
pub mod application;

// Infrastructure layer
pub mod infrastructure;

// Presentation layer
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
