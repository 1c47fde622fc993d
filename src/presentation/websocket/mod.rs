//! WebSocket gateway: connection lifecycle, frame formats, and the
//! channel-scoped broadcaster.

pub mod gateway;
pub mod handler;
pub mod messages;

pub use gateway::{ConnectionHandle, Gateway};
pub use handler::ws_handler;
