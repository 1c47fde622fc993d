//! Presentation layer: HTTP API and WebSocket gateway.

pub mod http;
pub mod middleware;
pub mod websocket;
