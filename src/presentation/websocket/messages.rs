//! WebSocket Message Types
//!
//! Gateway frame formats. The protocol is deliberately small: the server
//! sends Hello on open, the client answers Subscribe with a token and the
//! channel it wants, and from then on the server pushes Dispatch frames.
//! All other inbound frames are ignored.

use serde::{Deserialize, Serialize};

use crate::domain::Snowflake;

/// Gateway opcodes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OpCode {
    /// Event dispatch (server -> client)
    Dispatch = 0,
    /// Subscribe to a channel (client -> server)
    Subscribe = 2,
    /// Invalid session, the server is about to close
    InvalidSession = 9,
    /// Hello, sent on open
    Hello = 10,
}

/// Incoming gateway frame
#[derive(Debug, Deserialize)]
pub struct GatewayReceive {
    pub op: u8,
    pub d: Option<serde_json::Value>,
}

/// Outgoing gateway frame
#[derive(Debug, Clone, Serialize)]
pub struct GatewaySend {
    pub op: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

impl GatewaySend {
    pub fn hello() -> Self {
        Self {
            op: OpCode::Hello as u8,
            d: None,
            t: None,
        }
    }

    pub fn invalid_session() -> Self {
        Self {
            op: OpCode::InvalidSession as u8,
            d: Some(serde_json::Value::Bool(false)),
            t: None,
        }
    }

    pub fn dispatch(event: &str, payload: serde_json::Value) -> Self {
        Self {
            op: OpCode::Dispatch as u8,
            d: Some(payload),
            t: Some(event.to_string()),
        }
    }
}

/// Subscribe payload (op 2)
#[derive(Debug, Deserialize)]
pub struct SubscribePayload {
    pub token: String,
    pub channel_id: Snowflake,
}
