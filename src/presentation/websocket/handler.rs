//! WebSocket Connection Handler
//!
//! Drives one connection through its lifecycle: handshake, Hello, the
//! Subscribe exchange, then a read loop that only watches for Close. All
//! delivery to the socket goes through the per-connection mpsc queue the
//! gateway holds the sending half of.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{SinkExt, StreamExt};
use jsonwebtoken::{decode, DecodingKey, Validation};
use tokio::sync::mpsc;
use tokio::time::timeout;
use uuid::Uuid;

use super::gateway::ConnectionHandle;
use super::messages::{GatewayReceive, GatewaySend, OpCode, SubscribePayload};
use crate::application::services::Claims;
use crate::domain::Snowflake;
use crate::startup::AppState;

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle an individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();

    tracing::debug!(connection_id = %connection_id, "New WebSocket connection");

    let (mut sender, mut receiver) = socket.split();

    // Outbound frame queue; the gateway holds the sending half once the
    // connection is registered.
    let (tx, mut rx) = mpsc::unbounded_channel::<GatewaySend>();

    // Hello goes out directly, before any registration.
    let hello = match serde_json::to_string(&GatewaySend::hello()) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!("Failed to serialize Hello: {}", e);
            return;
        }
    };
    if let Err(e) = sender.send(Message::Text(hello.into())).await {
        tracing::debug!(connection_id = %connection_id, "Failed to send Hello: {}", e);
        return;
    }

    // Forward queued frames to the socket until the queue closes.
    let sender_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            let text = match serde_json::to_string(&frame) {
                Ok(t) => t,
                Err(e) => {
                    tracing::error!("Failed to serialize frame: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Wait for Subscribe (with timeout).
    let subscribe_timeout = Duration::from_secs(state.settings.websocket.subscribe_timeout_secs);
    let subscribe = match timeout(subscribe_timeout, read_subscribe(&mut receiver)).await {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            tracing::debug!(connection_id = %connection_id, "Connection closed before Subscribe");
            sender_task.abort();
            return;
        }
        Err(_) => {
            tracing::debug!(connection_id = %connection_id, "Subscribe timeout");
            let _ = tx.send(GatewaySend::invalid_session());
            tokio::time::sleep(Duration::from_millis(100)).await;
            sender_task.abort();
            return;
        }
    };

    // Validate the token before registering anything.
    let user_id = match validate_token(&subscribe.token, &state) {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!(connection_id = %connection_id, error = %e, "Invalid token");
            let _ = tx.send(GatewaySend::invalid_session());
            tokio::time::sleep(Duration::from_millis(100)).await;
            sender_task.abort();
            return;
        }
    };

    let channel_id = subscribe.channel_id;
    state.gateway.connect(
        ConnectionHandle {
            id: connection_id.clone(),
            sender: tx.clone(),
        },
        channel_id,
    );

    tracing::info!(
        connection_id = %connection_id,
        user_id = %user_id,
        channel_id = %channel_id,
        "Gateway session established"
    );

    // Inbound frames are otherwise ignored; only Close and errors matter.
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Close(_)) | Err(_) => break,
            _ => continue,
        }
    }

    state.gateway.disconnect(&connection_id);
    sender_task.abort();

    tracing::debug!(connection_id = %connection_id, "WebSocket connection closed");
}

/// Read frames until a Subscribe payload arrives, the peer closes, or the
/// stream errors.
async fn read_subscribe(
    receiver: &mut (impl StreamExt<Item = Result<Message, axum::Error>> + Unpin),
) -> Option<SubscribePayload> {
    while let Some(frame) = receiver.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                let Ok(received) = serde_json::from_str::<GatewayReceive>(&text) else {
                    continue;
                };
                if received.op != OpCode::Subscribe as u8 {
                    continue;
                }
                if let Some(d) = received.d {
                    if let Ok(subscribe) = serde_json::from_value::<SubscribePayload>(d) {
                        return Some(subscribe);
                    }
                }
            }
            Ok(Message::Close(_)) => return None,
            Err(_) => return None,
            _ => continue,
        }
    }
    None
}

fn validate_token(token: &str, state: &AppState) -> Result<Snowflake, String> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.settings.jwt.secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| e.to_string())?;

    token_data
        .claims
        .sub
        .parse()
        .map_err(|_| "invalid subject claim".to_string())
}
