//! WebSocket Gateway
//!
//! The channel-scoped broadcaster: tracks live connections grouped by the
//! channel they subscribed to and fans a serialized frame out to every
//! connection in a channel. Delivery is best-effort and non-persistent; a
//! connection that is not registered at broadcast time gets nothing, ever.

use dashmap::DashMap;
use tokio::sync::mpsc;

use super::messages::GatewaySend;
use crate::domain::Snowflake;

/// A registered connection: its identity plus the sending half of its
/// outbound frame queue. The gateway owns the registry exclusively; no other
/// component holds connection references.
#[derive(Debug, Clone)]
pub struct ConnectionHandle {
    pub id: String,
    pub sender: mpsc::UnboundedSender<GatewaySend>,
}

/// WebSocket gateway managing all connections.
///
/// The registry maps channel ID to the set of connections subscribed to it.
/// DashMap's per-entry locking provides the per-channel mutual exclusion the
/// delivery contract needs: a `connect` that completes before a `broadcast`
/// is observed by it, a completed `disconnect` is not, and calls racing a
/// broadcast may go either way.
pub struct Gateway {
    /// Channel ID -> connections currently subscribed to it
    channels: DashMap<Snowflake, Vec<ConnectionHandle>>,
    /// Connection ID -> the channel it is registered under, for O(1)
    /// disconnect lookup. A connection belongs to exactly one channel.
    connections: DashMap<String, Snowflake>,
}

impl Gateway {
    pub fn new() -> Self {
        Self {
            channels: DashMap::new(),
            connections: DashMap::new(),
        }
    }

    /// Register a connection under a channel. Called once the websocket
    /// handshake and subscribe exchange have completed. Registering the same
    /// connection twice is a caller bug; the registry appends and does not
    /// defend against it.
    pub fn connect(&self, connection: ConnectionHandle, channel_id: Snowflake) {
        let connection_id = connection.id.clone();
        self.connections.insert(connection_id.clone(), channel_id);
        self.channels.entry(channel_id).or_default().push(connection);

        tracing::info!(
            connection_id = %connection_id,
            channel_id = %channel_id,
            "Connection registered"
        );
    }

    /// Remove a connection from whichever channel holds it. Safe to call for
    /// a connection that was never registered (no-op).
    pub fn disconnect(&self, connection_id: &str) {
        if let Some((_, channel_id)) = self.connections.remove(connection_id) {
            if let Some(mut connections) = self.channels.get_mut(&channel_id) {
                connections.retain(|c| c.id != connection_id);
            }

            tracing::info!(
                connection_id = %connection_id,
                channel_id = %channel_id,
                "Connection unregistered"
            );
        }
    }

    /// Deliver a frame to every connection registered under `channel_id`.
    ///
    /// A failed send means the receiving task is gone; that connection is
    /// evicted on the spot and delivery continues to the rest. Returns the
    /// number of connections the frame was handed to.
    pub fn broadcast(&self, channel_id: Snowflake, frame: GatewaySend) -> usize {
        let mut delivered = 0;
        let mut evicted: Vec<String> = Vec::new();

        if let Some(mut connections) = self.channels.get_mut(&channel_id) {
            connections.retain(|connection| match connection.sender.send(frame.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(_) => {
                    evicted.push(connection.id.clone());
                    false
                }
            });
        }

        // The channel entry lock is released before touching the reverse map.
        for connection_id in &evicted {
            self.connections.remove(connection_id);
            tracing::debug!(
                connection_id = %connection_id,
                channel_id = %channel_id,
                "Evicted connection after failed delivery"
            );
        }

        delivered
    }

    /// Total number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Number of connections registered under one channel.
    pub fn channel_connection_count(&self, channel_id: Snowflake) -> usize {
        self.channels
            .get(&channel_id)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn connection(id: &str) -> (ConnectionHandle, UnboundedReceiver<GatewaySend>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            ConnectionHandle {
                id: id.to_string(),
                sender: tx,
            },
            rx,
        )
    }

    fn frame() -> GatewaySend {
        GatewaySend::dispatch("MESSAGE_CREATE", serde_json::json!({"content": "hello"}))
    }

    #[tokio::test]
    async fn broadcast_reaches_only_the_target_channel() {
        let gateway = Gateway::new();
        let (a, mut a_rx) = connection("a");
        let (b, mut b_rx) = connection("b");
        let (c, mut c_rx) = connection("c");

        gateway.connect(a, Snowflake::new(42));
        gateway.connect(b, Snowflake::new(42));
        gateway.connect(c, Snowflake::new(7));

        let delivered = gateway.broadcast(Snowflake::new(42), frame());
        assert_eq!(delivered, 2);

        assert!(a_rx.try_recv().is_ok());
        assert!(b_rx.try_recv().is_ok());
        assert!(c_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn disconnect_before_broadcast_delivers_nothing() {
        let gateway = Gateway::new();
        let (conn, mut rx) = connection("a");

        gateway.connect(conn, Snowflake::new(42));
        gateway.disconnect("a");

        let delivered = gateway.broadcast(Snowflake::new(42), frame());
        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
        assert_eq!(gateway.connection_count(), 0);
    }

    #[tokio::test]
    async fn failed_delivery_evicts_without_aborting_the_rest() {
        let gateway = Gateway::new();
        let (dead, dead_rx) = connection("dead");
        let (live, mut live_rx) = connection("live");

        gateway.connect(dead, Snowflake::new(42));
        gateway.connect(live, Snowflake::new(42));

        // Dropping the receiver makes every send to it fail.
        drop(dead_rx);

        let delivered = gateway.broadcast(Snowflake::new(42), frame());
        assert_eq!(delivered, 1);
        assert!(live_rx.try_recv().is_ok());

        assert_eq!(gateway.channel_connection_count(Snowflake::new(42)), 1);
        assert_eq!(gateway.connection_count(), 1);
    }

    #[tokio::test]
    async fn disconnecting_an_unknown_connection_is_a_noop() {
        let gateway = Gateway::new();
        gateway.disconnect("never-registered");
        assert_eq!(gateway.connection_count(), 0);
    }

    #[tokio::test]
    async fn broadcast_to_empty_channel_delivers_zero() {
        let gateway = Gateway::new();
        assert_eq!(gateway.broadcast(Snowflake::new(42), frame()), 0);
    }
}
