//! Delivery transport: fan-out of server events to live connections.
//!
//! Each WebSocket connection attaches here and receives an id plus the
//! receiving end of an unbounded channel; its socket task forwards whatever
//! arrives on that channel. Sends are independent and non-blocking per
//! recipient, so a slow or dead connection never stalls delivery to others.
//! All sends are best-effort: a closed channel is simply skipped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::RwLock;

use crate::events::ServerEvent;

/// Opaque handle for one live connection.
pub type ConnId = u64;

#[derive(Clone, Default)]
pub struct DeliveryTransport {
    conns: Arc<RwLock<HashMap<ConnId, UnboundedSender<ServerEvent>>>>,
    next_conn_id: Arc<AtomicU64>,
}

impl DeliveryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connection. Returns its id and the channel the socket
    /// task should drain.
    pub async fn attach(&self) -> (ConnId, UnboundedReceiver<ServerEvent>) {
        let conn_id = self.next_conn_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();
        self.conns.write().await.insert(conn_id, tx);
        (conn_id, rx)
    }

    /// Remove a connection. Idempotent.
    pub async fn detach(&self, conn_id: ConnId) {
        self.conns.write().await.remove(&conn_id);
    }

    pub async fn connection_count(&self) -> usize {
        self.conns.read().await.len()
    }

    /// Unicast to a single connection. Returns false if the connection is
    /// gone or its channel is closed.
    pub async fn send_to(&self, conn_id: ConnId, event: ServerEvent) -> bool {
        let conns = self.conns.read().await;
        match conns.get(&conn_id) {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    /// Multicast to a set of connections, e.g. every active connection of
    /// one user or of a group's online participants.
    pub async fn send_to_many(&self, conn_ids: &[ConnId], event: &ServerEvent) {
        let conns = self.conns.read().await;
        for conn_id in conn_ids {
            if let Some(tx) = conns.get(conn_id) {
                let _ = tx.send(event.clone());
            }
        }
    }

    /// Broadcast to every currently attached connection.
    pub async fn broadcast(&self, event: &ServerEvent) {
        let conns = self.conns.read().await;
        for tx in conns.values() {
            let _ = tx.send(event.clone());
        }
    }
}
