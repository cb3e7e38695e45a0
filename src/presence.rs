//! Presence registry: who is connected right now.
//!
//! Owns the in-memory mapping of user id to active connection ids and the
//! online/offline transition logic, including the disconnect grace period.
//! A user is online while at least one connection is registered for them;
//! a page refresh produces a disconnect immediately followed by a
//! re-register, so the offline transition is debounced: the grace timer
//! re-reads registry state when it fires and stands down if any connection
//! re-registered under the same user in the meantime.
//!
//! The persisted `is_online`/`last_seen` columns are advisory. Writes to
//! them are best-effort and logged on failure; live broadcasts always
//! proceed from in-memory state.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;

use crate::clog;
use crate::delivery::{ConnId, DeliveryTransport};
use crate::events::{ServerEvent, UserStatus};
use crate::logging;
use crate::storage::{now_secs, SharedStorage};

#[derive(Default)]
struct PresenceInner {
    /// User id -> ids of that user's active connections (multi-device).
    user_conns: HashMap<String, HashSet<ConnId>>,
    /// Reverse index: connection id -> owning user.
    conn_owner: HashMap<ConnId, String>,
}

#[derive(Clone)]
pub struct PresenceRegistry {
    inner: Arc<Mutex<PresenceInner>>,
    storage: SharedStorage,
    transport: DeliveryTransport,
    grace: Duration,
}

impl PresenceRegistry {
    /// `grace` is the disconnect debounce window (5 s in production, shorter
    /// in tests).
    pub fn new(storage: SharedStorage, transport: DeliveryTransport, grace: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PresenceInner::default())),
            storage,
            transport,
            grace,
        }
    }

    /// Record `conn` as an active connection of `user_id`.
    ///
    /// The new connection always receives the full status snapshot. If this
    /// is the user's first active connection, the online transition is
    /// persisted and broadcast to everyone together with the refreshed
    /// online-user list.
    pub async fn register(&self, user_id: &str, conn: ConnId) {
        let (first_connection, online_users) = {
            let mut inner = self.inner.lock().await;
            inner.conn_owner.insert(conn, user_id.to_string());
            let conns = inner.user_conns.entry(user_id.to_string()).or_default();
            conns.insert(conn);
            let first = conns.len() == 1;
            (first, sorted_keys(&inner.user_conns))
        };

        let now = now_secs();
        self.persist_presence(user_id, true, now).await;
        self.push_snapshot(conn).await;

        if first_connection {
            clog!(
                "presence: {} online",
                logging::user_id(user_id)
            );
            self.transport
                .broadcast(&ServerEvent::UserStatusUpdate {
                    user_id: user_id.to_string(),
                    is_online: true,
                    last_seen: now,
                })
                .await;
            self.transport
                .broadcast(&ServerEvent::UpdateUserList {
                    users: online_users,
                })
                .await;
        }
    }

    /// Refresh a connected-but-idle user's last-seen timestamp and
    /// re-broadcast their status. Connection bookkeeping is untouched.
    pub async fn heartbeat(&self, user_id: &str) {
        let now = now_secs();
        self.persist_presence(user_id, true, now).await;
        self.transport
            .broadcast(&ServerEvent::UserStatusUpdate {
                user_id: user_id.to_string(),
                is_online: true,
                last_seen: now,
            })
            .await;
    }

    /// Handle a dropped connection. The connection mapping is removed
    /// immediately; the offline transition is deferred by the grace period
    /// and cancelled by any re-registration under the same user.
    pub async fn disconnect(&self, conn: ConnId) {
        let user_id = {
            let mut inner = self.inner.lock().await;
            let Some(user_id) = inner.conn_owner.remove(&conn) else {
                return;
            };
            if let Some(conns) = inner.user_conns.get_mut(&user_id) {
                conns.remove(&conn);
                if conns.is_empty() {
                    inner.user_conns.remove(&user_id);
                }
            }
            user_id
        };

        let registry = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(registry.grace).await;
            registry.confirm_offline(&user_id).await;
        });
    }

    /// Grace-period expiry check: reads current registry state, so a user
    /// who re-registered during the window is left alone.
    async fn confirm_offline(&self, user_id: &str) {
        let online_users = {
            let inner = self.inner.lock().await;
            if inner.user_conns.contains_key(user_id) {
                return;
            }
            sorted_keys(&inner.user_conns)
        };

        let now = now_secs();
        self.persist_presence(user_id, false, now).await;
        clog!("presence: {} offline", logging::user_id(user_id));

        self.transport
            .broadcast(&ServerEvent::UserStatusUpdate {
                user_id: user_id.to_string(),
                is_online: false,
                last_seen: now,
            })
            .await;
        self.transport
            .broadcast(&ServerEvent::UpdateUserList {
                users: online_users,
            })
            .await;
    }

    /// Push the full status snapshot (every known user, online flag + last
    /// seen) to a single connection. Used on register and on explicit
    /// request from clients that missed the initial snapshot.
    pub async fn push_snapshot(&self, conn: ConnId) {
        let users = {
            let storage = self.storage.lock().await;
            match storage.list_users() {
                Ok(users) => users,
                Err(e) => {
                    clog!("presence: failed to load users for snapshot: {e}");
                    return;
                }
            }
        };

        let inner = self.inner.lock().await;
        let statuses = users
            .into_iter()
            .map(|u| {
                let online = inner.user_conns.contains_key(&u.user_id);
                (
                    u.user_id,
                    UserStatus {
                        is_online: online,
                        last_seen: u.last_seen,
                    },
                )
            })
            .collect();
        drop(inner);

        self.transport
            .send_to(conn, ServerEvent::InitialStatusData { statuses })
            .await;
    }

    pub async fn is_online(&self, user_id: &str) -> bool {
        self.inner.lock().await.user_conns.contains_key(user_id)
    }

    /// All active connection ids of a user, empty when offline.
    pub async fn conns_for(&self, user_id: &str) -> Vec<ConnId> {
        self.inner
            .lock()
            .await
            .user_conns
            .get(user_id)
            .map(|conns| conns.iter().copied().collect())
            .unwrap_or_default()
    }

    pub async fn online_users(&self) -> Vec<String> {
        sorted_keys(&self.inner.lock().await.user_conns)
    }

    /// Best-effort persisted presence write. In-memory state stays
    /// authoritative, so failures only cost the next snapshot some accuracy.
    async fn persist_presence(&self, user_id: &str, is_online: bool, last_seen: u64) {
        let storage = self.storage.lock().await;
        match storage.set_user_presence(user_id, is_online, last_seen) {
            Ok(true) => {}
            Ok(false) => clog!(
                "presence: no user row for {}, status not persisted",
                logging::user_id(user_id)
            ),
            Err(e) => clog!(
                "presence: failed to persist status for {}: {e}",
                logging::user_id(user_id)
            ),
        }
    }
}

fn sorted_keys(map: &HashMap<String, HashSet<ConnId>>) -> Vec<String> {
    let mut keys: Vec<String> = map.keys().cloned().collect();
    keys.sort();
    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    fn test_registry(grace: Duration) -> (PresenceRegistry, DeliveryTransport) {
        let storage: SharedStorage =
            Arc::new(Mutex::new(Storage::open_in_memory().unwrap()));
        let transport = DeliveryTransport::new();
        let registry = PresenceRegistry::new(storage, transport.clone(), grace);
        (registry, transport)
    }

    #[tokio::test]
    async fn test_online_tracks_connection_count() {
        let (registry, transport) = test_registry(Duration::from_millis(10));
        let (c1, _rx1) = transport.attach().await;
        let (c2, _rx2) = transport.attach().await;

        registry.register("alice", c1).await;
        registry.register("alice", c2).await;
        assert!(registry.is_online("alice").await);
        assert_eq!(registry.conns_for("alice").await.len(), 2);

        // One device drops: still online even after the grace period.
        registry.disconnect(c1).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(registry.is_online("alice").await);

        registry.disconnect(c2).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(!registry.is_online("alice").await);
    }

    #[tokio::test]
    async fn test_disconnect_of_unknown_connection_is_ignored() {
        let (registry, _transport) = test_registry(Duration::from_millis(10));
        registry.disconnect(999).await;
        assert!(registry.online_users().await.is_empty());
    }

    #[tokio::test]
    async fn test_online_users_sorted() {
        let (registry, transport) = test_registry(Duration::from_millis(10));
        let (c1, _rx1) = transport.attach().await;
        let (c2, _rx2) = transport.attach().await;
        registry.register("zoe", c1).await;
        registry.register("amir", c2).await;
        assert_eq!(registry.online_users().await, vec!["amir", "zoe"]);
    }
}
