//! Read-receipt coordination.
//!
//! A "seen" signal clears the caller's unread counter and, for one-on-one
//! conversations, tells the counterpart their messages were read. Group
//! conversations do not broadcast per-member read receipts; that is a
//! deliberate, documented limitation rather than an oversight. Read
//! receipts are best-effort UX, so nothing here surfaces an error to the
//! caller.

use crate::clog;
use crate::delivery::DeliveryTransport;
use crate::events::ServerEvent;
use crate::logging;
use crate::presence::PresenceRegistry;
use crate::storage::{now_secs, SharedStorage};

#[derive(Clone)]
pub struct ReadReceiptCoordinator {
    storage: SharedStorage,
    presence: PresenceRegistry,
    transport: DeliveryTransport,
}

impl ReadReceiptCoordinator {
    pub fn new(
        storage: SharedStorage,
        presence: PresenceRegistry,
        transport: DeliveryTransport,
    ) -> Self {
        Self {
            storage,
            presence,
            transport,
        }
    }

    /// Mark a conversation as seen by `user_id`. Idempotent: a second call
    /// with the counter already at zero does nothing and notifies no one.
    pub async fn mark_seen(&self, conversation_id: &str, user_id: &str) {
        let (conversation, counter_cleared) = {
            let storage = self.storage.lock().await;
            let conversation = match storage.get_conversation(conversation_id) {
                Ok(Some(c)) => c,
                Ok(None) => {
                    clog!(
                        "receipts: mark_seen on unknown conversation {}",
                        logging::conv_id(conversation_id)
                    );
                    return;
                }
                Err(e) => {
                    clog!("receipts: failed to load conversation: {e}");
                    return;
                }
            };
            let cleared = match storage.reset_unread(conversation_id, user_id) {
                Ok(cleared) => cleared,
                Err(e) => {
                    clog!(
                        "receipts: failed to reset unread for {}: {e}",
                        logging::user_id(user_id)
                    );
                    return;
                }
            };
            (conversation, cleared)
        };

        if !counter_cleared {
            return;
        }

        if conversation.is_group {
            // Per-member read receipts are not emitted for groups.
            return;
        }

        let Some(other) = conversation.other_participant(user_id) else {
            clog!(
                "receipts: no counterpart for {} in {}",
                logging::user_id(user_id),
                logging::conv_id(conversation_id)
            );
            return;
        };

        let conns = self.presence.conns_for(other).await;
        if conns.is_empty() {
            return;
        }
        self.transport
            .send_to_many(
                &conns,
                &ServerEvent::ReadReceiptUpdate {
                    conversation_id: conversation_id.to_string(),
                    user_id: user_id.to_string(),
                    seen_at: now_secs(),
                },
            )
            .await;
    }
}
