//! Message dispatcher: persist, count, fan out.
//!
//! A message is considered sent once it is persisted; everything after that
//! (real-time delivery, pop-up notifications) is best-effort and recovered
//! by clients through history fetches if it is missed.

use std::collections::HashMap;

use crate::clog;
use crate::delivery::DeliveryTransport;
use crate::error::ChatError;
use crate::events::ServerEvent;
use crate::logging;
use crate::presence::PresenceRegistry;
use crate::storage::{generate_id, now_secs, ConversationRow, MessageRow, SharedStorage};

#[derive(Clone)]
pub struct MessageDispatcher {
    storage: SharedStorage,
    presence: PresenceRegistry,
    transport: DeliveryTransport,
}

impl MessageDispatcher {
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

    /// Send a message into a resolved conversation.
    ///
    /// Persists the message, updates the conversation's last-message pointer
    /// and every other participant's unread counter, then delivers to each
    /// online recipient (with that recipient's own unread value) and echoes
    /// to the sender with unread fixed at zero. Only persistence failures
    /// are surfaced; delivery failures are logged and swallowed.
    pub async fn send(
        &self,
        conversation: &ConversationRow,
        sender_id: &str,
        text: &str,
        image_url: Option<&str>,
    ) -> Result<MessageRow, ChatError> {
        if !conversation.is_participant(sender_id) {
            return Err(ChatError::NotAParticipant(sender_id.to_string()));
        }

        let message = MessageRow {
            message_id: generate_id(),
            conversation_id: conversation.conversation_id.clone(),
            sender_id: sender_id.to_string(),
            body: text.to_string(),
            image_url: image_url.map(|u| u.to_string()),
            created_at: now_secs(),
        };

        let recipients: Vec<&str> = conversation
            .participants
            .iter()
            .map(|p| p.as_str())
            .filter(|p| *p != sender_id)
            .collect();

        // Persist message, conversation metadata, and counters under one
        // storage lock; collect the per-recipient unread values and the
        // sender's display name for the fan-out that follows.
        let (unread_counts, sender_name) = {
            let storage = self.storage.lock().await;
            storage
                .insert_message(&message)
                .map_err(|e| ChatError::SendFailed(e.to_string()))?;
            storage
                .set_last_message(
                    &message.conversation_id,
                    &message.message_id,
                    message.created_at,
                )
                .map_err(|e| ChatError::SendFailed(e.to_string()))?;
            storage
                .increment_unread_except(&message.conversation_id, sender_id)
                .map_err(|e| ChatError::SendFailed(e.to_string()))?;

            let mut counts: HashMap<String, u32> = HashMap::new();
            for recipient in &recipients {
                match storage.unread_for(&message.conversation_id, recipient) {
                    Ok(unread) => {
                        counts.insert(recipient.to_string(), unread);
                    }
                    Err(e) => {
                        clog!(
                            "dispatch: failed to read unread counter for {}: {e}",
                            logging::user_id(recipient)
                        );
                    }
                }
            }

            // Display name lookup is informational only; a failure degrades
            // the notification, never the send.
            let sender_name = storage
                .get_user(sender_id)
                .ok()
                .flatten()
                .map(|u| u.username);
            (counts, sender_name)
        };

        let mut delivered = 0usize;
        for recipient in &recipients {
            let conns = self.presence.conns_for(recipient).await;
            if conns.is_empty() {
                continue;
            }
            let unread_count = unread_counts.get(*recipient).copied().unwrap_or(0);
            self.transport
                .send_to_many(&conns, &receive_event(&message, unread_count))
                .await;
            self.transport
                .send_to_many(
                    &conns,
                    &ServerEvent::MessageNotification {
                        sender_id: sender_id.to_string(),
                        sender_name: sender_name.clone(),
                        message: message.body.clone(),
                        conversation_id: message.conversation_id.clone(),
                        is_group: conversation.is_group,
                        group_name: conversation.group_name.clone(),
                    },
                )
                .await;
            delivered += 1;
        }

        // Delivery-confirmation echo to every connection of the sender.
        let sender_conns = self.presence.conns_for(sender_id).await;
        if !sender_conns.is_empty() {
            self.transport
                .send_to_many(&sender_conns, &receive_event(&message, 0))
                .await;
        }

        clog!(
            "dispatch: {} -> {} delivered to {delivered}/{} recipient(s)",
            logging::user_id(sender_id),
            logging::conv_id(&message.conversation_id),
            recipients.len()
        );
        Ok(message)
    }
}

fn receive_event(message: &MessageRow, unread_count: u32) -> ServerEvent {
    ServerEvent::ReceiveMessage {
        message_id: message.message_id.clone(),
        conversation_id: message.conversation_id.clone(),
        sender_id: message.sender_id.clone(),
        body: message.body.clone(),
        image_url: message.image_url.clone(),
        created_at: message.created_at,
        unread_count,
    }
}
