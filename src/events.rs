//! Wire event types exchanged over the WebSocket.
//!
//! Inbound frames deserialize to [`ClientEvent`], outbound frames serialize
//! from [`ServerEvent`]. Both are internally tagged on `type` so the JSON
//! matches what a browser client dispatches on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Where a message should go, resolved once at the socket entry point so the
/// rest of the pipeline never has to guess whether an id names a user or a
/// conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeliveryTarget {
    /// Direct message to a single user; the pair's conversation is found or
    /// created on first contact.
    User { id: String },
    /// Message into an existing (typically group) conversation by id.
    Conversation { id: String },
}

/// Events sent by clients.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    Register {
        user_id: String,
    },
    Heartbeat {
        user_id: String,
    },
    RequestInitialStatus,
    SendMessage {
        sender_id: String,
        target: DeliveryTarget,
        text: String,
    },
    SendImageMessage {
        sender_id: String,
        target: DeliveryTarget,
        image_url: String,
    },
    MarkSeen {
        conversation_id: String,
        user_id: String,
    },
}

/// Per-user status entry in the initial snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStatus {
    pub is_online: bool,
    pub last_seen: Option<u64>,
}

/// Events pushed to connected clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    UserStatusUpdate {
        user_id: String,
        is_online: bool,
        last_seen: u64,
    },
    UpdateUserList {
        users: Vec<String>,
    },
    InitialStatusData {
        statuses: HashMap<String, UserStatus>,
    },
    ReceiveMessage {
        message_id: String,
        conversation_id: String,
        sender_id: String,
        body: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        image_url: Option<String>,
        created_at: u64,
        unread_count: u32,
    },
    MessageNotification {
        sender_id: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        sender_name: Option<String>,
        message: String,
        conversation_id: String,
        is_group: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        group_name: Option<String>,
    },
    ReadReceiptUpdate {
        conversation_id: String,
        user_id: String,
        seen_at: u64,
    },
    Error {
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_tagged_decoding() {
        let frame = r#"{"type":"send_message","sender_id":"alice",
            "target":{"kind":"user","id":"bob"},"text":"hi"}"#;
        let event: ClientEvent = serde_json::from_str(frame).unwrap();
        match event {
            ClientEvent::SendMessage {
                sender_id,
                target,
                text,
            } => {
                assert_eq!(sender_id, "alice");
                assert_eq!(target, DeliveryTarget::User { id: "bob".into() });
                assert_eq!(text, "hi");
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_conversation_target_decoding() {
        let frame = r#"{"type":"mark_seen","conversation_id":"c1","user_id":"bob"}"#;
        assert!(matches!(
            serde_json::from_str::<ClientEvent>(frame).unwrap(),
            ClientEvent::MarkSeen { .. }
        ));

        let frame = r#"{"type":"send_image_message","sender_id":"a",
            "target":{"kind":"conversation","id":"c9"},"image_url":"/uploads/x.png"}"#;
        let event: ClientEvent = serde_json::from_str(frame).unwrap();
        match event {
            ClientEvent::SendImageMessage { target, .. } => {
                assert_eq!(target, DeliveryTarget::Conversation { id: "c9".into() });
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn test_server_event_encoding_shape() {
        let event = ServerEvent::ReceiveMessage {
            message_id: "m1".into(),
            conversation_id: "c1".into(),
            sender_id: "alice".into(),
            body: "hello".into(),
            image_url: None,
            created_at: 42,
            unread_count: 3,
        };
        let json: serde_json::Value = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "receive_message");
        assert_eq!(json["unread_count"], 3);
        // Absent image omitted entirely rather than serialized as null
        assert!(json.get("image_url").is_none());
    }
}
