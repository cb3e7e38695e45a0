//! Shared helpers for the HTTP handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::ChatError;
use crate::storage::{ConversationRow, MessageRow};

/// Build a standard JSON error response.
pub fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    let body = serde_json::json!({ "error": message.into() });
    (status, axum::Json(body)).into_response()
}

/// Map a coordinator error to its HTTP shape. Structural errors carry a
/// message suitable for direct display; internal ones do not leak detail.
pub fn chat_error_response(e: ChatError) -> Response {
    let status = match &e {
        ChatError::NotFound(_) => StatusCode::NOT_FOUND,
        ChatError::NotAParticipant(_) => StatusCode::FORBIDDEN,
        ChatError::DuplicateGroup | ChatError::Validation(_) => StatusCode::BAD_REQUEST,
        ChatError::SendFailed(_) | ChatError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    api_error(status, e.to_string())
}

/// JSON representation of a conversation; `unread` is the viewing user's own
/// counter when the caller identifies one.
pub fn conversation_to_json(c: &ConversationRow, unread: Option<u32>) -> serde_json::Value {
    let mut json = serde_json::json!({
        "conversation_id": c.conversation_id,
        "is_group": c.is_group,
        "group_name": c.group_name,
        "group_admin": c.group_admin,
        "participants": c.participants,
        "last_message_id": c.last_message_id,
        "last_message_time": c.last_message_time,
        "created_at": c.created_at,
    });
    if let Some(unread) = unread {
        json["unread_count"] = serde_json::json!(unread);
    }
    json
}

pub fn message_to_json(m: &MessageRow) -> serde_json::Value {
    serde_json::json!({
        "message_id": m.message_id,
        "conversation_id": m.conversation_id,
        "sender_id": m.sender_id,
        "body": m.body,
        "image_url": m.image_url,
        "created_at": m.created_at,
    })
}
