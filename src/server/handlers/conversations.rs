//! Conversation listing, creation, and history handlers.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::server::config::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::server::state::ChatState;
use crate::server::utils::{
    api_error, chat_error_response, conversation_to_json, message_to_json,
};

#[derive(Deserialize)]
pub struct ListConversationsQuery {
    user_id: String,
}

/// GET /api/conversations?user_id= - A user's conversations, newest activity
/// first, each carrying that user's own unread count.
pub async fn list_conversations_handler(
    State(state): State<ChatState>,
    Query(params): Query<ListConversationsQuery>,
) -> Response {
    let storage = state.storage.lock().await;
    match storage.list_user_conversations(&params.user_id) {
        Ok(conversations) => {
            let json: Vec<serde_json::Value> = conversations
                .iter()
                .map(|(c, unread)| conversation_to_json(c, Some(*unread)))
                .collect();
            (StatusCode::OK, axum::Json(serde_json::json!(json))).into_response()
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

#[derive(Deserialize)]
pub struct CreateConversationRequest {
    participants: Vec<String>,
}

/// POST /api/conversations - Find or create the direct conversation for a
/// participant pair.
pub async fn create_conversation_handler(
    State(state): State<ChatState>,
    axum::Json(req): axum::Json<CreateConversationRequest>,
) -> Response {
    let [user_a, user_b] = req.participants.as_slice() else {
        return api_error(
            StatusCode::BAD_REQUEST,
            "exactly two participants are required",
        );
    };

    match state.resolver.resolve_direct(user_a, user_b).await {
        Ok(conversation) => (
            StatusCode::OK,
            axum::Json(conversation_to_json(&conversation, None)),
        )
            .into_response(),
        Err(e) => chat_error_response(e),
    }
}

#[derive(Deserialize)]
pub struct ListMessagesQuery {
    user_id: String,
    page: Option<u32>,
    limit: Option<u32>,
}

/// GET /api/conversations/:id/messages - Paginated history. Pages count
/// backwards from the newest message; each page is returned oldest-first.
pub async fn list_messages_handler(
    State(state): State<ChatState>,
    Path(conversation_id): Path<String>,
    Query(params): Query<ListMessagesQuery>,
) -> Response {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    // Participant check doubles as the existence check.
    if let Err(e) = state
        .resolver
        .resolve_by_id(&conversation_id, &params.user_id)
        .await
    {
        return chat_error_response(e);
    }

    let storage = state.storage.lock().await;
    let total = match storage.count_messages(&conversation_id) {
        Ok(total) => total,
        Err(e) => return api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    match storage.list_conversation_messages(&conversation_id, page, limit) {
        Ok(messages) => {
            let total_pages = total.div_ceil(limit as u64);
            let json = serde_json::json!({
                "messages": messages.iter().map(message_to_json).collect::<Vec<_>>(),
                "current_page": page,
                "total_pages": total_pages,
            });
            (StatusCode::OK, axum::Json(json)).into_response()
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
