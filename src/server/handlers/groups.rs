//! Group creation handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::server::state::ChatState;
use crate::server::utils::{chat_error_response, conversation_to_json};

#[derive(Deserialize)]
pub struct CreateGroupRequest {
    creator_id: String,
    group_name: String,
    members: Vec<String>,
}

/// POST /api/groups - Create a group conversation with the creator as admin.
pub async fn create_group_handler(
    State(state): State<ChatState>,
    axum::Json(req): axum::Json<CreateGroupRequest>,
) -> Response {
    match state
        .resolver
        .create_group(&req.creator_id, &req.group_name, &req.members)
        .await
    {
        Ok(conversation) => (
            StatusCode::CREATED,
            axum::Json(conversation_to_json(&conversation, None)),
        )
            .into_response(),
        Err(e) => chat_error_response(e),
    }
}
