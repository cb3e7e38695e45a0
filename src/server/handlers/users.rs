//! User listing and provisioning handlers.
//!
//! Thin CRUD wrappers over the store. Authentication itself (passwords,
//! tokens) lives in an external service; these endpoints deal in plain user
//! ids. The online flag in listings comes from the live presence registry,
//! not the advisory persisted column.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use crate::server::state::ChatState;
use crate::server::utils::api_error;
use crate::storage::{generate_id, now_secs, UserRow};

pub async fn list_users_handler(State(state): State<ChatState>) -> Response {
    let users = {
        let storage = state.storage.lock().await;
        match storage.list_users() {
            Ok(users) => users,
            Err(e) => return api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        }
    };

    let mut json = Vec::with_capacity(users.len());
    for u in users {
        let is_online = state.presence.is_online(&u.user_id).await;
        json.push(serde_json::json!({
            "user_id": u.user_id,
            "username": u.username,
            "is_online": is_online,
            "last_seen": u.last_seen,
        }));
    }
    (StatusCode::OK, axum::Json(serde_json::json!(json))).into_response()
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    username: String,
}

pub async fn create_user_handler(
    State(state): State<ChatState>,
    axum::Json(req): axum::Json<CreateUserRequest>,
) -> Response {
    let username = req.username.trim();
    if username.is_empty() {
        return api_error(StatusCode::BAD_REQUEST, "username is required");
    }

    let user = UserRow {
        user_id: generate_id(),
        username: username.to_string(),
        is_online: false,
        last_seen: None,
        created_at: now_secs(),
    };

    let storage = state.storage.lock().await;
    match storage.insert_user(&user) {
        Ok(()) => {
            let json = serde_json::json!({
                "user_id": user.user_id,
                "username": user.username,
            });
            (StatusCode::CREATED, axum::Json(json)).into_response()
        }
        Err(e) => api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}
