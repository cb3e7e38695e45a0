//! Health check endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::server::state::ChatState;

pub async fn health_handler(State(state): State<ChatState>) -> impl IntoResponse {
    let user_count = {
        let storage = state.storage.lock().await;
        storage.list_users().map(|u| u.len()).unwrap_or(0)
    };
    let online = state.presence.online_users().await.len();
    let connections = state.transport.connection_count().await;

    let body = serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "users": user_count,
        "online": online,
        "connections": connections,
    });
    (StatusCode::OK, axum::Json(body))
}
