//! Axum router construction.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::server::config::MAX_UPLOAD_SIZE;
use crate::server::handlers;
use crate::server::state::ChatState;

/// Build the complete axum router with all API routes.
pub fn build_router(state: ChatState) -> Router {
    Router::new()
        // Health
        .route("/api/health", get(handlers::health::health_handler))
        // Users API
        .route(
            "/api/users",
            get(handlers::users::list_users_handler).post(handlers::users::create_user_handler),
        )
        // Conversations API
        .route(
            "/api/conversations",
            get(handlers::conversations::list_conversations_handler)
                .post(handlers::conversations::create_conversation_handler),
        )
        .route(
            "/api/conversations/:conversation_id/messages",
            get(handlers::conversations::list_messages_handler),
        )
        // Groups API
        .route("/api/groups", post(handlers::groups::create_group_handler))
        // Image uploads
        .route(
            "/api/upload/image",
            post(handlers::uploads::upload_image_handler)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE as usize + 4096)),
        )
        .route(
            "/uploads/:filename",
            get(handlers::uploads::serve_upload_handler),
        )
        // WebSocket
        .route("/api/ws", get(handlers::websocket::ws_handler))
        .with_state(state)
}
