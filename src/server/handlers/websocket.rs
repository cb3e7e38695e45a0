//! WebSocket upgrade and connection handling.
//!
//! Each accepted socket is one independent task: it drains the outbound
//! channel its connection was attached with, and feeds inbound frames into
//! the coordinator. Structural errors from the core come back to the
//! originating socket as an `error` event; socket loss feeds the presence
//! registry's disconnect debounce.

use axum::extract::ws::{Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::clog;
use crate::delivery::ConnId;
use crate::events::{ClientEvent, DeliveryTarget, ServerEvent};
use crate::server::config::MAX_WS_CONNECTIONS;
use crate::server::state::ChatState;
use crate::server::utils::api_error;

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<ChatState>) -> Response {
    // Check connection limit before upgrading
    if state.transport.connection_count().await >= MAX_WS_CONNECTIONS {
        return api_error(
            StatusCode::SERVICE_UNAVAILABLE,
            format!("too many WebSocket connections (max {MAX_WS_CONNECTIONS})"),
        );
    }

    ws.on_upgrade(|socket| ws_connection(socket, state))
        .into_response()
}

async fn ws_connection(mut socket: WebSocket, state: ChatState) {
    let (conn_id, mut rx) = state.transport.attach().await;

    loop {
        tokio::select! {
            // Forward coordinator events to the WebSocket client
            event = rx.recv() => {
                match event {
                    Some(event) => {
                        if let Ok(json) = serde_json::to_string(&event) {
                            if socket.send(WsMessage::Text(json)).await.is_err() {
                                break; // client disconnected
                            }
                        }
                    }
                    None => break,
                }
            }
            // Handle incoming events from the client
            msg = socket.recv() => {
                match msg {
                    Some(Ok(WsMessage::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(&text) {
                            Ok(event) => handle_client_event(&state, conn_id, event).await,
                            Err(e) => {
                                report_error(&state, conn_id, format!("malformed event: {e}"))
                                    .await;
                            }
                        }
                    }
                    Some(Ok(WsMessage::Ping(data))) => {
                        let _ = socket.send(WsMessage::Pong(data)).await;
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    state.transport.detach(conn_id).await;
    state.presence.disconnect(conn_id).await;
}

async fn handle_client_event(state: &ChatState, conn_id: ConnId, event: ClientEvent) {
    match event {
        ClientEvent::Register { user_id } => {
            state.presence.register(&user_id, conn_id).await;
        }
        ClientEvent::Heartbeat { user_id } => {
            state.presence.heartbeat(&user_id).await;
        }
        ClientEvent::RequestInitialStatus => {
            state.presence.push_snapshot(conn_id).await;
        }
        ClientEvent::SendMessage {
            sender_id,
            target,
            text,
        } => {
            if text.trim().is_empty() {
                report_error(state, conn_id, "message text is required".to_string()).await;
                return;
            }
            handle_send(state, conn_id, &sender_id, target, &text, None).await;
        }
        ClientEvent::SendImageMessage {
            sender_id,
            target,
            image_url,
        } => {
            if image_url.trim().is_empty() {
                report_error(state, conn_id, "image url is required".to_string()).await;
                return;
            }
            handle_send(state, conn_id, &sender_id, target, "", Some(&image_url)).await;
        }
        ClientEvent::MarkSeen {
            conversation_id,
            user_id,
        } => {
            state.receipts.mark_seen(&conversation_id, &user_id).await;
        }
    }
}

/// Resolve the delivery target to a conversation, then hand off to the
/// dispatcher. Structural failures go back to the issuing connection.
async fn handle_send(
    state: &ChatState,
    conn_id: ConnId,
    sender_id: &str,
    target: DeliveryTarget,
    text: &str,
    image_url: Option<&str>,
) {
    let resolved = match &target {
        DeliveryTarget::User { id } => state.resolver.resolve_direct(sender_id, id).await,
        DeliveryTarget::Conversation { id } => state.resolver.resolve_by_id(id, sender_id).await,
    };
    let conversation = match resolved {
        Ok(conversation) => conversation,
        Err(e) => {
            report_error(state, conn_id, e.to_string()).await;
            return;
        }
    };

    if let Err(e) = state
        .dispatcher
        .send(&conversation, sender_id, text, image_url)
        .await
    {
        clog!("websocket: send failed: {e}");
        report_error(state, conn_id, e.to_string()).await;
    }
}

async fn report_error(state: &ChatState, conn_id: ConnId, message: String) {
    state
        .transport
        .send_to(conn_id, ServerEvent::Error { message })
        .await;
}
