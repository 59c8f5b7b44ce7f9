use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};

use crate::state::AppState;
use crate::ws::hub::Hub;

/// HTTP handler that upgrades the request to a viewer WebSocket.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state.hub))
}

/// Drive one viewer connection.
///
/// A writer task forwards hub frames to the socket. The read loop carries no
/// payload; it only watches for the peer going away so the viewer can be
/// unregistered.
async fn handle_socket(socket: WebSocket, hub: Arc<Hub>) {
    let conn_id = uuid::Uuid::new_v4().to_string();
    tracing::info!(conn_id = %conn_id, "Viewer connected");

    let mut rx = hub.register(conn_id.clone()).await;
    let (mut sink, mut stream) = socket.split();

    let writer_conn_id = conn_id.clone();
    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let closing = matches!(msg, Message::Close(_));
            if sink.send(msg).await.is_err() {
                tracing::debug!(conn_id = %writer_conn_id, "Viewer socket closed");
                break;
            }
            if closing {
                break;
            }
        }
    });

    let reader_conn_id = conn_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = stream.next().await {
            match result {
                Ok(Message::Close(_)) => break,
                Ok(Message::Pong(_)) => {
                    tracing::trace!(conn_id = %reader_conn_id, "Pong received");
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(conn_id = %reader_conn_id, error = %e, "Viewer receive error");
                    break;
                }
            }
        }
    });

    // Whichever side finishes first ends the connection.
    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    hub.unregister(&conn_id).await;
    tracing::info!(conn_id = %conn_id, "Viewer disconnected");
}
