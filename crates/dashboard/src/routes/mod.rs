pub mod health;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;
use crate::ws;

/// Viewer WebSocket endpoint.
pub fn ws_routes() -> Router<AppState> {
    Router::new().route("/ws", get(ws::ws_handler))
}
