use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes;
use crate::state::AppState;

/// Build the dashboard router: health, viewer socket and the static frontend
/// as fallback.
pub fn build_router(state: AppState) -> Router {
    let frontend = ServeDir::new(&state.config.frontend_dir);

    Router::new()
        .merge(routes::health::router())
        .merge(routes::ws_routes())
        .fallback_service(frontend)
        .layer(CatchPanicLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}
