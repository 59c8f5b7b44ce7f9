use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use radar_events::KafkaSource;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use radar_dashboard::config::DashboardConfig;
use radar_dashboard::feed::AlertFeed;
use radar_dashboard::router::build_router;
use radar_dashboard::state::AppState;
use radar_dashboard::ws::{self, Hub};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{e:#}"), "Dashboard stopped with error");
        std::process::exit(1);
    }
}

/// `RUST_LOG` sets the filter, `LOG_FORMAT=json` switches to JSON lines.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "radar_dashboard=info,radar_events=info,tower_http=info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run() -> anyhow::Result<()> {
    // --- Configuration ---
    let config = DashboardConfig::from_env().context("Failed to load configuration")?;
    tracing::info!(host = %config.host, port = config.port, topic = %config.alerts_topic, "Loaded dashboard configuration");

    let cancel = CancellationToken::new();
    let hub = Arc::new(Hub::new());

    // --- Alert feed ---
    let source = KafkaSource::subscribe(&config.brokers, &config.alerts_topic, &config.group_id)
        .context("Failed to subscribe to alerts topic")?;
    let feed_handle = tokio::spawn(AlertFeed::new(source, Arc::clone(&hub)).run(cancel.child_token()));

    // --- Heartbeat ---
    let heartbeat_handle =
        ws::start_heartbeat(Arc::clone(&hub), ws::HEARTBEAT_INTERVAL, cancel.child_token());

    // --- Server ---
    let addr = SocketAddr::new(
        config.host.parse().context("Invalid HOST address")?,
        config.port,
    );
    let state = AppState {
        config: Arc::new(config),
        hub: Arc::clone(&hub),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, "Dashboard server listening");

    let shutdown = cancel.clone();
    let shutdown_hub = Arc::clone(&hub);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            shutdown.cancel();
            // Upgraded sockets are not drained by the server; close them here.
            shutdown_hub.shutdown_all().await;
        })
        .await;

    // --- Post-shutdown cleanup ---
    cancel.cancel();
    let _ = tokio::time::timeout(Duration::from_secs(5), feed_handle).await;
    let _ = heartbeat_handle.await;
    hub.shutdown_all().await;
    tracing::info!("Graceful shutdown complete");

    served.context("Server error")
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, starting graceful shutdown"),
        () = terminate => tracing::info!("Received SIGTERM, starting graceful shutdown"),
    }
}
