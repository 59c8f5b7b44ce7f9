//! Shared fixtures for dashboard integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use radar_core::FraudAlert;
use radar_dashboard::config::DashboardConfig;
use radar_dashboard::router::build_router;
use radar_dashboard::state::AppState;
use radar_dashboard::ws::Hub;
use radar_events::{MessageSource, StreamError};
use tokio::sync::mpsc;

pub fn alert(id: &str, is_blocked: bool) -> FraudAlert {
    FraudAlert {
        transaction_id: id.to_string(),
        reason: if is_blocked {
            "High risk merchant".into()
        } else {
            "ok".into()
        },
        ai_push_msg: String::new(),
        is_blocked,
        amount: 150.0,
        location: "Kyiv, Ukraine".into(),
        merchant: "Shop".into(),
    }
}

/// Config pointing at the workspace frontend directory.
pub fn test_config() -> DashboardConfig {
    DashboardConfig {
        host: "127.0.0.1".into(),
        port: 0,
        brokers: vec!["localhost:9092".into()],
        alerts_topic: "fraud-alerts".into(),
        group_id: "dashboard-test".into(),
        frontend_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../frontend"),
    }
}

pub fn test_state(hub: Arc<Hub>) -> AppState {
    AppState {
        config: Arc::new(test_config()),
        hub,
    }
}

/// Serve the full router on an ephemeral port.
pub async fn spawn_app(hub: Arc<Hub>) -> SocketAddr {
    let app = build_router(test_state(hub));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Poll until the hub holds `expected` viewers, panicking after two seconds.
pub async fn wait_for_viewers(hub: &Hub, expected: usize) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    while hub.viewer_count().await != expected {
        assert!(
            tokio::time::Instant::now() < deadline,
            "expected {expected} viewers, have {}",
            hub.viewer_count().await
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Source fed from a test-held channel. Blocks once the channel is drained.
pub struct ChannelSource {
    rx: mpsc::UnboundedReceiver<Result<Vec<u8>, StreamError>>,
}

pub fn channel_source() -> (
    mpsc::UnboundedSender<Result<Vec<u8>, StreamError>>,
    ChannelSource,
) {
    let (tx, rx) = mpsc::unbounded_channel();
    (tx, ChannelSource { rx })
}

#[async_trait]
impl MessageSource for ChannelSource {
    async fn next_payload(&mut self) -> Result<Vec<u8>, StreamError> {
        match self.rx.recv().await {
            Some(item) => item,
            None => std::future::pending().await,
        }
    }
}
