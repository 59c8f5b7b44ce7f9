use std::collections::HashMap;

use axum::body::Bytes;
use axum::extract::ws::Message;
use radar_core::types::Timestamp;
use radar_core::FraudAlert;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, Mutex};

/// Frames that may wait for one viewer's socket writer. A viewer whose queue
/// is full is treated as dead.
pub const VIEWER_QUEUE_CAPACITY: usize = 64;

/// Channel sender half for pushing frames to one viewer's socket.
pub type ViewerSender = mpsc::Sender<Message>;

/// Receiver half drained by the viewer's socket writer.
pub type ViewerReceiver = mpsc::Receiver<Message>;

/// A registered live viewer.
struct Viewer {
    sender: ViewerSender,
    connected_at: Timestamp,
}

/// Fan-out hub for fraud alerts.
///
/// Every membership change and every broadcast runs under the same mutex, so
/// a viewer registered mid-broadcast either gets the whole alert or none of
/// it, and alerts reach each viewer in broadcast order.
///
/// Sends never wait. A viewer whose channel is closed (its socket writer has
/// exited) or full (its peer stopped reading) is pruned on the first failed
/// send.
pub struct Hub {
    viewers: Mutex<HashMap<String, Viewer>>,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            viewers: Mutex::new(HashMap::new()),
        }
    }

    /// Register a viewer and return the receiver its socket writer drains.
    ///
    /// Re-registering an existing id replaces the old channel, which closes
    /// the previous writer.
    pub async fn register(&self, conn_id: String) -> ViewerReceiver {
        let (tx, rx) = mpsc::channel(VIEWER_QUEUE_CAPACITY);
        let viewer = Viewer {
            sender: tx,
            connected_at: chrono::Utc::now(),
        };
        let mut viewers = self.viewers.lock().await;
        viewers.insert(conn_id, viewer);
        tracing::debug!(viewers = viewers.len(), "Viewer registered");
        rx
    }

    /// Remove a viewer and send it a Close frame.
    ///
    /// Returns `false` if the viewer was already gone.
    pub async fn unregister(&self, conn_id: &str) -> bool {
        let removed = self.viewers.lock().await.remove(conn_id);
        match removed {
            Some(viewer) => {
                let _ = viewer.sender.try_send(Message::Close(None));
                let connected_for = chrono::Utc::now() - viewer.connected_at;
                tracing::debug!(
                    conn_id,
                    connected_secs = connected_for.num_seconds(),
                    "Viewer unregistered"
                );
                true
            }
            None => false,
        }
    }

    /// Queue `message` for every viewer, pruning those whose channel is
    /// closed or full.
    ///
    /// A pruned viewer's sender is dropped, so its writer drains what is
    /// already queued and then stops.
    ///
    /// Returns the number of viewers the message was queued for.
    pub async fn broadcast(&self, message: Message) -> usize {
        let mut viewers = self.viewers.lock().await;
        let before = viewers.len();
        viewers.retain(|conn_id, viewer| match viewer.sender.try_send(message.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %conn_id, "Viewer queue full, dropping viewer");
                false
            }
            Err(TrySendError::Closed(_)) => false,
        });

        let pruned = before - viewers.len();
        if pruned > 0 {
            tracing::info!(pruned, remaining = viewers.len(), "Pruned dead viewers");
        }
        viewers.len()
    }

    /// Encode `alert` as a JSON text frame and broadcast it.
    pub async fn broadcast_alert(&self, alert: &FraudAlert) -> Result<usize, serde_json::Error> {
        let text = serde_json::to_string(alert)?;
        Ok(self.broadcast(Message::Text(text.into())).await)
    }

    pub async fn viewer_count(&self) -> usize {
        self.viewers.lock().await.len()
    }

    /// Send a Ping frame to every viewer.
    pub async fn ping_all(&self) -> usize {
        self.broadcast(Message::Ping(Bytes::new())).await
    }

    /// Close every viewer and empty the hub.
    pub async fn shutdown_all(&self) {
        let mut viewers = self.viewers.lock().await;
        let count = viewers.len();
        for viewer in viewers.values() {
            let _ = viewer.sender.try_send(Message::Close(None));
        }
        viewers.clear();
        tracing::info!(count, "Closed all viewer connections");
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new()
    }
}
