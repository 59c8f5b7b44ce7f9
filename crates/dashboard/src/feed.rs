//! Ingestion of the alerts topic into the hub.

use std::sync::Arc;
use std::time::Duration;

use radar_core::FraudAlert;
use radar_events::{MessageSource, TopicConsumer};
use tokio_util::sync::CancellationToken;

use crate::ws::Hub;

/// Pause before resuming after a failed read.
pub const READ_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Reads [`FraudAlert`]s from a source and broadcasts each one to the hub.
pub struct AlertFeed<S> {
    consumer: TopicConsumer<S, FraudAlert>,
    hub: Arc<Hub>,
    retry_delay: Duration,
}

impl<S: MessageSource> AlertFeed<S> {
    pub fn new(source: S, hub: Arc<Hub>) -> Self {
        Self {
            consumer: TopicConsumer::new(source),
            hub,
            retry_delay: READ_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Run until `cancel` fires.
    ///
    /// Read errors are logged and the loop resumes after the retry delay.
    pub async fn run(mut self, cancel: CancellationToken) {
        loop {
            let hub = Arc::clone(&self.hub);
            let result = self
                .consumer
                .consume(&cancel, move |alert: FraudAlert| {
                    let hub = Arc::clone(&hub);
                    async move {
                        let delivered = hub.broadcast_alert(&alert).await?;
                        tracing::debug!(
                            tx_id = %alert.transaction_id,
                            delivered,
                            "Alert broadcast"
                        );
                        Ok::<_, serde_json::Error>(())
                    }
                })
                .await;

            match result {
                Ok(()) => break,
                Err(e) => {
                    tracing::error!(error = %e, "Alert feed read failed, retrying");
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }
        tracing::info!("Alert feed stopped");
    }
}
