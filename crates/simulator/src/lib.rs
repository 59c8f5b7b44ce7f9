//! Synthetic transaction load for the fraud radar.

pub mod config;
pub mod generator;

use std::ops::RangeInclusive;
use std::time::Duration;

use async_trait::async_trait;
use rand::Rng;
use radar_core::Transaction;
use radar_events::{StreamError, TopicPublisher};
use tokio_util::sync::CancellationToken;

/// Destination for generated transactions.
#[async_trait]
pub trait TransactionSink: Send + Sync {
    async fn submit(&self, tx: &Transaction) -> Result<(), StreamError>;
}

/// Keyed by user id so one user's transactions stay in one partition.
#[async_trait]
impl TransactionSink for TopicPublisher<Transaction> {
    async fn submit(&self, tx: &Transaction) -> Result<(), StreamError> {
        self.send(Some(&tx.user_id), tx).await
    }
}

/// Whole seconds to wait between two transactions.
pub const PAUSE_SECS: RangeInclusive<u64> = 2..=5;

/// Emits one generated transaction per random pause until cancelled.
pub struct Simulator<S> {
    sink: S,
    pause_secs: RangeInclusive<u64>,
}

impl<S: TransactionSink> Simulator<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            pause_secs: PAUSE_SECS,
        }
    }

    /// Run until `cancel` fires. Send failures are logged and skipped.
    ///
    /// Returns the number of transactions delivered.
    pub async fn run(&self, cancel: CancellationToken) -> u64 {
        let mut sent = 0;
        loop {
            let pause = Duration::from_secs(rand::rng().random_range(self.pause_secs.clone()));
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(pause) => {}
            }

            let tx = generator::generate(&mut rand::rng());
            match self.sink.submit(&tx).await {
                Ok(()) => {
                    sent += 1;
                    tracing::debug!(
                        tx_id = %tx.id,
                        user_id = %tx.user_id,
                        amount = tx.amount,
                        "Transaction sent"
                    );
                }
                Err(e) => {
                    tracing::error!(tx_id = %tx.id, error = %e, "Failed to send transaction");
                }
            }
        }
        tracing::info!(sent, "Simulator stopped");
        sent
    }
}
