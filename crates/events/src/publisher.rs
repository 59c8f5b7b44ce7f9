//! Typed JSON producer for a single topic.

use std::marker::PhantomData;
use std::time::Duration;

use async_trait::async_trait;
use radar_core::capabilities::AlertPublisher;
use radar_core::{CoreError, FraudAlert};
use rdkafka::producer::{FutureProducer, FutureRecord};
use serde::Serialize;

use crate::error::StreamError;

/// How long a send may wait for room in the local producer queue.
const ENQUEUE_TIMEOUT: Duration = Duration::from_secs(5);

/// Broker-side delivery timeout, after which a send reports failure.
const MESSAGE_TIMEOUT_MS: &str = "10000";

/// Publishes JSON-encoded `T` values to one topic.
///
/// A send resolves only after the broker acknowledged (or rejected) the
/// message, so a returned `Ok` means the record was written.
pub struct TopicPublisher<T> {
    producer: FutureProducer,
    topic: String,
    _payload: PhantomData<fn(&T)>,
}

impl<T: Serialize> TopicPublisher<T> {
    pub fn new(brokers: &[String], topic: &str) -> Result<Self, StreamError> {
        let producer: FutureProducer = crate::client_config(brokers)
            .set("message.timeout.ms", MESSAGE_TIMEOUT_MS)
            .create()?;
        Ok(Self {
            producer,
            topic: topic.to_string(),
            _payload: PhantomData,
        })
    }

    /// Encode `value` and write it, optionally under a partitioning key.
    pub async fn send(&self, key: Option<&str>, value: &T) -> Result<(), StreamError> {
        let payload = serde_json::to_vec(value)?;
        let mut record = FutureRecord::<str, [u8]>::to(&self.topic).payload(payload.as_slice());
        if let Some(key) = key {
            record = record.key(key);
        }

        self.producer
            .send(record, ENQUEUE_TIMEOUT)
            .await
            .map_err(|(e, _)| StreamError::Kafka(e))?;
        Ok(())
    }
}

#[async_trait]
impl AlertPublisher for TopicPublisher<FraudAlert> {
    async fn publish(&self, alert: &FraudAlert) -> Result<(), CoreError> {
        self.send(None, alert).await.map_err(CoreError::publish)
    }
}
