//! Raw message sources feeding a [`TopicConsumer`](crate::TopicConsumer).

use async_trait::async_trait;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::Message;

use crate::error::StreamError;

/// A pull-based stream of raw payloads.
#[async_trait]
pub trait MessageSource: Send {
    /// Wait for the next payload.
    ///
    /// An error ends the consume loop; it is not retried by the loop.
    async fn next_payload(&mut self) -> Result<Vec<u8>, StreamError>;
}

/// A Kafka consumer-group member subscribed to a single topic.
///
/// Offsets are committed automatically by the client after delivery, so a
/// message is handed out at most once per group (best-effort delivery).
pub struct KafkaSource {
    consumer: StreamConsumer,
    topic: String,
}

impl KafkaSource {
    /// Join `group_id` and subscribe to `topic`.
    ///
    /// A group without committed offsets starts from the earliest message.
    pub fn subscribe(brokers: &[String], topic: &str, group_id: &str) -> Result<Self, StreamError> {
        let consumer: StreamConsumer = crate::client_config(brokers)
            .set("group.id", group_id)
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "earliest")
            .set("enable.partition.eof", "false")
            .create()?;
        consumer.subscribe(&[topic])?;

        tracing::info!(topic, group_id, "Subscribed to topic");
        Ok(Self {
            consumer,
            topic: topic.to_string(),
        })
    }
}

#[async_trait]
impl MessageSource for KafkaSource {
    async fn next_payload(&mut self) -> Result<Vec<u8>, StreamError> {
        let message = self.consumer.recv().await?;
        tracing::trace!(
            topic = %self.topic,
            partition = message.partition(),
            offset = message.offset(),
            "Message received"
        );
        Ok(message.payload().map(<[u8]>::to_vec).unwrap_or_default())
    }
}
