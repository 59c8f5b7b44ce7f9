use rdkafka::error::KafkaError;

/// Errors raised by the stream layer.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Client creation, read or delivery failure reported by librdkafka.
    #[error("Kafka error: {0}")]
    Kafka(#[from] KafkaError),

    /// A payload could not be encoded for publishing.
    #[error("Encode error: {0}")]
    Encode(#[from] serde_json::Error),

    /// The broker refused to create a topic.
    #[error("Failed to create topic {topic}: {reason}")]
    TopicCreation { topic: String, reason: String },

    /// The source has no more messages and never will.
    #[error("Stream closed")]
    Closed,
}
