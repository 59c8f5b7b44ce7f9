//! Kafka stream plumbing for the fraud radar.
//!
//! - [`TopicConsumer`]: sequential, typed consume loop over a
//!   [`MessageSource`] with cancellation.
//! - [`TopicPublisher`]: typed JSON producer for one topic.
//! - [`admin::ensure_topics`]: creates missing topics at startup.

pub mod admin;
pub mod consumer;
pub mod error;
pub mod publisher;
pub mod source;

pub use consumer::TopicConsumer;
pub use error::StreamError;
pub use publisher::TopicPublisher;
pub use source::{KafkaSource, MessageSource};

/// Base client configuration shared by consumers, producers and the admin
/// client.
pub(crate) fn client_config(brokers: &[String]) -> rdkafka::ClientConfig {
    let mut config = rdkafka::ClientConfig::new();
    config.set("bootstrap.servers", brokers.join(","));
    config
}
