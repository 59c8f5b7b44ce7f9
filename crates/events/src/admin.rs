//! Topic administration.

use std::time::Duration;

use rdkafka::admin::{AdminClient, AdminOptions, NewTopic, TopicReplication};
use rdkafka::client::DefaultClientContext;
use rdkafka::types::RDKafkaErrorCode;

use crate::error::StreamError;

/// Attempts made while the broker is still coming up.
const MAX_ATTEMPTS: u32 = 10;

/// Pause between attempts.
const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Server-side timeout of the create request.
const OPERATION_TIMEOUT: Duration = Duration::from_secs(10);

/// Create every topic in `topics` that does not exist yet.
///
/// New topics get one partition and a replication factor of one. Topics
/// that already exist are left untouched.
pub async fn ensure_topics(brokers: &[String], topics: &[&str]) -> Result<(), StreamError> {
    let admin: AdminClient<DefaultClientContext> = crate::client_config(brokers).create()?;
    let new_topics: Vec<NewTopic<'_>> = topics
        .iter()
        .map(|name| NewTopic::new(name, 1, TopicReplication::Fixed(1)))
        .collect();
    let options = AdminOptions::new().operation_timeout(Some(OPERATION_TIMEOUT));

    let mut attempt = 0;
    let results = loop {
        attempt += 1;
        match admin.create_topics(&new_topics, &options).await {
            Ok(results) => break results,
            Err(e) if attempt < MAX_ATTEMPTS => {
                tracing::warn!(attempt, max = MAX_ATTEMPTS, error = %e, "Waiting for Kafka to be ready");
                tokio::time::sleep(RETRY_DELAY).await;
            }
            Err(e) => return Err(e.into()),
        }
    };

    for result in results {
        match result {
            Ok(topic) => tracing::info!(%topic, "Created topic"),
            Err((topic, RDKafkaErrorCode::TopicAlreadyExists)) => {
                tracing::debug!(%topic, "Topic already exists");
            }
            Err((topic, code)) => {
                return Err(StreamError::TopicCreation {
                    topic,
                    reason: code.to_string(),
                });
            }
        }
    }
    Ok(())
}
