use std::time::Duration;

use radar_core::config::{self, ConfigError, Lookup};

/// Simulator configuration.
///
/// | Env Var                        | Default            |
/// |--------------------------------|--------------------|
/// | `KAFKA_BROKERS`                | `kafka:9092`       |
/// | `KAFKA_TOPIC`                  | `raw-transactions` |
/// | `SIMULATOR_STARTUP_DELAY_SECS` | `10`               |
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    pub brokers: Vec<String>,
    pub topic: String,
    /// Wait before the first transaction, giving the broker time to start.
    pub startup_delay: Duration,
}

impl SimulatorConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&config::process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            brokers: config::broker_list(lookup, "KAFKA_BROKERS", "kafka:9092")?,
            topic: config::non_empty_or(lookup, "KAFKA_TOPIC", "raw-transactions")?,
            startup_delay: Duration::from_secs(config::parse_or(
                lookup,
                "SIMULATOR_STARTUP_DELAY_SECS",
                10,
            )?),
        })
    }
}
