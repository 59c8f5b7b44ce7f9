use std::path::PathBuf;

use radar_core::config::{self, ConfigError, Lookup};

/// Dashboard server configuration.
///
/// | Env Var              | Default           |
/// |----------------------|-------------------|
/// | `HOST`               | `0.0.0.0`         |
/// | `PORT`               | `8080`            |
/// | `KAFKA_BROKERS`      | `kafka:9092`      |
/// | `ALERTS_TOPIC`       | `fraud-alerts`    |
/// | `DASHBOARD_GROUP_ID` | `dashboard-group` |
/// | `FRONTEND_DIR`       | `./frontend`      |
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub brokers: Vec<String>,
    pub alerts_topic: String,
    pub group_id: String,
    /// Directory served at `/`.
    pub frontend_dir: PathBuf,
}

impl DashboardConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(&config::process_env)
    }

    pub fn from_lookup(lookup: Lookup<'_>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: config::string_or(lookup, "HOST", "0.0.0.0"),
            port: config::parse_or(lookup, "PORT", 8080)?,
            brokers: config::broker_list(lookup, "KAFKA_BROKERS", "kafka:9092")?,
            alerts_topic: config::non_empty_or(lookup, "ALERTS_TOPIC", "fraud-alerts")?,
            group_id: config::non_empty_or(lookup, "DASHBOARD_GROUP_ID", "dashboard-group")?,
            frontend_dir: config::string_or(lookup, "FRONTEND_DIR", "./frontend").into(),
        })
    }
}
