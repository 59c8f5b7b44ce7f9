//! Capability traits the fraud detector is assembled from.
//!
//! Each trait is implemented by one infrastructure adapter (PostgreSQL,
//! Redis, the HTTP risk client, the Kafka publisher) and by in-memory
//! doubles in tests. All implementations must be safe to share across tasks.

use async_trait::async_trait;

use crate::alert::{FraudAlert, RiskVerdict};
use crate::error::CoreError;
use crate::fraud_event::FraudEvent;
use crate::transaction::Transaction;
use crate::user::{UserProfile, UserStats};

/// Durable source of truth for users and their fraud history.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Returns `Ok(None)` when the user has never been seen.
    async fn get_user_by_id(&self, id: &str) -> Result<Option<UserProfile>, CoreError>;

    async fn create_user(&self, user: &UserProfile) -> Result<(), CoreError>;

    async fn save_fraud_event(&self, event: &FraudEvent) -> Result<(), CoreError>;

    /// Aggregate max/average amount over the user's recorded events.
    async fn get_user_stats(&self, user_id: &str) -> Result<UserStats, CoreError>;
}

/// Read-through cache of [`UserStats`].
#[async_trait]
pub trait StatsCache: Send + Sync {
    /// Returns `Ok(None)` on a cache miss.
    async fn get_user_stats(&self, user_id: &str) -> Result<Option<UserStats>, CoreError>;

    async fn set_user_stats(&self, user_id: &str, stats: UserStats) -> Result<(), CoreError>;
}

/// Sliding-window transaction counter.
#[async_trait]
pub trait VelocityTracker: Send + Sync {
    /// Sum of the user's live (user, location) buckets.
    async fn get_velocity(&self, user_id: &str) -> Result<u64, CoreError>;

    /// Bump the (user, location) bucket and restart its expiry.
    async fn increment_velocity(&self, user_id: &str, location: &str) -> Result<(), CoreError>;
}

/// Short-lived cache of risk verdicts keyed by (user, merchant).
#[async_trait]
pub trait RiskVerdictCache: Send + Sync {
    async fn get_risk_verdict(
        &self,
        user_id: &str,
        merchant: &str,
    ) -> Result<Option<RiskVerdict>, CoreError>;

    async fn set_risk_verdict(
        &self,
        user_id: &str,
        merchant: &str,
        verdict: &RiskVerdict,
    ) -> Result<(), CoreError>;
}

/// Remote risk scoring.
///
/// Any error means "service unavailable"; it is never a block signal.
#[async_trait]
pub trait RiskAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        tx: &Transaction,
        profile: &UserProfile,
    ) -> Result<RiskVerdict, CoreError>;
}

/// Outbound sink for final verdicts.
#[async_trait]
pub trait AlertPublisher: Send + Sync {
    async fn publish(&self, alert: &FraudAlert) -> Result<(), CoreError>;
}
