//! Fraud detection orchestrator.
//!
//! [`FraudDetector::detect`] evaluates one transaction:
//!
//! 1. resolve (or lazily create) the user profile
//! 2. resolve spend statistics, stats cache first, store on miss
//! 3. read the velocity counter
//! 4. obtain a risk verdict, verdict cache first, risk engine on miss,
//!    fail-safe verdict when the engine is unavailable
//! 5. combine velocity and verdict into the final decision
//! 6. persist the fraud event
//! 7. bump the velocity counter
//! 8. publish the alert
//!
//! Only step 8 can fail the evaluation. Every other failure is logged and
//! degrades to a non-blocking default.

use std::sync::Arc;

use radar_core::capabilities::{
    AlertPublisher, RiskAnalyzer, RiskVerdictCache, StatsCache, UserStore, VelocityTracker,
};
use radar_core::limits::{VELOCITY_BLOCK_MARKER, VELOCITY_BLOCK_MESSAGE, VELOCITY_THRESHOLD};
use radar_core::{
    CoreError, FraudAlert, FraudEvent, RiskVerdict, Transaction, UserProfile, UserStats,
};
use tracing::Instrument;

/// Final blocked flag and reason text for one transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Decision {
    pub is_blocked: bool,
    pub reason: String,
}

/// Combine the velocity signal with the risk verdict.
///
/// Velocity always blocks. Its reason is prefixed with the velocity marker
/// and carries the engine's reason if the engine blocked too, otherwise the
/// fixed frequency message.
pub fn compose_decision(velocity_fraud: bool, verdict: &RiskVerdict) -> Decision {
    if !velocity_fraud {
        return Decision {
            is_blocked: verdict.is_blocked,
            reason: verdict.reason.clone(),
        };
    }

    let detail = if verdict.is_blocked {
        verdict.reason.as_str()
    } else {
        VELOCITY_BLOCK_MESSAGE
    };
    Decision {
        is_blocked: true,
        reason: format!("{VELOCITY_BLOCK_MARKER} {detail}"),
    }
}

/// Evaluates transactions one at a time against the injected capabilities.
///
/// Holds no mutable state of its own; concurrent calls are safe as long as
/// the capabilities are.
pub struct FraudDetector {
    store: Arc<dyn UserStore>,
    stats_cache: Arc<dyn StatsCache>,
    velocity: Arc<dyn VelocityTracker>,
    risk_cache: Arc<dyn RiskVerdictCache>,
    analyzer: Arc<dyn RiskAnalyzer>,
    publisher: Arc<dyn AlertPublisher>,
}

impl FraudDetector {
    pub fn new(
        store: Arc<dyn UserStore>,
        stats_cache: Arc<dyn StatsCache>,
        velocity: Arc<dyn VelocityTracker>,
        risk_cache: Arc<dyn RiskVerdictCache>,
        analyzer: Arc<dyn RiskAnalyzer>,
        publisher: Arc<dyn AlertPublisher>,
    ) -> Self {
        Self {
            store,
            stats_cache,
            velocity,
            risk_cache,
            analyzer,
            publisher,
        }
    }

    /// Evaluate `tx`, persist the outcome and publish the alert.
    ///
    /// Returns the published alert. The only error is a failed publication.
    pub async fn detect(&self, tx: &Transaction) -> Result<FraudAlert, CoreError> {
        let span = tracing::info_span!("detect", tx_id = %tx.id, user_id = %tx.user_id);
        self.evaluate(tx).instrument(span).await
    }

    async fn evaluate(&self, tx: &Transaction) -> Result<FraudAlert, CoreError> {
        let profile = self.resolve_profile(&tx.user_id).await;
        let profile = profile.with_stats(self.resolve_stats(&tx.user_id).await);

        let velocity = match self.velocity.get_velocity(&tx.user_id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::warn!(error = %e, "Velocity read failed, assuming zero");
                0
            }
        };
        let velocity_fraud = velocity > VELOCITY_THRESHOLD;

        let verdict = self.resolve_verdict(tx, &profile).await;
        let decision = compose_decision(velocity_fraud, &verdict);

        let alert = FraudAlert::for_transaction(
            tx,
            decision.is_blocked,
            decision.reason,
            verdict.ai_push_msg,
        );

        if let Err(e) = self
            .store
            .save_fraud_event(&FraudEvent::from_verdict(tx, &alert))
            .await
        {
            tracing::error!(error = %e, "Failed to persist fraud event");
        }

        if let Err(e) = self
            .velocity
            .increment_velocity(&tx.user_id, &tx.location)
            .await
        {
            tracing::warn!(error = %e, "Failed to increment velocity");
        }

        if let Err(e) = self.publisher.publish(&alert).await {
            tracing::error!(error = %e, "Failed to publish fraud alert");
            return Err(e);
        }

        tracing::info!(
            velocity,
            is_blocked = alert.is_blocked,
            reason = %alert.reason,
            "Transaction evaluated"
        );
        Ok(alert)
    }

    /// Load the user, creating a default profile for unseen users.
    ///
    /// Lookup and creation errors fall back to the default profile.
    async fn resolve_profile(&self, user_id: &str) -> UserProfile {
        match self.store.get_user_by_id(user_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                let profile = UserProfile::new_default(user_id);
                if let Err(e) = self.store.create_user(&profile).await {
                    tracing::error!(error = %e, "Failed to create user profile");
                }
                profile
            }
            Err(e) => {
                tracing::error!(error = %e, "User lookup failed, using default profile");
                UserProfile::new_default(user_id)
            }
        }
    }

    async fn resolve_stats(&self, user_id: &str) -> UserStats {
        match self.stats_cache.get_user_stats(user_id).await {
            Ok(Some(stats)) => return stats,
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Stats cache read failed, querying store"),
        }

        let stats = match self.store.get_user_stats(user_id).await {
            Ok(stats) => stats,
            Err(e) => {
                tracing::warn!(error = %e, "Stats query failed, using zero stats");
                return UserStats::default();
            }
        };

        if let Err(e) = self.stats_cache.set_user_stats(user_id, stats).await {
            tracing::warn!(error = %e, "Failed to cache user stats");
        }
        stats
    }

    async fn resolve_verdict(&self, tx: &Transaction, profile: &UserProfile) -> RiskVerdict {
        match self
            .risk_cache
            .get_risk_verdict(&tx.user_id, &tx.merchant)
            .await
        {
            Ok(Some(verdict)) => {
                tracing::debug!(merchant = %tx.merchant, "Risk verdict cache hit");
                return verdict;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Risk verdict cache read failed"),
        }

        match self.analyzer.analyze(tx, profile).await {
            Ok(verdict) => {
                if let Err(e) = self
                    .risk_cache
                    .set_risk_verdict(&tx.user_id, &tx.merchant, &verdict)
                    .await
                {
                    tracing::warn!(error = %e, "Failed to cache risk verdict");
                }
                verdict
            }
            Err(e) => {
                tracing::warn!(error = %e, "Risk engine unavailable, fail-safe verdict applied");
                RiskVerdict::fail_safe()
            }
        }
    }
}
