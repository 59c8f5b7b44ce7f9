//! Per-user risk profile and behavioural statistics.

use serde::{Deserialize, Serialize};

use crate::limits::DEFAULT_RISK_SCORE;

/// Historical spend statistics for one user.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub max_amount: f64,
    pub avg_amount: f64,
}

/// Risk profile of a user as seen by the detector.
///
/// `stats` is derived at evaluation time from the stats cache or the store
/// and is never written back with the profile.
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    pub risk_score: i32,
    pub is_banned: bool,
    pub stats: UserStats,
}

impl UserProfile {
    /// Profile synthesized for a user seen for the first time.
    pub fn new_default(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            risk_score: DEFAULT_RISK_SCORE,
            is_banned: false,
            stats: UserStats::default(),
        }
    }

    pub fn with_stats(mut self, stats: UserStats) -> Self {
        self.stats = stats;
        self
    }

    /// Feature summary sent to the risk engine alongside the transaction.
    pub fn context_summary(&self) -> String {
        format!(
            "risk_score:{},banned:{},max_tx:{:.2},avg_tx:{:.2}",
            self.risk_score, self.is_banned, self.stats.max_amount, self.stats.avg_amount
        )
    }
}
