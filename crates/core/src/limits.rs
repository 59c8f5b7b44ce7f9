//! Fixed detection limits.
//!
//! These are deliberately not configurable per user or per deployment.

use std::time::Duration;

/// Risk score assigned to a user on first sight.
pub const DEFAULT_RISK_SCORE: i32 = 15;

/// A user is velocity-blocked when the trailing-window count is strictly
/// greater than this value.
pub const VELOCITY_THRESHOLD: u64 = 10;

/// Trailing window of the velocity counter.
pub const VELOCITY_WINDOW: Duration = Duration::from_secs(60);

/// Lifetime of cached per-user spend statistics.
pub const STATS_CACHE_TTL: Duration = Duration::from_secs(10 * 60);

/// Lifetime of a cached risk verdict for a (user, merchant) pair.
pub const RISK_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Prefix applied to the reason when the velocity check fires.
pub const VELOCITY_BLOCK_MARKER: &str = "[Velocity Block]";

/// Reason used when only the velocity check blocked the transaction.
pub const VELOCITY_BLOCK_MESSAGE: &str = "User exceeded transaction frequency limit";

/// Reason used when the risk engine could not be reached.
pub const FAIL_SAFE_REASON: &str = "AI Service Error - FailSafe Active";
