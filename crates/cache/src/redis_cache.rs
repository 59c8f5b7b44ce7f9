use async_trait::async_trait;
use radar_core::capabilities::{RiskVerdictCache, StatsCache, VelocityTracker};
use radar_core::limits::{RISK_CACHE_TTL, STATS_CACHE_TTL, VELOCITY_WINDOW};
use radar_core::{CoreError, RiskVerdict, UserStats};
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::{codec, keys};

/// Keys requested per `SCAN` round trip.
const SCAN_BATCH_SIZE: usize = 10;

/// Cache adapter over a multiplexed, auto-reconnecting Redis connection.
///
/// Cloning is cheap; every clone shares the same underlying connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    /// Connect to Redis at `url` (e.g. `redis://redis:6379`).
    pub async fn connect(url: &str) -> Result<Self, redis::RedisError> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }

    /// Round-trip a `PING` to verify the server is reachable.
    pub async fn ping(&self) -> Result<(), redis::RedisError> {
        let mut conn = self.conn.clone();
        redis::cmd("PING").query_async::<String>(&mut conn).await?;
        Ok(())
    }

    async fn scan_keys(&self, pattern: &str) -> Result<Vec<String>, redis::RedisError> {
        let mut conn = self.conn.clone();
        let mut cursor: u64 = 0;
        let mut found = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(pattern)
                .arg("COUNT")
                .arg(SCAN_BATCH_SIZE)
                .query_async(&mut conn)
                .await?;
            found.extend(batch);
            cursor = next;
            if cursor == 0 {
                break;
            }
        }

        // SCAN may return a key more than once.
        found.sort_unstable();
        found.dedup();
        Ok(found)
    }
}

#[async_trait]
impl VelocityTracker for RedisCache {
    async fn get_velocity(&self, user_id: &str) -> Result<u64, CoreError> {
        let buckets = self
            .scan_keys(&keys::velocity_pattern(user_id))
            .await
            .map_err(CoreError::cache)?;
        if buckets.is_empty() {
            return Ok(0);
        }

        let mut conn = self.conn.clone();
        // A bucket can expire between SCAN and MGET.
        let counts: Vec<Option<u64>> = redis::cmd("MGET")
            .arg(&buckets)
            .query_async(&mut conn)
            .await
            .map_err(CoreError::cache)?;
        Ok(counts.into_iter().flatten().sum())
    }

    async fn increment_velocity(&self, user_id: &str, location: &str) -> Result<(), CoreError> {
        let key = keys::velocity(user_id, location);
        let mut conn = self.conn.clone();
        redis::pipe()
            .atomic()
            .incr(&key, 1)
            .ignore()
            .expire(&key, VELOCITY_WINDOW.as_secs() as i64)
            .ignore()
            .query_async::<()>(&mut conn)
            .await
            .map_err(CoreError::cache)
    }
}

#[async_trait]
impl StatsCache for RedisCache {
    async fn get_user_stats(&self, user_id: &str) -> Result<Option<UserStats>, CoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(keys::user_stats(user_id))
            .await
            .map_err(CoreError::cache)?;
        raw.map(|value| codec::decode_stats(&value).map_err(CoreError::cache))
            .transpose()
    }

    async fn set_user_stats(&self, user_id: &str, stats: UserStats) -> Result<(), CoreError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(
            keys::user_stats(user_id),
            codec::encode_stats(stats),
            STATS_CACHE_TTL.as_secs(),
        )
        .await
        .map_err(CoreError::cache)
    }
}

#[async_trait]
impl RiskVerdictCache for RedisCache {
    async fn get_risk_verdict(
        &self,
        user_id: &str,
        merchant: &str,
    ) -> Result<Option<RiskVerdict>, CoreError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn
            .get(keys::risk_verdict(user_id, merchant))
            .await
            .map_err(CoreError::cache)?;
        raw.map(|value| serde_json::from_str(&value).map_err(CoreError::cache))
            .transpose()
    }

    async fn set_risk_verdict(
        &self,
        user_id: &str,
        merchant: &str,
        verdict: &RiskVerdict,
    ) -> Result<(), CoreError> {
        let payload = serde_json::to_string(verdict).map_err(CoreError::cache)?;
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(
            keys::risk_verdict(user_id, merchant),
            payload,
            RISK_CACHE_TTL.as_secs(),
        )
        .await
        .map_err(CoreError::cache)
    }
}
