//! Repository for the `fraud_events` table.

use radar_core::FraudEvent;
use sqlx::PgPool;

/// Provides read/write operations for fraud events.
pub struct FraudEventRepo;

impl FraudEventRepo {
    /// Record the decision for a transaction.
    ///
    /// A transaction that was already recorded (redelivery) is left as is.
    /// Returns `true` when a row was inserted.
    pub async fn insert(pool: &PgPool, event: &FraudEvent) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO fraud_events \
                (transaction_id, user_id, merchant, amount, location, is_blocked, ai_reason, ai_push_msg) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             ON CONFLICT (transaction_id) DO NOTHING",
        )
        .bind(&event.transaction_id)
        .bind(&event.user_id)
        .bind(&event.merchant)
        .bind(event.amount)
        .bind(&event.location)
        .bind(event.is_blocked)
        .bind(&event.ai_reason)
        .bind(&event.ai_push_msg)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Maximum and average amount over all events of a user.
    ///
    /// Both are zero for a user without history.
    pub async fn amount_stats(pool: &PgPool, user_id: &str) -> Result<(f64, f64), sqlx::Error> {
        sqlx::query_as::<_, (f64, f64)>(
            "SELECT COALESCE(MAX(amount), 0)::FLOAT8, COALESCE(AVG(amount), 0)::FLOAT8 \
             FROM fraud_events WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }
}
