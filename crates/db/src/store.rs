//! [`UserStore`] implementation over the PostgreSQL pool.

use async_trait::async_trait;
use radar_core::capabilities::UserStore;
use radar_core::{CoreError, FraudEvent, UserProfile, UserStats};

use crate::models::user::NewUser;
use crate::repositories::{FraudEventRepo, UserRepo};
use crate::DbPool;

/// PostgreSQL-backed user and fraud-event store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: DbPool,
}

impl PgUserStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn get_user_by_id(&self, id: &str) -> Result<Option<UserProfile>, CoreError> {
        let user = UserRepo::find_by_id(&self.pool, id)
            .await
            .map_err(CoreError::store)?;
        Ok(user.map(|u| u.into_profile()))
    }

    async fn create_user(&self, user: &UserProfile) -> Result<(), CoreError> {
        let inserted = UserRepo::create_if_absent(&self.pool, &NewUser::from(user))
            .await
            .map_err(CoreError::store)?;
        if inserted {
            tracing::info!(user_id = %user.id, "Created user profile");
        }
        Ok(())
    }

    async fn save_fraud_event(&self, event: &FraudEvent) -> Result<(), CoreError> {
        let inserted = FraudEventRepo::insert(&self.pool, event)
            .await
            .map_err(CoreError::store)?;
        if !inserted {
            tracing::debug!(
                tx_id = %event.transaction_id,
                "Fraud event already recorded, skipping"
            );
        }
        Ok(())
    }

    async fn get_user_stats(&self, user_id: &str) -> Result<UserStats, CoreError> {
        let (max_amount, avg_amount) = FraudEventRepo::amount_stats(&self.pool, user_id)
            .await
            .map_err(CoreError::store)?;
        Ok(UserStats {
            max_amount,
            avg_amount,
        })
    }
}
