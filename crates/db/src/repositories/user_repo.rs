//! Repository for the `users` table.

use sqlx::PgPool;

use crate::models::user::{NewUser, User};

/// Column list for `users` queries.
const COLUMNS: &str = "id, email, risk_score, is_banned, created_at, updated_at";

/// Email stored for users created lazily from a transaction.
const UNKNOWN_EMAIL: &str = "unknown@mail.com";

/// Provides read/write operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Find a user by id.
    pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a user unless one with the same id already exists.
    ///
    /// Returns `true` when a row was inserted.
    pub async fn create_if_absent(pool: &PgPool, user: &NewUser) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO users (id, email, risk_score, is_banned) \
             VALUES ($1, $2, $3, $4) \
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&user.id)
        .bind(user.email.as_deref().unwrap_or(UNKNOWN_EMAIL))
        .bind(user.risk_score)
        .bind(user.is_banned)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
