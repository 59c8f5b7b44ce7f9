//! Demo personas inserted at startup.

use crate::models::user::NewUser;
use crate::repositories::UserRepo;
use crate::DbPool;

/// The three personas the simulator generates traffic for.
pub fn personas() -> Vec<NewUser> {
    vec![
        NewUser {
            id: "user-1".into(),
            email: Some("ceo@apple.com".into()),
            risk_score: 0,
            is_banned: false,
        },
        NewUser {
            id: "user-2".into(),
            email: Some("hacker99@darknet.com".into()),
            risk_score: 85,
            is_banned: false,
        },
        NewUser {
            id: "user-3".into(),
            email: Some("john.doe@gmail.com".into()),
            risk_score: 15,
            is_banned: false,
        },
    ]
}

/// Insert the personas that do not exist yet.
///
/// Existing rows are never overwritten, so running this on every start is
/// safe.
pub async fn seed_users(pool: &DbPool) -> Result<(), sqlx::Error> {
    for user in personas() {
        if let Err(e) = UserRepo::create_if_absent(pool, &user).await {
            tracing::error!(user_id = %user.id, error = %e, "Failed to seed user");
            return Err(e);
        }
    }
    Ok(())
}
