//! User entity model.

use radar_core::types::Timestamp;
use radar_core::UserProfile;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub risk_score: i32,
    pub is_banned: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl User {
    /// Convert to the detector's profile. Stats are resolved separately.
    pub fn into_profile(self) -> UserProfile {
        UserProfile {
            id: self.id,
            risk_score: self.risk_score,
            is_banned: self.is_banned,
            stats: Default::default(),
        }
    }
}

/// Insert DTO for seeding and lazy user creation.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: Option<String>,
    pub risk_score: i32,
    pub is_banned: bool,
}

impl From<&UserProfile> for NewUser {
    fn from(profile: &UserProfile) -> Self {
        Self {
            id: profile.id.clone(),
            email: None,
            risk_score: profile.risk_score,
            is_banned: profile.is_banned,
        }
    }
}
