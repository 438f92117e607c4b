//! User model for storage and API.

use serde::{Deserialize, Serialize};

/// User profile stored in Firestore, keyed by email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Email address (also used as document ID)
    pub email: String,
    /// Display name (unique, soft-checked at signup/edit)
    pub username: String,
    /// PBKDF2 salt (hex)
    pub password_salt: String,
    /// PBKDF2-HMAC-SHA256 digest (hex)
    pub password_hash: String,
    /// Avatar download URL
    pub avatar: Option<String>,
    /// Bio/portfolio URL
    pub bio: Option<String>,
    /// When the account was created (RFC3339)
    pub created_at: String,
    /// Last profile update (RFC3339)
    pub updated_at: String,
}

/// User fields safe to expose to other users.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicProfile {
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

impl User {
    pub fn public(&self) -> PublicProfile {
        PublicProfile {
            email: self.email.clone(),
            username: self.username.clone(),
            avatar: self.avatar.clone(),
            bio: self.bio.clone(),
        }
    }
}
