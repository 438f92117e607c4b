// SPDX-License-Identifier: MIT

//! Friendship edge model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Directed friendship edge: owner -> friend. No reciprocal edge is
/// created automatically.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendEdge {
    /// Generated document ID
    pub doc_id: String,
    /// Owner email
    pub user_id: String,
    /// Denormalized copy of the friend's profile at add time
    pub friend: FriendSnapshot,
    pub created_at: DateTime<Utc>,
}

/// Friend profile fields copied into the edge document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriendSnapshot {
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}
