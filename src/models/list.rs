// SPDX-License-Identifier: MIT

//! Custom list entry model.

use crate::models::GameSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One document per (user, list, game) insertion. List membership is a
/// query over these entries; there is no separate list document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEntry {
    /// Generated document ID
    pub doc_id: String,
    /// Owner email
    pub user_id: String,
    /// List name (case-sensitive)
    pub list_name: String,
    /// Game snapshot taken at insertion time
    pub game: GameSnapshot,
    pub created_at: DateTime<Utc>,
}
