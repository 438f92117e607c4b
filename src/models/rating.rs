// SPDX-License-Identifier: MIT

//! Rating/review document model.
//!
//! A document may carry the `ratings` half, the `review` half, or both.
//! Presence of each half is the discriminator used by every consumer:
//! rating views skip documents without `ratings`, review views skip
//! documents without `review`.

use crate::models::GameSnapshot;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stored rating/review document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingDoc {
    /// Generated document ID
    pub doc_id: String,
    /// Owner email
    pub user_id: String,
    /// Game snapshot taken at submission time
    pub game: GameSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<RatingScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
    pub created_at: DateTime<Utc>,
}

/// Six-dimension star ratings, each 1-5.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RatingScores {
    pub overall: u8,
    pub story: u8,
    pub gameplay: u8,
    pub graphics: u8,
    pub audio: u8,
    pub multiplayer: u8,
}

impl RatingScores {
    fn dimensions(&self) -> [u8; 6] {
        [
            self.overall,
            self.story,
            self.gameplay,
            self.graphics,
            self.audio,
            self.multiplayer,
        ]
    }

    /// All six dimensions filled in (non-zero).
    pub fn is_complete(&self) -> bool {
        self.dimensions().iter().all(|&d| d != 0)
    }

    /// All six dimensions within the 1-5 star range.
    pub fn in_range(&self) -> bool {
        self.dimensions().iter().all(|&d| (1..=5).contains(&d))
    }

    /// Mean of the six dimensions.
    pub fn average(&self) -> f64 {
        let sum: u32 = self.dimensions().iter().map(|&d| u32::from(d)).sum();
        f64::from(sum) / 6.0
    }
}

/// Free-text review half.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub title: String,
    pub text: String,
}

/// Flat rating shape accepted by the dedicated submission endpoint.
///
/// Unlike [`RatingDoc`], these documents are keyed deterministically by
/// `{user_id}_{game_id}` and upserted with merge semantics, so repeat
/// submissions overwrite rather than duplicate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatRating {
    pub user_id: String,
    pub game_id: u64,
    pub overall: u8,
    pub story: u8,
    pub gameplay: u8,
    pub graphics: u8,
    pub audio: u8,
    pub multiplayer: u8,
    pub created_at: DateTime<Utc>,
}

impl FlatRating {
    /// Deterministic document ID for the merge-upsert write path.
    pub fn doc_id(&self) -> String {
        format!("{}_{}", self.user_id, self.game_id)
    }

    pub fn scores(&self) -> RatingScores {
        RatingScores {
            overall: self.overall,
            story: self.story,
            gameplay: self.gameplay,
            graphics: self.graphics,
            audio: self.audio,
            multiplayer: self.multiplayer,
        }
    }
}
