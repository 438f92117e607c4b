// SPDX-License-Identifier: MIT

//! Friend activity feed aggregation.
//!
//! Handles the core pipeline:
//! 1. Fetch the caller's friendship edges
//! 2. Fan out one ratings query per distinct friend email
//! 3. Merge everything into one sequence, newest first
//! 4. Resolve each entry's friend identity from the edge set
//!
//! The fan-out queries complete in arbitrary order; merging happens only
//! after all of them resolve. There is no caching: every call re-issues
//! the full fan-out.

use crate::db::FirestoreDb;
use crate::error::AppError;
use crate::models::{FriendEdge, FriendSnapshot, GameSnapshot, RatingDoc, RatingScores, Review};
use crate::services::sentiment::{self, Impression};
use crate::time_utils::relative_time_label;
use chrono::{DateTime, Utc};
use futures_util::{stream, StreamExt};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

const MAX_CONCURRENT_FETCHES: usize = 10;

/// One activity feed entry.
#[derive(Debug, Clone, Serialize)]
pub struct FeedEntry {
    pub doc_id: String,
    /// Friend attribution; username is empty and avatar absent when the
    /// originating friend cannot be resolved from the edge set.
    pub friend_email: String,
    pub friend_username: String,
    pub friend_avatar: Option<String>,
    pub game: GameSnapshot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings: Option<RatingScores>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review: Option<Review>,
    /// Sentiment tag derived from the review title (present iff the
    /// entry carries a review).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impression: Option<Impression>,
    pub created_at: DateTime<Utc>,
    /// Relative-time label, e.g. "2w ago"
    pub when: String,
}

/// Assembles the activity feed for a user.
#[derive(Clone)]
pub struct FeedService {
    db: FirestoreDb,
}

impl FeedService {
    pub fn new(db: FirestoreDb) -> Self {
        Self { db }
    }

    /// Build the feed for `user_email`.
    ///
    /// A friend whose ratings query fails contributes nothing; the feed
    /// never fails on partial data.
    pub async fn assemble(&self, user_email: &str) -> Result<Vec<FeedEntry>, AppError> {
        let edges = self.db.friends_for_user(user_email).await?;

        // Distinct friend emails, preserving first-seen order
        let mut seen = HashSet::new();
        let mut friend_emails = Vec::new();
        for edge in &edges {
            if seen.insert(edge.friend.email.clone()) {
                friend_emails.push(edge.friend.email.clone());
            }
        }

        tracing::debug!(
            user = user_email,
            friends = friend_emails.len(),
            "Assembling activity feed"
        );

        let db = self.db.clone();
        let results: Vec<Result<Vec<RatingDoc>, AppError>> = stream::iter(friend_emails)
            .map(|email| {
                let db = db.clone();
                async move { db.ratings_for_user(&email).await }
            })
            .buffer_unordered(MAX_CONCURRENT_FETCHES)
            .collect()
            .await;

        let mut docs = Vec::new();
        for result in results {
            match result {
                Ok(batch) => docs.extend(batch),
                Err(e) => {
                    tracing::warn!(error = %e, "Friend ratings fetch failed, skipping");
                }
            }
        }

        Ok(merge_feed(docs, &edges, Utc::now()))
    }
}

/// Merge rating documents into the rendered feed sequence.
///
/// Strictly descending by creation second; the sort is stable, so
/// entries with equal timestamps keep their input order.
pub fn merge_feed(
    mut docs: Vec<RatingDoc>,
    edges: &[FriendEdge],
    now: DateTime<Utc>,
) -> Vec<FeedEntry> {
    docs.sort_by(|a, b| b.created_at.timestamp().cmp(&a.created_at.timestamp()));

    // Reverse lookup over the edge set; first matching edge wins.
    let mut by_email: HashMap<&str, &FriendSnapshot> = HashMap::new();
    for edge in edges {
        by_email.entry(edge.friend.email.as_str()).or_insert(&edge.friend);
    }

    docs.into_iter()
        .map(|doc| {
            let friend = by_email.get(doc.user_id.as_str());
            let impression = doc
                .review
                .as_ref()
                .map(|review| sentiment::impression_for(&review.title));

            FeedEntry {
                friend_email: doc.user_id.clone(),
                friend_username: friend.map(|f| f.username.clone()).unwrap_or_default(),
                friend_avatar: friend.and_then(|f| f.avatar.clone()),
                impression,
                when: relative_time_label(doc.created_at, now),
                doc_id: doc.doc_id,
                game: doc.game,
                ratings: doc.ratings,
                review: doc.review,
                created_at: doc.created_at,
            }
        })
        .collect()
}
