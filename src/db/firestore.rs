// SPDX-License-Identifier: MIT

//! Firestore client wrapper with typed operations.
//!
//! Provides high-level operations for:
//! - Users (profile storage, keyed by email)
//! - Friends (directed friendship edges)
//! - Ratings (rating/review documents)
//! - Lists (custom list entries)
//!
//! Relationships are resolved by repeated equality-filtered queries over
//! embedded snapshots, never by joins; uniqueness rules are checked by
//! the callers before writing (read-then-check-then-write, no
//! transactions).

use crate::db::collections;
use crate::error::AppError;
use crate::models::{FlatRating, FriendEdge, ListEntry, RatingDoc, RatingScores, Review, User};
use serde::{Deserialize, Serialize};

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, AppError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, AppError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        // Use ExternalJwtFunctionSource to provide a dummy token without needing async-trait
        // or a custom TokenSource implementation struct.
        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            AppError::Database(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return an error if called.
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, AppError> {
        self.client
            .as_ref()
            .ok_or_else(|| AppError::Database("Database not connected (offline mode)".to_string()))
    }

    // ─── User Operations ─────────────────────────────────────────

    /// Get a user by email.
    pub async fn get_user(&self, email: &str) -> Result<Option<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::USERS)
            .obj()
            .one(email)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create or update a user.
    pub async fn upsert_user(&self, user: &User) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::USERS)
            .document_id(&user.email)
            .object(user)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// List all users (directory browsing and username soft-uniqueness scans).
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::USERS)
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Update profile fields only, leaving credentials untouched.
    ///
    /// `avatar` is written only when a new URL is provided.
    pub async fn update_profile(
        &self,
        email: &str,
        username: &str,
        bio: Option<&str>,
        avatar: Option<&str>,
        updated_at: &str,
    ) -> Result<(), AppError> {
        #[derive(Serialize, Deserialize)]
        struct ProfilePatch {
            username: String,
            bio: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            avatar: Option<String>,
            updated_at: String,
        }

        let mut fields = vec!["username", "bio", "updated_at"];
        if avatar.is_some() {
            fields.push("avatar");
        }

        let patch = ProfilePatch {
            username: username.to_string(),
            bio: bio.map(|s| s.to_string()),
            avatar: avatar.map(|s| s.to_string()),
            updated_at: updated_at.to_string(),
        };

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(fields)
            .in_col(collections::USERS)
            .document_id(email)
            .object(&patch)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Friend Operations ───────────────────────────────────────

    /// Get all friendship edges owned by a user.
    pub async fn friends_for_user(&self, email: &str) -> Result<Vec<FriendEdge>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::FRIENDS)
            .filter(|q| q.for_all([q.field("user_id").eq(email)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a friendship edge.
    pub async fn add_friend(&self, edge: &FriendEdge) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::FRIENDS)
            .document_id(&edge.doc_id)
            .object(edge)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a friendship edge.
    pub async fn remove_friend(&self, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::FRIENDS)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── Rating Operations ───────────────────────────────────────

    /// Get all rating/review documents owned by a user.
    pub async fn ratings_for_user(&self, email: &str) -> Result<Vec<RatingDoc>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::RATINGS)
            .filter(|q| q.for_all([q.field("user_id").eq(email)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a rating document by ID.
    pub async fn get_rating(&self, doc_id: &str) -> Result<Option<RatingDoc>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .by_id_in(collections::RATINGS)
            .obj()
            .one(doc_id)
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a new rating/review document.
    pub async fn create_rating(&self, doc: &RatingDoc) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::RATINGS)
            .document_id(&doc.doc_id)
            .object(doc)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Overwrite only the `ratings` map of a document, leaving the
    /// `review` half untouched (partial-field merge).
    pub async fn set_rating_scores(
        &self,
        doc_id: &str,
        scores: &RatingScores,
    ) -> Result<(), AppError> {
        #[derive(Serialize, Deserialize)]
        struct ScoresPatch {
            ratings: RatingScores,
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(["ratings"])
            .in_col(collections::RATINGS)
            .document_id(doc_id)
            .object(&ScoresPatch { ratings: *scores })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Overwrite only the `review` object of a document, leaving the
    /// `ratings` half untouched.
    pub async fn set_review(&self, doc_id: &str, review: &Review) -> Result<(), AppError> {
        #[derive(Serialize, Deserialize)]
        struct ReviewPatch {
            review: Review,
        }

        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields(["review"])
            .in_col(collections::RATINGS)
            .document_id(doc_id)
            .object(&ReviewPatch { review: review.clone() })
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a rating/review document wholesale, regardless of which
    /// halves are populated.
    pub async fn delete_rating(&self, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::RATINGS)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Merge-upsert a flat rating keyed by `{user_id}_{game_id}`.
    ///
    /// Repeat submissions for the same (user, game) overwrite the listed
    /// fields of the same document instead of creating duplicates.
    pub async fn upsert_flat_rating(&self, rating: &FlatRating) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .fields([
                "user_id",
                "game_id",
                "overall",
                "story",
                "gameplay",
                "graphics",
                "audio",
                "multiplayer",
                "created_at",
            ])
            .in_col(collections::RATINGS)
            .document_id(rating.doc_id())
            .object(rating)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    // ─── List Operations ─────────────────────────────────────────

    /// Get all list entries owned by a user.
    pub async fn lists_for_user(&self, email: &str) -> Result<Vec<ListEntry>, AppError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::LISTS)
            .filter(|q| q.for_all([q.field("user_id").eq(email)]))
            .obj()
            .query()
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Store a list entry.
    pub async fn add_list_entry(&self, entry: &ListEntry) -> Result<(), AppError> {
        let _: () = self
            .get_client()?
            .fluent()
            .update()
            .in_col(collections::LISTS)
            .document_id(&entry.doc_id)
            .object(entry)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Delete a list entry.
    pub async fn delete_list_entry(&self, doc_id: &str) -> Result<(), AppError> {
        self.get_client()?
            .fluent()
            .delete()
            .from(collections::LISTS)
            .document_id(doc_id)
            .execute()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }
}
