// SPDX-License-Identifier: MIT

//! Rating and review lifecycle routes.
//!
//! Two write paths exist for the `ratings` collection:
//! - the composite flow (`/api/reviews`): one generated-id document per
//!   submission, carrying a ratings half, a review half, or both;
//! - the flat endpoint (`/api/ratings`): six dimensions upserted with
//!   merge semantics onto the deterministic `{userId}_{gameId}` key.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FlatRating, GameSnapshot, RatingDoc, RatingScores, Review};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post, put},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/reviews", get(list_own).post(submit_composite))
        .route("/api/reviews/{doc_id}", axum::routing::delete(delete_doc))
        .route("/api/reviews/{doc_id}/ratings", put(modify_ratings))
        .route("/api/reviews/{doc_id}/review", put(modify_review))
        .route("/api/ratings", post(submit_flat))
}

// ─── Composite Submission ────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub game: GameSnapshot,
    #[serde(default)]
    pub overall: u8,
    #[serde(default)]
    pub story: u8,
    #[serde(default)]
    pub gameplay: u8,
    #[serde(default)]
    pub graphics: u8,
    #[serde(default)]
    pub audio: u8,
    #[serde(default)]
    pub multiplayer: u8,
    #[serde(default)]
    pub review_title: String,
    #[serde(default)]
    pub review_text: String,
}

impl SubmitRequest {
    fn scores(&self) -> RatingScores {
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

/// Build the document halves from a submission, or reject it.
///
/// The ratings half is attached only when all six dimensions are filled;
/// the review half only when title and text are both present. A
/// submission qualifying for neither half is rejected without a write.
fn build_halves(req: &SubmitRequest) -> Result<(Option<RatingScores>, Option<Review>)> {
    let scores = req.scores();
    let wants_ratings = !matches!(
        scores,
        RatingScores {
            overall: 0,
            story: 0,
            gameplay: 0,
            graphics: 0,
            audio: 0,
            multiplayer: 0,
        }
    );

    let ratings = if wants_ratings {
        if !scores.is_complete() {
            return Err(AppError::Validation(
                "Please provide ratings for all aspects.".to_string(),
            ));
        }
        if !scores.in_range() {
            return Err(AppError::Validation(
                "Ratings must be between 1 and 5 stars.".to_string(),
            ));
        }
        Some(scores)
    } else {
        None
    };

    let title = req.review_title.trim();
    let text = req.review_text.trim();
    let review = match (title.is_empty(), text.is_empty()) {
        (true, true) => None,
        (false, false) => Some(Review {
            title: title.to_string(),
            text: text.to_string(),
        }),
        _ => {
            return Err(AppError::Validation(
                "A review needs both a title and text.".to_string(),
            ));
        }
    };

    if ratings.is_none() && review.is_none() {
        return Err(AppError::Validation(
            "Please provide ratings or a review.".to_string(),
        ));
    }

    Ok((ratings, review))
}

/// Submit a new rating and/or review document.
async fn submit_composite(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<RatingDoc>> {
    let (ratings, review) = build_halves(&req)?;

    let doc = RatingDoc {
        doc_id: uuid::Uuid::new_v4().to_string(),
        user_id: user.email.clone(),
        game: req.game,
        ratings,
        review,
        created_at: chrono::Utc::now(),
    };

    state.db.create_rating(&doc).await?;
    tracing::info!(
        user = %user.email,
        game = doc.game.id,
        doc_id = %doc.doc_id,
        "Rating/review submitted"
    );

    Ok(Json(doc))
}

// ─── Own Ratings / Reviews ───────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    /// Sort the rating view by overall stars: "highest" or "lowest"
    order: Option<String>,
}

/// A rated entry with the six-dimension average attached.
#[derive(Serialize)]
pub struct RatedEntry {
    #[serde(flatten)]
    pub doc: RatingDoc,
    pub average_rating: f64,
}

#[derive(Serialize)]
pub struct OwnDocsResponse {
    /// Documents carrying a ratings half
    pub ratings: Vec<RatedEntry>,
    /// Documents carrying a review half
    pub reviews: Vec<RatingDoc>,
}

/// List the caller's rating/review documents, split by half.
async fn list_own(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<ListQuery>,
) -> Result<Json<OwnDocsResponse>> {
    let docs = state.db.ratings_for_user(&user.email).await?;

    let reviews: Vec<RatingDoc> = docs.iter().filter(|d| d.review.is_some()).cloned().collect();

    let mut ratings: Vec<RatedEntry> = docs
        .into_iter()
        .filter(|d| d.ratings.is_some())
        .map(|doc| {
            let average_rating = doc.ratings.map(|r| r.average()).unwrap_or_default();
            RatedEntry {
                doc,
                average_rating,
            }
        })
        .collect();

    match params.order.as_deref() {
        Some("highest") => ratings.sort_by(|a, b| {
            let a = a.doc.ratings.map(|r| r.overall).unwrap_or(0);
            let b = b.doc.ratings.map(|r| r.overall).unwrap_or(0);
            b.cmp(&a)
        }),
        Some("lowest") => ratings.sort_by(|a, b| {
            let a = a.doc.ratings.map(|r| r.overall).unwrap_or(0);
            let b = b.doc.ratings.map(|r| r.overall).unwrap_or(0);
            a.cmp(&b)
        }),
        _ => {}
    }

    Ok(Json(OwnDocsResponse { ratings, reviews }))
}

// ─── Partial Updates ─────────────────────────────────────────

#[derive(Deserialize)]
pub struct ModifyRatingsRequest {
    pub overall: u8,
    pub story: u8,
    pub gameplay: u8,
    pub graphics: u8,
    pub audio: u8,
    pub multiplayer: u8,
}

/// Overwrite the ratings half of a document, leaving the review as is.
async fn modify_ratings(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(doc_id): Path<String>,
    Json(req): Json<ModifyRatingsRequest>,
) -> Result<Json<serde_json::Value>> {
    let scores = RatingScores {
        overall: req.overall,
        story: req.story,
        gameplay: req.gameplay,
        graphics: req.graphics,
        audio: req.audio,
        multiplayer: req.multiplayer,
    };
    if !scores.is_complete() || !scores.in_range() {
        return Err(AppError::Validation(
            "Please provide ratings for all aspects.".to_string(),
        ));
    }

    require_owned(&state, &user, &doc_id).await?;
    state.db.set_rating_scores(&doc_id, &scores).await?;

    tracing::info!(user = %user.email, doc_id = %doc_id, "Ratings modified");
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Deserialize)]
pub struct ModifyReviewRequest {
    pub title: String,
    pub text: String,
}

/// Overwrite the review half of a document, leaving the ratings as is.
async fn modify_review(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(doc_id): Path<String>,
    Json(req): Json<ModifyReviewRequest>,
) -> Result<Json<serde_json::Value>> {
    let title = req.title.trim();
    let text = req.text.trim();
    if title.is_empty() || text.is_empty() {
        return Err(AppError::Validation(
            "A review needs both a title and text.".to_string(),
        ));
    }

    require_owned(&state, &user, &doc_id).await?;
    state
        .db
        .set_review(
            &doc_id,
            &Review {
                title: title.to_string(),
                text: text.to_string(),
            },
        )
        .await?;

    tracing::info!(user = %user.email, doc_id = %doc_id, "Review modified");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Delete a document wholesale, whichever halves it carries.
async fn delete_doc(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(doc_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    require_owned(&state, &user, &doc_id).await?;
    state.db.delete_rating(&doc_id).await?;

    tracing::info!(user = %user.email, doc_id = %doc_id, "Rating/review deleted");
    Ok(Json(serde_json::json!({ "success": true })))
}

async fn require_owned(state: &AppState, user: &AuthUser, doc_id: &str) -> Result<()> {
    let doc = state
        .db
        .get_rating(doc_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Rating {} not found", doc_id)))?;
    if doc.user_id != user.email {
        return Err(AppError::NotFound(format!("Rating {} not found", doc_id)));
    }
    Ok(())
}

// ─── Flat Rating Endpoint ────────────────────────────────────

#[derive(Deserialize)]
pub struct FlatRatingRequest {
    pub game_id: u64,
    pub overall: u8,
    pub story: u8,
    pub gameplay: u8,
    pub graphics: u8,
    pub audio: u8,
    pub multiplayer: u8,
}

/// Upsert a flat rating keyed by `{userId}_{gameId}`.
async fn submit_flat(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<FlatRatingRequest>,
) -> Result<Json<serde_json::Value>> {
    let rating = FlatRating {
        user_id: user.email.clone(),
        game_id: req.game_id,
        overall: req.overall,
        story: req.story,
        gameplay: req.gameplay,
        graphics: req.graphics,
        audio: req.audio,
        multiplayer: req.multiplayer,
        created_at: chrono::Utc::now(),
    };

    if !rating.scores().is_complete() || !rating.scores().in_range() {
        return Err(AppError::Validation(
            "Please provide ratings for all aspects.".to_string(),
        ));
    }

    state.db.upsert_flat_rating(&rating).await?;
    tracing::info!(user = %user.email, game = req.game_id, "Flat rating upserted");

    Ok(Json(
        serde_json::json!({ "message": "Rating submitted successfully" }),
    ))
}
