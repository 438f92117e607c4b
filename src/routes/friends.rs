// SPDX-License-Identifier: MIT

//! Friend management and user directory routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{FriendEdge, FriendSnapshot, PublicProfile};
use crate::routes::lists::{group_lists, ListGroup};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/users", get(search_users))
        .route("/api/users/{email}", get(get_user_page))
        .route("/api/friends", get(list_friends).post(add_friend))
        .route("/api/friends/{doc_id}", delete(remove_friend))
}

#[derive(Deserialize)]
struct UserSearchQuery {
    #[serde(default)]
    search: String,
}

/// User directory, filtered by case-insensitive username substring.
async fn search_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserSearchQuery>,
) -> Result<Json<Vec<PublicProfile>>> {
    let needle = params.search.to_lowercase();
    let users = state
        .db
        .list_users()
        .await?
        .iter()
        .filter(|u| u.username.to_lowercase().contains(&needle))
        .map(|u| u.public())
        .collect();
    Ok(Json(users))
}

/// Friend profile page data: the user plus their ratings and lists.
#[derive(Serialize)]
pub struct UserPageResponse {
    pub user: PublicProfile,
    pub ratings: Vec<crate::models::RatingDoc>,
    pub lists: Vec<ListGroup>,
}

async fn get_user_page(
    State(state): State<Arc<AppState>>,
    Path(email): Path<String>,
) -> Result<Json<UserPageResponse>> {
    let user = state
        .db
        .get_user(&email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", email)))?;

    let ratings = state.db.ratings_for_user(&email).await?;
    let lists = group_lists(state.db.lists_for_user(&email).await?);

    Ok(Json(UserPageResponse {
        user: user.public(),
        ratings,
        lists,
    }))
}

/// List the caller's friendship edges.
async fn list_friends(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<FriendEdge>>> {
    Ok(Json(state.db.friends_for_user(&user.email).await?))
}

#[derive(Deserialize)]
pub struct AddFriendRequest {
    pub email: String,
}

/// Add a friend by email.
///
/// Rejects self-adds and duplicate targets. The duplicate check is a
/// read-then-check-then-write sequence; concurrent adds can both pass it
/// (accepted race, ids are random).
async fn add_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<AddFriendRequest>,
) -> Result<Json<FriendEdge>> {
    if req.email == user.email {
        return Err(AppError::Validation("You can't add yourself.".to_string()));
    }

    let existing = state.db.friends_for_user(&user.email).await?;
    if existing.iter().any(|e| e.friend.email == req.email) {
        return Err(AppError::Validation("Friend already added.".to_string()));
    }

    let target = state
        .db
        .get_user(&req.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", req.email)))?;

    let edge = FriendEdge {
        doc_id: uuid::Uuid::new_v4().to_string(),
        user_id: user.email.clone(),
        friend: FriendSnapshot {
            email: target.email.clone(),
            username: target.username.clone(),
            avatar: target.avatar.clone(),
            bio: target.bio.clone(),
        },
        created_at: chrono::Utc::now(),
    };

    state.db.add_friend(&edge).await?;
    tracing::info!(owner = %user.email, friend = %req.email, "Friend added");

    Ok(Json(edge))
}

/// Remove a friendship edge owned by the caller.
async fn remove_friend(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(doc_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let owned = state
        .db
        .friends_for_user(&user.email)
        .await?
        .iter()
        .any(|e| e.doc_id == doc_id);
    if !owned {
        return Err(AppError::NotFound(format!("Friend {} not found", doc_id)));
    }

    state.db.remove_friend(&doc_id).await?;
    tracing::info!(owner = %user.email, doc_id = %doc_id, "Friend removed");

    Ok(Json(serde_json::json!({ "success": true })))
}
