// SPDX-License-Identifier: MIT

//! Custom list routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{GameSnapshot, ListEntry};
use crate::AppState;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/lists", get(get_lists).post(create_list))
        .route("/api/lists/{name}", get(get_list))
        .route("/api/lists/{name}/games", post(add_to_list))
        .route("/api/lists/entries/{doc_id}", delete(delete_entry))
}

/// A named list with its entries.
#[derive(Debug, Serialize)]
pub struct ListGroup {
    pub name: String,
    pub entries: Vec<ListEntry>,
}

/// Group entries by list name for display.
///
/// Display order dedups by first-occurrence-wins over the name field.
/// This is a render-time mechanism, separate from the create-time
/// duplicate check; the two are intentionally not unified.
pub fn group_lists(entries: Vec<ListEntry>) -> Vec<ListGroup> {
    let mut groups: Vec<ListGroup> = Vec::new();
    for entry in entries {
        match groups.iter_mut().find(|g| g.name == entry.list_name) {
            Some(group) => group.entries.push(entry),
            None => groups.push(ListGroup {
                name: entry.list_name.clone(),
                entries: vec![entry],
            }),
        }
    }
    groups
}

/// All of the caller's lists, grouped by name.
async fn get_lists(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<Vec<ListGroup>>> {
    let entries = state.db.lists_for_user(&user.email).await?;
    Ok(Json(group_lists(entries)))
}

/// Entries of one list.
async fn get_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
) -> Result<Json<Vec<ListEntry>>> {
    let entries = state
        .db
        .lists_for_user(&user.email)
        .await?
        .into_iter()
        .filter(|e| e.list_name == name)
        .collect();
    Ok(Json(entries))
}

#[derive(Deserialize)]
pub struct CreateListRequest {
    pub name: String,
    pub game: GameSnapshot,
}

/// Create a new list seeded with a game.
///
/// Rejects when a list with that exact name already exists for the
/// user (case-sensitive). Read-then-check-then-write; accepted race.
async fn create_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<CreateListRequest>,
) -> Result<Json<ListEntry>> {
    if req.name.trim().is_empty() {
        return Err(AppError::Validation("List name is required.".to_string()));
    }

    let existing = state.db.lists_for_user(&user.email).await?;
    if existing.iter().any(|e| e.list_name == req.name) {
        return Err(AppError::Validation("List already exists.".to_string()));
    }

    let entry = ListEntry {
        doc_id: uuid::Uuid::new_v4().to_string(),
        user_id: user.email.clone(),
        list_name: req.name,
        game: req.game,
        created_at: chrono::Utc::now(),
    };

    state.db.add_list_entry(&entry).await?;
    tracing::info!(user = %user.email, list = %entry.list_name, "List created");

    Ok(Json(entry))
}

#[derive(Deserialize)]
pub struct AddToListRequest {
    pub game: GameSnapshot,
}

/// Add a game to an existing list.
///
/// Rejects when the (list, game id) pair is already present.
async fn add_to_list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(name): Path<String>,
    Json(req): Json<AddToListRequest>,
) -> Result<Json<ListEntry>> {
    let existing = state.db.lists_for_user(&user.email).await?;
    if existing
        .iter()
        .any(|e| e.list_name == name && e.game.id == req.game.id)
    {
        return Err(AppError::Validation(
            "Game already exists in this list.".to_string(),
        ));
    }

    let entry = ListEntry {
        doc_id: uuid::Uuid::new_v4().to_string(),
        user_id: user.email.clone(),
        list_name: name,
        game: req.game,
        created_at: chrono::Utc::now(),
    };

    state.db.add_list_entry(&entry).await?;
    tracing::info!(
        user = %user.email,
        list = %entry.list_name,
        game = entry.game.id,
        "Game added to list"
    );

    Ok(Json(entry))
}

/// Remove one entry from a list.
async fn delete_entry(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(doc_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    let owned = state
        .db
        .lists_for_user(&user.email)
        .await?
        .iter()
        .any(|e| e.doc_id == doc_id);
    if !owned {
        return Err(AppError::NotFound(format!("Entry {} not found", doc_id)));
    }

    state.db.delete_list_entry(&doc_id).await?;
    tracing::info!(user = %user.email, doc_id = %doc_id, "List entry deleted");

    Ok(Json(serde_json::json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(doc_id: &str, list_name: &str, game_id: u64) -> ListEntry {
        ListEntry {
            doc_id: doc_id.to_string(),
            user_id: "a@x.com".to_string(),
            list_name: list_name.to_string(),
            game: GameSnapshot {
                id: game_id,
                name: format!("Game {}", game_id),
                slug: format!("game-{}", game_id),
                background_image: None,
                metacritic: None,
                rating: None,
                publishers: vec![],
                screenshots: vec![],
                stores: vec![],
                description: None,
            },
            created_at: chrono::DateTime::from_timestamp(0, 0).unwrap(),
        }
    }

    #[test]
    fn test_group_lists_first_occurrence_wins() {
        let entries = vec![
            entry("1", "Backlog", 10),
            entry("2", "Favorites", 11),
            entry("3", "Backlog", 12),
        ];

        let groups = group_lists(entries);
        let names: Vec<&str> = groups.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Backlog", "Favorites"]);
        assert_eq!(groups[0].entries.len(), 2);
        assert_eq!(groups[1].entries.len(), 1);
    }

    #[test]
    fn test_group_lists_names_are_case_sensitive() {
        let entries = vec![entry("1", "backlog", 10), entry("2", "Backlog", 11)];
        let groups = group_lists(entries);
        assert_eq!(groups.len(), 2);
    }
}
