// SPDX-License-Identifier: MIT

//! Firestore integration tests.
//!
//! These tests require the Firestore emulator to be running
//! (set FIRESTORE_EMULATOR_HOST); they are skipped otherwise.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use gamelog::models::User;
use tower::ServiceExt;

mod common;
use common::{create_emulator_app, create_test_jwt, test_db};

/// Unique email per test run for isolation.
fn unique_email(prefix: &str) -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}-{}@example.com", prefix, nanos)
}

fn test_user(email: &str, username: &str) -> User {
    User {
        email: email.to_string(),
        username: username.to_string(),
        password_salt: "00".to_string(),
        password_hash: "00".to_string(),
        avatar: Some("https://example.com/pic.jpg".to_string()),
        bio: None,
        created_at: "2026-01-15T10:00:00Z".to_string(),
        updated_at: "2026-01-15T10:00:00Z".to_string(),
    }
}

fn game_json(id: u64) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("Game {}", id),
        "slug": format!("game-{}", id)
    })
}

async fn send_json(
    app: &axum::Router,
    method: &str,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get_json(
    app: &axum::Router,
    uri: &str,
    token: &str,
) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_user_round_trip() {
    require_emulator!();

    let db = test_db().await;
    let email = unique_email("user");

    assert!(db.get_user(&email).await.unwrap().is_none());

    db.upsert_user(&test_user(&email, "round_tripper"))
        .await
        .unwrap();

    let fetched = db.get_user(&email).await.unwrap().expect("user exists");
    assert_eq!(fetched.email, email);
    assert_eq!(fetched.username, "round_tripper");
    assert_eq!(
        fetched.avatar,
        Some("https://example.com/pic.jpg".to_string())
    );
}

#[tokio::test]
async fn test_duplicate_list_add_persists_once() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let email = unique_email("lists");
    let token = create_test_jwt(&email, &state.config.jwt_signing_key);

    // Create the list seeded with game 42
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/lists",
        &token,
        serde_json::json!({ "name": "Backlog", "game": game_json(42) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Adding the same (list, game) pair again is rejected with a notice
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/lists/Backlog/games",
        &token,
        serde_json::json!({ "game": game_json(42) }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "validation");

    // Exactly one document persisted
    let entries = state.db.lists_for_user(&email).await.unwrap();
    assert_eq!(entries.len(), 1);

    // A different game in the same list is fine
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/lists/Backlog/games",
        &token,
        serde_json::json!({ "game": game_json(43) }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(state.db.lists_for_user(&email).await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_list_name_rejected() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let email = unique_email("listnames");
    let token = create_test_jwt(&email, &state.config.jwt_signing_key);

    let create = serde_json::json!({ "name": "Favorites", "game": game_json(1) });
    let (status, _) = send_json(&app, "POST", "/api/lists", &token, create.clone()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send_json(&app, "POST", "/api/lists", &token, create).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_friend_add_duplicate_and_remove() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let a = unique_email("owner");
    let b = unique_email("friend");
    state.db.upsert_user(&test_user(&a, "owner_a")).await.unwrap();
    state.db.upsert_user(&test_user(&b, "friend_b")).await.unwrap();

    let token = create_test_jwt(&a, &state.config.jwt_signing_key);

    let (status, edge) = send_json(
        &app,
        "POST",
        "/api/friends",
        &token,
        serde_json::json!({ "email": b }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edge["friend"]["username"], "friend_b");

    // Duplicate target rejected
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/friends",
        &token,
        serde_json::json!({ "email": b }),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(state.db.friends_for_user(&a).await.unwrap().len(), 1);

    // Remove by edge id
    let doc_id = edge["doc_id"].as_str().unwrap();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/friends/{}", doc_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.db.friends_for_user(&a).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_partial_update_preserves_other_half() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let email = unique_email("partial");
    let token = create_test_jwt(&email, &state.config.jwt_signing_key);

    let (status, doc) = send_json(
        &app,
        "POST",
        "/api/reviews",
        &token,
        serde_json::json!({
            "game": game_json(7),
            "overall": 5, "story": 4, "gameplay": 4,
            "graphics": 5, "audio": 3, "multiplayer": 2,
            "review_title": "Solid", "review_text": "Good stuff"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let doc_id = doc["doc_id"].as_str().unwrap();

    // Rewrite only the review half
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/reviews/{}/review", doc_id),
        &token,
        serde_json::json!({ "title": "Changed my mind", "text": "Even better" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stored = state
        .db
        .get_rating(doc_id)
        .await
        .unwrap()
        .expect("doc exists");
    let ratings = stored.ratings.expect("ratings half untouched");
    assert_eq!(ratings.overall, 5);
    let review = stored.review.expect("review half present");
    assert_eq!(review.title, "Changed my mind");

    // And the other direction: rewrite only the ratings half
    let (status, _) = send_json(
        &app,
        "PUT",
        &format!("/api/reviews/{}/ratings", doc_id),
        &token,
        serde_json::json!({
            "overall": 1, "story": 1, "gameplay": 1,
            "graphics": 1, "audio": 1, "multiplayer": 1
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let stored = state.db.get_rating(doc_id).await.unwrap().unwrap();
    assert_eq!(stored.ratings.unwrap().overall, 1);
    assert_eq!(stored.review.unwrap().title, "Changed my mind");
}

#[tokio::test]
async fn test_flat_rating_upsert_is_idempotent() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let email = unique_email("flat");
    let token = create_test_jwt(&email, &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "game_id": 42,
        "overall": 4, "story": 4, "gameplay": 4,
        "graphics": 4, "audio": 4, "multiplayer": 4
    });

    let (status, _) = send_json(&app, "POST", "/api/ratings", &token, body.clone()).await;
    assert_eq!(status, StatusCode::OK);

    // Second submission overwrites the same document
    let mut second = body;
    second["overall"] = serde_json::json!(5);
    let (status, _) = send_json(&app, "POST", "/api/ratings", &token, second).await;
    assert_eq!(status, StatusCode::OK);

    let docs = state.db.ratings_for_user(&email).await.unwrap();
    assert_eq!(docs.len(), 1, "repeat submissions share one document");
}

#[tokio::test]
async fn test_feed_end_to_end() {
    require_emulator!();

    let (app, state) = create_emulator_app().await;
    let a = unique_email("feed-a");
    let b = unique_email("feed-b");
    state.db.upsert_user(&test_user(&a, "alice")).await.unwrap();
    state.db.upsert_user(&test_user(&b, "bob")).await.unwrap();

    let token_a = create_test_jwt(&a, &state.config.jwt_signing_key);
    let token_b = create_test_jwt(&b, &state.config.jwt_signing_key);

    // A befriends B
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/friends",
        &token_a,
        serde_json::json!({ "email": b }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // B independently rates game 42 with a review
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/reviews",
        &token_b,
        serde_json::json!({
            "game": game_json(42),
            "overall": 5, "story": 5, "gameplay": 5,
            "graphics": 5, "audio": 5, "multiplayer": 5,
            "review_title": "good fun", "review_text": "Loved every minute"
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // A's feed contains one entry attributed to B
    let (status, feed) = get_json(&app, "/api/feed", &token_a).await;
    assert_eq!(status, StatusCode::OK);

    let entries = feed["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);

    let entry = &entries[0];
    assert_eq!(entry["friend_email"], serde_json::json!(b));
    assert_eq!(entry["friend_username"], "bob");
    assert_eq!(entry["game"]["id"], 42);
    assert_eq!(entry["ratings"]["overall"], 5);
    assert_eq!(entry["impression"], "positive");
    assert!(entry["when"].as_str().unwrap().ends_with(" ago"));
}
