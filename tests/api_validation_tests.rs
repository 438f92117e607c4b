// SPDX-License-Identifier: MIT

//! API input validation tests.
//!
//! All validation failures here are checked before any database access,
//! so they run against the offline mock db. Soft rejections (the
//! user-facing notices) surface as 422 with an "error":"validation"
//! body; malformed requests are plain 400s.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use tower::ServiceExt;

mod common;

fn game_json() -> serde_json::Value {
    serde_json::json!({
        "id": 42,
        "name": "Test Game",
        "slug": "test-game"
    })
}

async fn post_json(
    app: axum::Router,
    token: &str,
    uri: &str,
    body: serde_json::Value,
) -> axum::http::Response<Body> {
    app.oneshot(
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::AUTHORIZATION, format!("Bearer {}", token))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_composite_with_missing_dimension_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    // gameplay is 0: every dimension must be filled for the ratings half
    let body = serde_json::json!({
        "game": game_json(),
        "overall": 5, "story": 4, "gameplay": 0,
        "graphics": 5, "audio": 3, "multiplayer": 2
    });

    let response = post_json(app, &token, "/api/reviews", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_empty_composite_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    let body = serde_json::json!({ "game": game_json() });

    let response = post_json(app, &token, "/api/reviews", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_review_without_text_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "game": game_json(),
        "review_title": "Only a title"
    });

    let response = post_json(app, &token, "/api/reviews", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_flat_rating_with_zero_dimension_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    let body = serde_json::json!({
        "game_id": 42,
        "overall": 5, "story": 4, "gameplay": 4,
        "graphics": 5, "audio": 0, "multiplayer": 2
    });

    let response = post_json(app, &token, "/api/ratings", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_self_friend_add_rejected() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    let body = serde_json::json!({ "email": "a@x.com" });

    let response = post_json(app, &token, "/api/friends", body).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_signup_weak_password_rejected() {
    let (app, _state) = common::create_test_app();

    // No uppercase, no special character
    let body = serde_json::json!({
        "username": "player1",
        "email": "player1@x.com",
        "password": "abcdef"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_signup_invalid_email_rejected() {
    let (app, _state) = common::create_test_app();

    let body = serde_json::json!({
        "username": "player1",
        "email": "not-an-email",
        "password": "Sup3r!secret"
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/signup")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_search_requires_query() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/search?q=")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_games_page_must_be_positive() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/games?page=0")
                .header(header::AUTHORIZATION, format!("Bearer {}", token))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_browse_page_must_be_positive() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    let body = serde_json::json!({ "page": 0 });
    let response = post_json(app, &token, "/api/browse/page", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_browse_pager_requires_filter() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("fresh@x.com", &state.config.jwt_signing_key);

    // A brand-new session has no filter; paging has nothing to restart
    let body = serde_json::json!({ "page": 2 });
    let response = post_json(app, &token, "/api/browse/page", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_validation_error_body_shape() {
    let (app, state) = common::create_test_app();
    let token = common::create_test_jwt("a@x.com", &state.config.jwt_signing_key);

    let body = serde_json::json!({ "email": "a@x.com" });
    let response = post_json(app, &token, "/api/friends", body).await;

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(parsed["error"], "validation");
    assert_eq!(parsed["details"], "You can't add yourself.");
}
