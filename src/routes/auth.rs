// SPDX-License-Identifier: MIT

//! Signup, login and logout routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::{PublicProfile, User};
use crate::services::password;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/signup", post(signup))
        .route("/auth/login", post(login))
        .route("/auth/logout", get(logout))
}

#[derive(Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: PublicProfile,
}

/// Create an account.
///
/// Username uniqueness is a soft check (a scan over the users
/// collection); two concurrent signups can both pass it. Accepted race,
/// see the list/friend checks for the same pattern.
async fn signup(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<SignupRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if !password::meets_policy(&req.password) {
        return Err(AppError::Validation(
            "Password does not meet minimum requirements".to_string(),
        ));
    }

    if state.db.get_user(&req.email).await?.is_some() {
        return Err(AppError::Validation("Email already in use".to_string()));
    }

    let username_taken = state
        .db
        .list_users()
        .await?
        .iter()
        .any(|u| u.username == req.username);
    if username_taken {
        return Err(AppError::Validation("Username already exists".to_string()));
    }

    let hashed = password::hash_password(&req.password)?;
    let now = format_utc_rfc3339(chrono::Utc::now());

    let user = User {
        email: req.email.clone(),
        username: req.username,
        password_salt: hashed.salt,
        password_hash: hashed.hash,
        avatar: None,
        bio: None,
        created_at: now.clone(),
        updated_at: now,
    };

    state.db.upsert_user(&user).await?;
    tracing::info!(email = %user.email, "User signed up");

    let token = create_jwt(&user.email, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: user.public(),
        }),
    ))
}

/// Sign in with email and password.
async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<AuthResponse>)> {
    let user = state
        .db
        .get_user(&req.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify_password(&req.password, &user.password_salt, &user.password_hash) {
        return Err(AppError::Unauthorized);
    }

    tracing::info!(email = %user.email, "User logged in");

    let token = create_jwt(&user.email, &state.config.jwt_signing_key)?;
    let jar = jar.add(session_cookie(token.clone()));

    Ok((
        jar,
        Json(AuthResponse {
            token,
            user: user.public(),
        }),
    ))
}

/// Clear the session cookie.
async fn logout(jar: CookieJar) -> (CookieJar, Json<serde_json::Value>) {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    (
        jar.remove(cookie),
        Json(serde_json::json!({ "success": true })),
    )
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build()
}
