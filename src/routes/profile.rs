// SPDX-License-Identifier: MIT

//! Current-user profile routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::time_utils::format_utc_rfc3339;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/me/avatar", post(upload_avatar))
}

/// Current user response.
#[derive(Serialize)]
pub struct ProfileResponse {
    pub email: String,
    pub username: String,
    pub avatar: Option<String>,
    pub bio: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ProfileResponse>> {
    let profile = state
        .db
        .get_user(&user.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.email)))?;

    Ok(Json(ProfileResponse {
        email: profile.email,
        username: profile.username,
        avatar: profile.avatar,
        bio: profile.bio,
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    }))
}

#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 3, max = 32, message = "Username must be 3-32 characters"))]
    pub username: String,
    pub bio: Option<String>,
}

/// Update username and bio.
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    // Username soft-uniqueness, excluding the caller's current name
    let taken = state
        .db
        .list_users()
        .await?
        .iter()
        .any(|u| u.username == req.username && u.email != user.email);
    if taken {
        return Err(AppError::Validation("Username already exists".to_string()));
    }

    let now = format_utc_rfc3339(chrono::Utc::now());
    state
        .db
        .update_profile(
            &user.email,
            &req.username,
            req.bio.as_deref(),
            None,
            &now,
        )
        .await?;

    tracing::info!(email = %user.email, "Profile updated");
    Ok(Json(serde_json::json!({ "success": true })))
}

#[derive(Serialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// Upload a new avatar image.
///
/// The previous avatar object (if any) is deleted first; upload and the
/// profile update are separate steps and can partially complete.
async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Result<Json<AvatarResponse>> {
    let profile = state
        .db
        .get_user(&user.email)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.email)))?;

    let mut upload: Option<(String, String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("avatar") {
            continue;
        }
        let file_name = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| AppError::BadRequest("Avatar file name missing".to_string()))?;
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("Invalid multipart body: {}", e)))?;
        upload = Some((file_name, content_type, bytes.to_vec()));
    }

    let (file_name, content_type, bytes) =
        upload.ok_or_else(|| AppError::Validation("No avatar selected".to_string()))?;

    // Delete the old avatar if it exists; a failure here only logs
    if let Some(old) = &profile.avatar {
        if let Err(e) = state.storage.delete_by_url(old).await {
            tracing::warn!(error = %e, "Error deleting old avatar");
        }
    }

    let url = state
        .storage
        .upload_avatar(&file_name, &content_type, bytes)
        .await?;

    let now = format_utc_rfc3339(chrono::Utc::now());
    state
        .db
        .update_profile(
            &user.email,
            &profile.username,
            profile.bio.as_deref(),
            Some(&url),
            &now,
        )
        .await?;

    tracing::info!(email = %user.email, "Avatar updated");
    Ok(Json(AvatarResponse { avatar: url }))
}
