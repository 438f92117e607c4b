// SPDX-License-Identifier: MIT

//! Friend activity feed route.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::feed::{FeedEntry, FeedService};
use crate::AppState;
use axum::{extract::State, routing::get, Extension, Json, Router};
use serde::Serialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/feed", get(get_feed))
}

#[derive(Serialize)]
pub struct FeedResponse {
    pub entries: Vec<FeedEntry>,
}

/// The caller's friend activity feed, newest first.
async fn get_feed(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<FeedResponse>> {
    let entries = FeedService::new(state.db.clone())
        .assemble(&user.email)
        .await?;

    Ok(Json(FeedResponse { entries }))
}
