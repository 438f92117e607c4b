// SPDX-License-Identifier: MIT

//! Gaming news routes.

use crate::error::Result;
use crate::middleware::auth::AuthUser;
use crate::services::news::Article;
use crate::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

const DEFAULT_CATEGORY: &str = "Gaming";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/news", get(get_news))
}

#[derive(Deserialize)]
struct NewsQuery {
    #[serde(default)]
    q: String,
    category: Option<String>,
}

/// Search gaming news.
///
/// With no search term the category name itself is the query (the
/// category-tab behavior); a search term is scoped to the category.
async fn get_news(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<NewsQuery>,
) -> Result<Json<Vec<Article>>> {
    let category = params
        .category
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());

    let query = params.q.trim();
    tracing::debug!(user = %user.email, query, category = %category, "Fetching news");

    let articles = if query.is_empty() {
        state.news.search_articles(&category, None).await?
    } else {
        state.news.search_articles(query, Some(&category)).await?
    };

    Ok(Json(articles))
}
