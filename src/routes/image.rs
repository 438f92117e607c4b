// SPDX-License-Identifier: MIT

//! Image proxy route.
//!
//! Fetches an external image and streams it back with its original
//! content type, so the frontend can display hosts outside its image
//! allowlist.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    body::Body,
    extract::Query,
    http::header,
    response::Response,
    routing::get,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/image", get(proxy_image))
}

#[derive(Deserialize)]
struct ImageQuery {
    url: Option<String>,
}

async fn proxy_image(Query(params): Query<ImageQuery>) -> Result<Response> {
    let url = params
        .url
        .filter(|u| u.starts_with("http://") || u.starts_with("https://"))
        .ok_or_else(|| AppError::BadRequest("Missing or invalid image URL".to_string()))?;

    let upstream = reqwest::get(&url)
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to fetch image: {}", e)))?;

    if !upstream.status().is_success() {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Failed to fetch the image."
        )));
    }

    let content_type = upstream
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| AppError::Internal(anyhow::anyhow!(e)))
}
