// SPDX-License-Identifier: MIT

//! GameLog API Server
//!
//! Serves the game catalog, ratings/reviews, custom lists, friends and
//! the friend activity feed on top of Firestore and the external
//! catalog/news APIs.

use gamelog::{
    config::Config,
    db::FirestoreDb,
    services::{AvatarStorage, BrowseSessions, CatalogClient, NewsClient},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging for GCP
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting GameLog API");

    // Initialize Firestore database
    let db = FirestoreDb::new(&config.gcp_project_id)
        .await
        .expect("Failed to connect to Firestore");

    // External REST clients
    let catalog = CatalogClient::new(config.rawg_api_key.clone());
    let news = NewsClient::new(config.gnews_api_key.clone());
    let storage = AvatarStorage::new(config.storage_bucket.clone());
    tracing::info!(bucket = %config.storage_bucket, "External clients initialized");

    // Per-user catalog browse sessions (shared within this instance)
    let browse = BrowseSessions::new();

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        catalog,
        news,
        storage,
        browse,
    });

    // Build router
    let app = gamelog::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging (GCP-compliant).
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gamelog=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
