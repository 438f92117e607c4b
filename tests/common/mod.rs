// SPDX-License-Identifier: MIT

use gamelog::config::Config;
use gamelog::db::FirestoreDb;
use gamelog::routes::create_router;
use gamelog::services::{AvatarStorage, BrowseSessions, CatalogClient, NewsClient};
use gamelog::AppState;
use std::sync::Arc;

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// Create a mock database connection (offline).
#[allow(dead_code)]
pub fn test_db_offline() -> FirestoreDb {
    FirestoreDb::new_mock()
}

/// Create a test app with offline mock dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db_offline();
    build_app(config, db)
}

/// Create a test app backed by the Firestore emulator.
#[allow(dead_code)]
pub async fn create_emulator_app() -> (axum::Router, Arc<AppState>) {
    let config = Config::test_default();
    let db = test_db().await;
    build_app(config, db)
}

fn build_app(config: Config, db: FirestoreDb) -> (axum::Router, Arc<AppState>) {
    let catalog = CatalogClient::new(config.rawg_api_key.clone());
    let news = NewsClient::new(config.gnews_api_key.clone());
    let storage = AvatarStorage::new(config.storage_bucket.clone());
    let browse = BrowseSessions::new();

    let state = Arc::new(AppState {
        config,
        db,
        catalog,
        news,
        storage,
        browse,
    });

    (create_router(state.clone()), state)
}

/// Create a session JWT for a test user.
#[allow(dead_code)]
pub fn create_test_jwt(email: &str, signing_key: &[u8]) -> String {
    gamelog::middleware::auth::create_jwt(email, signing_key).expect("JWT creation")
}
