// SPDX-License-Identifier: MIT

//! GameLog: a gaming social/review service.
//!
//! This crate provides the backend API for browsing the game catalog,
//! rating and reviewing titles, curating custom lists, managing friends
//! and serving the friend activity feed.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::FirestoreDb;
use services::{AvatarStorage, BrowseSessions, CatalogClient, NewsClient};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: FirestoreDb,
    pub catalog: CatalogClient,
    pub news: NewsClient,
    pub storage: AvatarStorage,
    pub browse: BrowseSessions,
}
