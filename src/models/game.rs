// SPDX-License-Identifier: MIT

//! Denormalized game snapshot embedded in rating and list documents.

use serde::{Deserialize, Serialize};

/// Immutable copy of catalog fields taken at the moment a rating,
/// review or list entry is created. Never refreshed against the live
/// catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Catalog game ID
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub background_image: Option<String>,
    pub metacritic: Option<i32>,
    /// Catalog community rating (0..5)
    pub rating: Option<f64>,
    #[serde(default)]
    pub publishers: Vec<Publisher>,
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub stores: Vec<StoreLink>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Publisher {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreLink {
    pub id: u64,
    pub url: String,
}
