// SPDX-License-Identifier: MIT

//! RAWG catalog API client.
//!
//! Handles:
//! - Paged game listing, by genre and by search term
//! - Genre list
//! - Game detail by slug, screenshots/stores/trailers
//!
//! All endpoints are keyed with the same API key query parameter.

use crate::error::AppError;
use crate::models::Publisher;
use serde::{Deserialize, Serialize};

/// Catalog page size (fixed by the browse contract).
pub const PAGE_SIZE: u32 = 20;

/// RAWG API client.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl CatalogClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://api.rawg.io/api".to_string(),
            api_key,
        }
    }

    /// Client against a different base URL (tests).
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    /// List games (paged).
    pub async fn list_games(&self, page: u32) -> Result<GamePage, AppError> {
        let url = format!("{}/games", self.base_url);
        self.get_json(
            &url,
            &[
                ("page", page.to_string()),
                ("page_size", PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    /// List games for a genre (paged).
    pub async fn games_by_genre(&self, genre_id: u64, page: u32) -> Result<GamePage, AppError> {
        let url = format!("{}/games", self.base_url);
        self.get_json(
            &url,
            &[
                ("genres", genre_id.to_string()),
                ("page", page.to_string()),
                ("page_size", PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    /// Search games by name (paged).
    pub async fn search_games(&self, query: &str, page: u32) -> Result<GamePage, AppError> {
        let url = format!("{}/games", self.base_url);
        self.get_json(
            &url,
            &[
                ("search", query.to_string()),
                ("page", page.to_string()),
                ("page_size", PAGE_SIZE.to_string()),
            ],
        )
        .await
    }

    /// Get the genre list.
    pub async fn genres(&self) -> Result<Vec<Genre>, AppError> {
        let url = format!("{}/genres", self.base_url);
        let page: GenrePage = self.get_json(&url, &[]).await?;
        Ok(page.results)
    }

    /// Get a game's details by slug.
    pub async fn game_by_slug(&self, slug: &str) -> Result<GameDetail, AppError> {
        let url = format!("{}/games/{}", self.base_url, urlencoding::encode(slug));
        self.get_json(&url, &[]).await
    }

    /// Get screenshots for a game by ID.
    pub async fn screenshots(&self, game_id: u64) -> Result<Vec<Screenshot>, AppError> {
        let url = format!("{}/games/{}/screenshots", self.base_url, game_id);
        let page: ScreenshotPage = self.get_json(&url, &[]).await?;
        Ok(page.results)
    }

    /// Get store links for a game by slug.
    pub async fn stores(&self, slug: &str) -> Result<Vec<StoreEntry>, AppError> {
        let url = format!(
            "{}/games/{}/stores",
            self.base_url,
            urlencoding::encode(slug)
        );
        let page: StorePage = self.get_json(&url, &[]).await?;
        Ok(page.results)
    }

    /// Get trailers for a game by slug.
    pub async fn trailers(&self, slug: &str) -> Result<Vec<Trailer>, AppError> {
        let url = format!(
            "{}/games/{}/movies",
            self.base_url,
            urlencoding::encode(slug)
        );
        let page: TrailerPage = self.get_json(&url, &[]).await?;
        Ok(page.results)
    }

    /// Generic GET request with the API key and JSON response.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
        params: &[(&str, String)],
    ) -> Result<T, AppError> {
        let response = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| AppError::CatalogApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                tracing::warn!("Catalog API rate limit hit (429)");
            }

            return Err(AppError::CatalogApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::CatalogApi(format!("Invalid response body: {}", e)))
    }
}

// ─── Wire Types ──────────────────────────────────────────────────

/// One page of catalog results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamePage {
    /// Total number of games matching the query
    pub count: u64,
    pub results: Vec<GameSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub released: Option<String>,
    pub background_image: Option<String>,
    pub rating: Option<f64>,
    pub metacritic: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct GenrePage {
    results: Vec<Genre>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Genre {
    pub id: u64,
    pub name: String,
    pub slug: String,
    pub games_count: Option<u64>,
    pub image_background: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameDetail {
    pub id: u64,
    pub slug: String,
    pub name: String,
    pub description_raw: Option<String>,
    pub background_image: Option<String>,
    pub background_image_additional: Option<String>,
    pub metacritic: Option<i32>,
    pub rating: Option<f64>,
    #[serde(default)]
    pub publishers: Vec<Publisher>,
    pub reddit_url: Option<String>,
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScreenshotPage {
    results: Vec<Screenshot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screenshot {
    pub id: u64,
    pub image: String,
}

#[derive(Debug, Deserialize)]
struct StorePage {
    results: Vec<StoreEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEntry {
    pub id: u64,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct TrailerPage {
    results: Vec<Trailer>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trailer {
    pub id: u64,
    pub name: String,
    pub preview: Option<String>,
    pub data: TrailerData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailerData {
    #[serde(rename = "480")]
    pub sd: Option<String>,
    pub max: Option<String>,
}
