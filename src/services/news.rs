// SPDX-License-Identifier: MIT

//! GNews article search client.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

/// Maximum articles per search (fixed by the news page contract).
const MAX_ARTICLES: u32 = 10;

/// GNews API client.
#[derive(Clone)]
pub struct NewsClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl NewsClient {
    pub fn new(api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: "https://gnews.io/api/v4".to_string(),
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

    /// Search articles by query, optionally scoped to a category.
    pub async fn search_articles(
        &self,
        query: &str,
        category: Option<&str>,
    ) -> Result<Vec<Article>, AppError> {
        let url = format!("{}/search", self.base_url);

        let mut params = vec![
            ("q", query.to_string()),
            ("token", self.api_key.clone()),
            ("lang", "en".to_string()),
            ("country", "us".to_string()),
            ("max", MAX_ARTICLES.to_string()),
        ];
        if let Some(category) = category {
            params.push(("in", category.to_string()));
        }

        let response = self
            .http
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::NewsApi(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::NewsApi(format!("HTTP {}: {}", status, body)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::NewsApi(format!("Invalid response body: {}", e)))?;

        Ok(body.articles)
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    articles: Vec<Article>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    pub image: Option<String>,
    pub published_at: Option<String>,
    pub source: Option<ArticleSource>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSource {
    pub name: String,
    pub url: Option<String>,
}
