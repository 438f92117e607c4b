// SPDX-License-Identifier: MIT

//! Catalog passthrough and browse-session routes.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::services::browse::{BrowseFilter, BrowseSnapshot};
use crate::services::catalog::{
    CatalogClient, GameDetail, GamePage, Genre, Screenshot, StoreEntry, Trailer,
};
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Extension, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/games", get(list_games))
        .route("/api/games/{slug}", get(game_detail))
        .route("/api/games/{slug}/stores", get(game_stores))
        .route("/api/games/{slug}/screenshots", get(game_screenshots))
        .route("/api/games/{slug}/trailers", get(game_trailers))
        .route("/api/genres", get(genres))
        .route("/api/search", get(search_games))
        .route("/api/browse", get(browse))
        .route("/api/browse/more", post(browse_more))
        .route("/api/browse/page", post(browse_page))
}

// ─── Passthrough ─────────────────────────────────────────────

#[derive(Deserialize)]
struct PageQuery {
    #[serde(default = "default_page")]
    page: u32,
}

fn default_page() -> u32 {
    1
}

async fn list_games(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PageQuery>,
) -> Result<Json<GamePage>> {
    if params.page < 1 {
        return Err(AppError::BadRequest("Page must be greater than 0".to_string()));
    }
    Ok(Json(state.catalog.list_games(params.page).await?))
}

async fn game_detail(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<GameDetail>> {
    Ok(Json(state.catalog.game_by_slug(&slug).await?))
}

async fn game_stores(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<StoreEntry>>> {
    Ok(Json(state.catalog.stores(&slug).await?))
}

/// Screenshots are fetched by catalog game ID, so the path segment must
/// be numeric here.
async fn game_screenshots(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Screenshot>>> {
    let game_id: u64 = slug
        .parse()
        .map_err(|_| AppError::BadRequest("Screenshots are fetched by game id".to_string()))?;
    Ok(Json(state.catalog.screenshots(game_id).await?))
}

async fn game_trailers(
    State(state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Vec<Trailer>>> {
    Ok(Json(state.catalog.trailers(&slug).await?))
}

async fn genres(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Genre>>> {
    Ok(Json(state.catalog.genres().await?))
}

#[derive(Deserialize)]
struct SearchQuery {
    q: String,
    #[serde(default = "default_page")]
    page: u32,
}

async fn search_games(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<GamePage>> {
    if params.q.trim().is_empty() {
        return Err(AppError::BadRequest("Search query is required".to_string()));
    }
    Ok(Json(
        state.catalog.search_games(&params.q, params.page).await?,
    ))
}

// ─── Browse Sessions ─────────────────────────────────────────

#[derive(Deserialize)]
struct BrowseQuery {
    genre: Option<u64>,
    search: Option<String>,
}

/// Set the browse filter (resetting accumulation to page 1), or return
/// the current accumulation when no filter parameter is given.
async fn browse(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<BrowseQuery>,
) -> Result<Json<BrowseSnapshot>> {
    let filter = match (params.genre, params.search) {
        (Some(genre), _) => Some(BrowseFilter::Genre(genre)),
        (None, Some(q)) if !q.trim().is_empty() => Some(BrowseFilter::Search(q)),
        _ => None,
    };

    let session = state.browse.session(&user.email);

    let Some(filter) = filter else {
        // No filter change requested; just report the current state
        let session = session.lock().await;
        return Ok(Json(session.snapshot()));
    };

    let ticket = {
        let mut session = session.lock().await;
        session.begin_filter(filter.clone())
    };

    let result = fetch_page(&state.catalog, &filter, ticket.page).await;

    let mut session = session.lock().await;
    apply_fetch(&mut session, ticket, result);
    Ok(Json(session.snapshot()))
}

/// Infinite-scroll trigger: append the next page unless a fetch is
/// already in flight or the last page has been reached.
async fn browse_more(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<BrowseSnapshot>> {
    let session = state.browse.session(&user.email);

    let (ticket, filter) = {
        let mut session = session.lock().await;
        let ticket = session.begin_more();
        match (ticket, session.filter().cloned()) {
            (Some(ticket), Some(filter)) => (ticket, filter),
            // In flight, exhausted, or no filter yet: nothing to do
            _ => return Ok(Json(session.snapshot())),
        }
    };

    let result = fetch_page(&state.catalog, &filter, ticket.page).await;

    let mut session = session.lock().await;
    apply_fetch(&mut session, ticket, result);
    Ok(Json(session.snapshot()))
}

#[derive(Deserialize)]
struct BrowsePageRequest {
    page: u32,
}

/// Discrete pager: clear the accumulation and restart from `page`.
async fn browse_page(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(req): Json<BrowsePageRequest>,
) -> Result<Json<BrowseSnapshot>> {
    if req.page < 1 {
        return Err(AppError::BadRequest("Page must be greater than 0".to_string()));
    }

    let session = state.browse.session(&user.email);

    let (ticket, filter) = {
        let mut session = session.lock().await;
        let ticket = session.begin_page(req.page);
        match (ticket, session.filter().cloned()) {
            (Some(ticket), Some(filter)) => (ticket, filter),
            _ => {
                return Err(AppError::BadRequest(
                    "Select a genre or search before paging".to_string(),
                ));
            }
        }
    };

    let result = fetch_page(&state.catalog, &filter, ticket.page).await;

    let mut session = session.lock().await;
    apply_fetch(&mut session, ticket, result);
    Ok(Json(session.snapshot()))
}

async fn fetch_page(
    catalog: &CatalogClient,
    filter: &BrowseFilter,
    page: u32,
) -> Result<GamePage> {
    match filter {
        BrowseFilter::Genre(genre_id) => catalog.games_by_genre(*genre_id, page).await,
        BrowseFilter::Search(query) => catalog.search_games(query, page).await,
    }
}

/// Fold a fetch result into the session. Fetch errors are logged and
/// swallowed; the client sees the unchanged accumulation.
fn apply_fetch(
    session: &mut crate::services::BrowseSession,
    ticket: crate::services::browse::FetchTicket,
    result: Result<GamePage>,
) {
    match result {
        Ok(page) => {
            if !session.complete(ticket, page) {
                tracing::debug!("Discarding stale browse fetch");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Error fetching games");
            session.abort(ticket);
        }
    }
}
