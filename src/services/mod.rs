// SPDX-License-Identifier: MIT

//! Services module - business logic and external API clients.

pub mod browse;
pub mod catalog;
pub mod feed;
pub mod news;
pub mod password;
pub mod sentiment;
pub mod storage;

pub use browse::{BrowseSession, BrowseSessions};
pub use catalog::CatalogClient;
pub use feed::FeedService;
pub use news::NewsClient;
pub use sentiment::Impression;
pub use storage::AvatarStorage;
