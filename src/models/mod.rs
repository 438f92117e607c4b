// SPDX-License-Identifier: MIT

//! Data models for the application.

pub mod friend;
pub mod game;
pub mod list;
pub mod rating;
pub mod user;

pub use friend::{FriendEdge, FriendSnapshot};
pub use game::{GameSnapshot, Publisher, StoreLink};
pub use list::ListEntry;
pub use rating::{FlatRating, RatingDoc, RatingScores, Review};
pub use user::{PublicProfile, User};
