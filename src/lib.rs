//! leanservice - random Reddit pictures over HTTP.
//!
//! Each call to `/random` fetches one listing page from Reddit, keeps the
//! posts whose URL points at the direct-image host, picks one of them
//! uniformly at random and appends it to a SQLite history exposed at
//! `/history`.
//!
//! # Architecture
//!
//! ```text
//!  /random ──► source::ListingSource::fetch ──► source::filter_pictures
//!                                                       │
//!  /history ◄── history::HistoryStore ◄── picker::pick ◄┘
//! ```
//!
//! - **`source/`**: the `ListingSource` trait, the Reddit implementation and
//!   the listing-to-candidate filter.
//! - **`picker`**: uniform random choice.
//! - **`history`**: append-only SQLite store.
//! - **`routes`**: axum handlers; **`error`** maps failures to status codes.
//! - **`config`** / **`state`**: environment configuration and shared state.

pub mod config;
mod error;
pub mod history;
pub mod picker;
mod routes;
pub mod source;
mod state;

pub use self::config::{Config, Environment};
pub use self::error::ApiError;
pub use self::history::{HistoryRecord, HistoryStore, StoreError};
pub use self::routes::{random_picture, router, RandomQuery};
pub use self::state::AppState;
