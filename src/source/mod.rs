//! Listing source abstraction layer.
//!
//! This module defines the [`ListingSource`] trait, the [`SortOrder`] of an
//! upstream listing, and the typed [`FetchError`] every source reports.
//! The concrete Reddit implementation lives in [`reddit`], and turning a raw
//! listing into picture candidates lives in [`post`].
//!
//! ## For contributors — adding a new source
//!
//! 1. Create a new file in this directory (e.g. `lemmy.rs`).
//! 2. Define a struct holding whatever the source needs (base URL, client)
//!    and implement [`ListingSource`] for it.
//! 3. Map the upstream's failure modes onto [`FetchError`] so the HTTP layer
//!    keeps returning the same status codes.
//! 4. Construct it in `main.rs` instead of [`RedditSource`].

mod post;
mod reddit;

pub use post::{filter_pictures, CandidatePost, ListingData, RawListing, DIRECT_IMAGE_HOST};
pub use reddit::{RedditSource, LISTING_LIMIT};

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

/// Trait that every listing source must implement.
///
/// Handlers hold sources as `Arc<dyn ListingSource>`, so implementations
/// must be [`Send`] and [`Sync`].
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch one page of the listing for `source`, ordered by `sort`.
    ///
    /// Exactly one upstream request is made; there are no retries.
    async fn fetch(&self, source: &str, sort: SortOrder) -> Result<RawListing, FetchError>;
}

/// Failure modes of a single listing fetch.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The source does not exist upstream.
    #[error("no such subreddit: {0}")]
    NotFound(String),

    /// The source exists but is private or restricted.
    #[error("this subreddit is private: {0}")]
    Forbidden(String),

    /// Upstream answered with a server error.
    #[error("upstream unavailable (status {0})")]
    UpstreamUnavailable(u16),

    /// Upstream answered with a status we do not handle.
    #[error("unexpected upstream status {0}")]
    UpstreamStatus(u16),

    /// The request never produced a usable response.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The configured upstream address cannot be used as a base URL.
    #[error("invalid upstream base url: {0}")]
    InvalidBaseUrl(String),

    /// A 200 response whose body is not a listing.
    #[error("malformed listing: {0}")]
    Malformed(String),
}

/// How upstream orders the posts of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    New,
    Hot,
    Best,
    Rising,
    Top,
    Controversial,
}

impl SortOrder {
    /// Every variant, in upstream's documentation order.
    pub const ALL: [SortOrder; 6] = [
        SortOrder::New,
        SortOrder::Hot,
        SortOrder::Best,
        SortOrder::Rising,
        SortOrder::Top,
        SortOrder::Controversial,
    ];

    /// The path segment upstream uses for this ordering.
    pub const fn as_str(&self) -> &'static str {
        match self {
            SortOrder::New => "new",
            SortOrder::Hot => "hot",
            SortOrder::Best => "best",
            SortOrder::Rising => "rising",
            SortOrder::Top => "top",
            SortOrder::Controversial => "controversial",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names none of the [`SortOrder`] variants.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown listing type {0:?}, expected one of: new, hot, best, rising, top, controversial")]
pub struct InvalidSortOrder(pub String);

impl FromStr for SortOrder {
    type Err = InvalidSortOrder;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        SortOrder::ALL
            .into_iter()
            .find(|order| order.as_str() == normalized)
            .ok_or_else(|| InvalidSortOrder(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
