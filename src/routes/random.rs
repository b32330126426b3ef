//! `/random`: fetch a listing, pick one picture post, remember it.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::config::Config;
use crate::error::ApiError;
use crate::history::{HistoryRecord, HistoryStore};
use crate::picker;
use crate::source::{filter_pictures, ListingSource, SortOrder};
use crate::state::AppState;

/// Query parameters of `/random`. Both fall back to configured defaults.
#[derive(Debug, Default, Deserialize)]
pub struct RandomQuery {
    /// Subreddit to draw from.
    pub sub: Option<String>,
    /// Listing type, validated case-insensitively against [`SortOrder`].
    pub listing: Option<String>,
}

pub async fn random(
    State(state): State<AppState>,
    Query(params): Query<RandomQuery>,
) -> Result<Json<HistoryRecord>, ApiError> {
    let record = random_picture(state.source.as_ref(), &state.history, &state.config, params).await?;
    Ok(Json(record))
}

/// Fetch, filter, pick and persist one random picture.
///
/// The listing parameter is validated before upstream is contacted. Nothing
/// is written to `history` unless every earlier step succeeded.
pub async fn random_picture(
    source: &dyn ListingSource,
    history: &HistoryStore,
    config: &Config,
    params: RandomQuery,
) -> Result<HistoryRecord, ApiError> {
    let listing = match params.listing.as_deref() {
        Some(raw) if !raw.trim().is_empty() => raw.parse::<SortOrder>()?,
        _ => config.default_listing,
    };
    let subreddit = params
        .sub
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| config.default_subreddit.clone());

    tracing::debug!(stage = "fetching", subreddit = %subreddit, listing = %listing);
    let raw = source.fetch(&subreddit, listing).await?;

    tracing::debug!(stage = "filtering", entries = raw.len());
    let candidates = filter_pictures(raw);
    if candidates.is_empty() {
        return Err(ApiError::NoPicturesFound { subreddit, listing });
    }

    tracing::debug!(stage = "picking", candidates = candidates.len());
    let post = {
        let mut rng = rand::rng();
        picker::pick(&candidates, &mut rng)?
    };
    let image_url = post.image_url.to_string();
    let post_url = post.canonical_url(&config.permalink_base);

    tracing::debug!(stage = "persisting", url = %image_url);
    let record = history.append(&image_url, &post_url).await?;

    tracing::info!(subreddit = %subreddit, listing = %listing, url = %record.image_url, "picked random picture");
    Ok(record)
}
