//! HTTP route definitions.

mod health;
mod history;
mod random;

use axum::routing::get;
use axum::Router;

use crate::state::AppState;

pub use self::random::{random_picture, RandomQuery};

/// Build the complete router.
///
/// - `GET /health` - Liveness probe
/// - `GET /random?sub=<subreddit>&listing=<listing>` - Pick and record a random picture
/// - `GET /history` - Every picture picked so far
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/random", get(random::random))
        .route("/history", get(history::history))
        .with_state(state)
}
