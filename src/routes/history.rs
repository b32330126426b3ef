//! `/history`: every picture picked so far.

use axum::extract::State;
use axum::Json;

use crate::error::ApiError;
use crate::history::HistoryRecord;
use crate::state::AppState;

/// Return the full pick history, oldest first.
pub async fn history(State(state): State<AppState>) -> Result<Json<Vec<HistoryRecord>>, ApiError> {
    let records = state.history.list_all().await?;
    tracing::debug!(count = records.len(), "history listed");
    Ok(Json(records))
}
