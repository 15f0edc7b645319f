//! Manual publish trigger: runs one batch of the publish worker on demand.

use axum::extract::State;
use axum::Json;

use postloom_publisher::run_publish_batch;

use super::{map_db_error, ApiError, AppState};

/// POST /api/v1/publish/run — claim and deliver one batch of ready posts.
///
/// Same code path as the cron job; the endpoint exists so an operator can
/// drain the queue without waiting for the next tick.
pub(in crate::api) async fn run_publish(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let results = run_publish_batch(
        &state.pool,
        state.publisher.as_ref(),
        state.publish_batch_size,
    )
    .await
    .map_err(|e| map_db_error(&e))?;

    if results.is_empty() {
        return Ok(Json(serde_json::json!({
            "message": "No posts ready to publish"
        })));
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "processed": results.len(),
        "results": results
    })))
}
