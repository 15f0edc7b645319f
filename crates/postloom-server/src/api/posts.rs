//! Post scheduling: the external `draft → ready_to_post` transition.

use axum::extract::{Extension, Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use postloom_db::DbError;

use super::{map_db_error, ApiError, AppState};
use crate::middleware::AuthUser;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(in crate::api) struct SchedulePostRequest {
    #[serde(default)]
    pub schedule_time: Option<DateTime<Utc>>,
}

/// POST /api/v1/posts/{post_id}/schedule — move a draft post into the
/// publish queue, optionally recording a requested time.
pub(in crate::api) async fn schedule_post(
    State(state): State<AppState>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(post_id): Path<String>,
    Json(body): Json<SchedulePostRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let public_id =
        Uuid::parse_str(post_id.trim()).map_err(|_| ApiError::not_found("Post not found"))?;

    let post = postloom_db::get_post_for_user(&state.pool, public_id, user_id)
        .await
        .map_err(|e| map_db_error(&e))?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    match postloom_db::mark_post_ready(&state.pool, post.id, body.schedule_time).await {
        Ok(()) => {}
        Err(DbError::InvalidPostTransition { .. }) => {
            return Err(ApiError::conflict("only draft posts can be scheduled"));
        }
        Err(e) => return Err(map_db_error(&e)),
    }

    Ok(Json(serde_json::json!({
        "post_id": post.public_id,
        "status": "ready_to_post"
    })))
}
