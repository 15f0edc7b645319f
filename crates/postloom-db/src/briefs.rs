//! Database operations for the `content_briefs` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `content_briefs` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BriefRow {
    pub id: i64,
    pub public_id: Uuid,
    pub user_id: Uuid,
    pub brand_id: i64,
    pub topic: String,
    pub goal: String,
    pub cta_text: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One entry in the recent-briefs feed: the brief joined with its brand name
/// and the number of posts generated for it.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BriefSummaryRow {
    pub public_id: Uuid,
    pub topic: String,
    pub goal: String,
    pub status: String,
    pub brand_name: String,
    pub posts_count: i64,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Creates a new brief directly in `processing` status and returns the full row.
///
/// The orchestrator owns the row for the remainder of the request; every other
/// surface only ever observes it in `processing` or a terminal status.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_brief(
    pool: &PgPool,
    user_id: Uuid,
    brand_id: i64,
    topic: &str,
    goal: &str,
    cta_text: Option<&str>,
) -> Result<BriefRow, DbError> {
    let row = sqlx::query_as::<_, BriefRow>(
        "INSERT INTO content_briefs (user_id, brand_id, topic, goal, cta_text, status) \
         VALUES ($1, $2, $3, $4, $5, 'processing') \
         RETURNING id, public_id, user_id, brand_id, topic, goal, cta_text, status, \
                   created_at, updated_at",
    )
    .bind(user_id)
    .bind(brand_id)
    .bind(topic)
    .bind(goal)
    .bind(cta_text)
    .fetch_one(pool)
    .await?;

    Ok(row)
}

/// Marks a brief as `completed`.
///
/// # Errors
///
/// Returns [`DbError::InvalidBriefTransition`] if the brief is not currently
/// `processing`, or [`DbError::Sqlx`] if the update fails.
pub async fn complete_brief(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE content_briefs \
         SET status = 'completed', updated_at = NOW() \
         WHERE id = $1 AND status = 'processing'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidBriefTransition {
            id,
            expected_status: "processing",
        });
    }

    Ok(())
}

/// Marks a brief as `error`.
///
/// # Errors
///
/// Returns [`DbError::InvalidBriefTransition`] if the brief is not currently
/// `processing`, or [`DbError::Sqlx`] if the update fails.
pub async fn fail_brief(pool: &PgPool, id: i64) -> Result<(), DbError> {
    let result = sqlx::query(
        "UPDATE content_briefs \
         SET status = 'error', updated_at = NOW() \
         WHERE id = $1 AND status = 'processing'",
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::InvalidBriefTransition {
            id,
            expected_status: "processing",
        });
    }

    Ok(())
}

/// Returns a single brief by public id, scoped to its owner, or `None` if not
/// found.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_brief_for_user(
    pool: &PgPool,
    public_id: Uuid,
    user_id: Uuid,
) -> Result<Option<BriefRow>, DbError> {
    let row = sqlx::query_as::<_, BriefRow>(
        "SELECT id, public_id, user_id, brand_id, topic, goal, cta_text, status, \
                created_at, updated_at \
         FROM content_briefs \
         WHERE public_id = $1 AND user_id = $2",
    )
    .bind(public_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns the most recent `limit` briefs for a user, joined with the brand
/// name and per-brief post count, ordered by `created_at DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_briefs_for_user(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<BriefSummaryRow>, DbError> {
    let rows = sqlx::query_as::<_, BriefSummaryRow>(
        "SELECT cb.public_id, cb.topic, cb.goal, cb.status, b.name AS brand_name, \
                (SELECT COUNT(*) FROM generated_posts gp WHERE gp.brief_id = cb.id) AS posts_count, \
                cb.created_at \
         FROM content_briefs cb \
         JOIN brands b ON b.id = cb.brand_id \
         WHERE cb.user_id = $1 \
         ORDER BY cb.created_at DESC, cb.id DESC \
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Sweeps briefs stuck in `processing` for longer than `stale_after_secs`.
///
/// A stuck brief that already has generated posts is moved to `completed`
/// (the run produced content but the finalizing write was lost); one with no
/// posts is moved to `error`. Returns `(completed, errored)` counts.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if either update fails.
#[allow(clippy::cast_precision_loss)]
pub async fn reconcile_stale_briefs(
    pool: &PgPool,
    stale_after_secs: u64,
) -> Result<(u64, u64), DbError> {
    let secs = stale_after_secs as f64;

    let completed = sqlx::query(
        "UPDATE content_briefs cb \
         SET status = 'completed', updated_at = NOW() \
         WHERE cb.status = 'processing' \
           AND cb.updated_at < NOW() - make_interval(secs => $1) \
           AND EXISTS (SELECT 1 FROM generated_posts gp WHERE gp.brief_id = cb.id)",
    )
    .bind(secs)
    .execute(pool)
    .await?
    .rows_affected();

    let errored = sqlx::query(
        "UPDATE content_briefs cb \
         SET status = 'error', updated_at = NOW() \
         WHERE cb.status = 'processing' \
           AND cb.updated_at < NOW() - make_interval(secs => $1) \
           AND NOT EXISTS (SELECT 1 FROM generated_posts gp WHERE gp.brief_id = cb.id)",
    )
    .bind(secs)
    .execute(pool)
    .await?
    .rows_affected();

    Ok((completed, errored))
}
