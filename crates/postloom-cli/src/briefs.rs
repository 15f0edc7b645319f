//! `briefs` command: list recent briefs for a user.

use sqlx::PgPool;
use uuid::Uuid;

/// Prints the most recent briefs, newest first.
///
/// # Errors
///
/// Returns an error when the feed query fails.
pub(crate) async fn run_briefs(pool: &PgPool, user_id: Uuid, limit: i64) -> anyhow::Result<()> {
    let limit = limit.clamp(1, 200);
    let briefs = postloom_db::list_briefs_for_user(pool, user_id, limit).await?;
    if briefs.is_empty() {
        println!("no briefs found");
        return Ok(());
    }

    for brief in &briefs {
        println!(
            "{}  {:<10}  {:>2} posts  {}  [{}] {}",
            brief.created_at.format("%Y-%m-%d %H:%M"),
            brief.status,
            brief.posts_count,
            brief.public_id,
            brief.brand_name,
            brief.topic
        );
    }

    Ok(())
}
