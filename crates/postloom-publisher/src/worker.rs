//! Batch publish worker.

use postloom_db::{DbError, GeneratedPostRow};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::publisher::Publisher;

/// Outcome of one post's publish attempt.
#[derive(Debug, Clone, Serialize)]
pub struct PublishResult {
    pub post_id: Uuid,
    pub platform: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Claims up to `batch_size` ready posts and attempts delivery for each.
///
/// Claimed posts move `ready_to_post → publishing` atomically, so concurrent
/// workers never double-claim. Each delivery is independent: success records
/// the live URL and `posted_at`, failure records the reason. An empty claim
/// returns an empty vec.
///
/// # Errors
///
/// Returns [`DbError`] only when the claim itself fails. Per-post status
/// writes that fail after delivery are logged and reflected in the result,
/// never propagated.
pub async fn run_publish_batch(
    pool: &PgPool,
    publisher: &dyn Publisher,
    batch_size: i64,
) -> Result<Vec<PublishResult>, DbError> {
    let claimed = postloom_db::claim_ready_posts(pool, batch_size).await?;
    if claimed.is_empty() {
        tracing::info!("no posts ready to publish");
        return Ok(Vec::new());
    }

    tracing::info!(claimed = claimed.len(), "publishing batch");

    let mut results = Vec::with_capacity(claimed.len());
    for post in &claimed {
        results.push(publish_one(pool, publisher, post).await);
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    tracing::info!(
        processed = results.len(),
        succeeded,
        failed = results.len() - succeeded,
        "publish batch finished"
    );

    Ok(results)
}

/// Delivers one claimed post and records its terminal status.
async fn publish_one(
    pool: &PgPool,
    publisher: &dyn Publisher,
    post: &GeneratedPostRow,
) -> PublishResult {
    let media = post.generated_media_urls.as_deref().unwrap_or(&[]);
    match publisher
        .publish(post.public_id, &post.platform, &post.generated_text, media)
        .await
    {
        Ok(delivered) => {
            // The platform accepted the post, so the outcome is a success even
            // if the status write fails; the post then stays in `publishing`
            // for operator attention.
            if let Err(e) = postloom_db::mark_post_posted(pool, post.id, &delivered.post_url).await
            {
                tracing::error!(
                    post_id = %post.public_id,
                    platform = %post.platform,
                    error = %e,
                    "post delivered but status write failed"
                );
            }
            PublishResult {
                post_id: post.public_id,
                platform: post.platform.clone(),
                success: true,
                post_url: Some(delivered.post_url),
                error: None,
            }
        }
        Err(e) => {
            tracing::warn!(
                post_id = %post.public_id,
                platform = %post.platform,
                error = %e,
                "delivery failed"
            );
            if let Err(write_err) = postloom_db::mark_post_failed(pool, post.id, &e.reason).await {
                tracing::error!(
                    post_id = %post.public_id,
                    error = %write_err,
                    "failed to record delivery error"
                );
            }
            PublishResult {
                post_id: post.public_id,
                platform: post.platform.clone(),
                success: false,
                post_url: None,
                error: Some(e.reason),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_result_serializes_without_error_field() {
        let result = PublishResult {
            post_id: Uuid::new_v4(),
            platform: "LinkedIn".to_string(),
            success: true,
            post_url: Some("https://linkedin.com/posts/abc123".to_string()),
            error: None,
        };

        let value = serde_json::to_value(&result).expect("serialization failed");

        assert_eq!(value["success"], true);
        assert_eq!(value["post_url"], "https://linkedin.com/posts/abc123");
        assert!(value.get("error").is_none());
    }

    #[test]
    fn failure_result_serializes_without_url_field() {
        let result = PublishResult {
            post_id: Uuid::new_v4(),
            platform: "Twitter".to_string(),
            success: false,
            post_url: None,
            error: Some("Platform API error".to_string()),
        };

        let value = serde_json::to_value(&result).expect("serialization failed");

        assert_eq!(value["success"], false);
        assert_eq!(value["error"], "Platform API error");
        assert!(value.get("post_url").is_none());
    }
}
