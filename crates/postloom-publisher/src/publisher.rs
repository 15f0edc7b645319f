//! Delivery seam for social platforms.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

/// Successful delivery of one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedPost {
    /// URL of the live post on the platform.
    pub post_url: String,
}

/// Failure reported by a delivery backend.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct DeliveryError {
    pub reason: String,
}

/// A platform delivery backend.
///
/// Implementations deliver one post and report either the live URL or a
/// failure reason. The worker treats every call as independent; one post's
/// failure never affects the others, and the worker itself never retries a
/// delivery.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(
        &self,
        post_id: Uuid,
        platform: &str,
        text: &str,
        media_urls: &[String],
    ) -> Result<PublishedPost, DeliveryError>;
}
