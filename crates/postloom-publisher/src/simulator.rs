//! Randomized delivery simulator.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use uuid::Uuid;

use crate::publisher::{DeliveryError, PublishedPost, Publisher};

/// Fraction of deliveries that fail.
const FAILURE_RATE: f64 = 0.1;

/// Simulated delivery backend: ~90% success with platform-shaped mock URLs.
///
/// Stands in for real social-platform integrations during development. Any
/// real backend must keep the same [`Publisher`] contract.
#[derive(Debug, Clone)]
pub struct SimulatedPublisher {
    delay: Duration,
}

impl SimulatedPublisher {
    /// Simulator with the production delay of one second per delivery.
    #[must_use]
    pub fn new() -> Self {
        Self {
            delay: Duration::from_secs(1),
        }
    }

    /// Simulator with a custom delivery delay (zero in tests).
    #[must_use]
    pub fn with_delay(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Publisher for SimulatedPublisher {
    async fn publish(
        &self,
        post_id: Uuid,
        platform: &str,
        _text: &str,
        _media_urls: &[String],
    ) -> Result<PublishedPost, DeliveryError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if rand::random::<f64>() < FAILURE_RATE {
            return Err(DeliveryError {
                reason: format!("Failed to post to {platform}: Platform API error (simulated)"),
            });
        }

        Ok(PublishedPost {
            post_url: mock_post_url(post_id, platform),
        })
    }
}

/// Builds the platform-shaped mock URL for a delivered post: a per-platform
/// base, the first eight hex characters of the post id, and a millisecond
/// timestamp.
fn mock_post_url(post_id: Uuid, platform: &str) -> String {
    let base = match platform.to_lowercase().as_str() {
        "linkedin" => "https://linkedin.com/posts/",
        "twitter" => "https://twitter.com/user/status/",
        "instagram" => "https://instagram.com/p/",
        "facebook" => "https://facebook.com/posts/",
        _ => "https://example.com/posts/",
    };
    let id = post_id.simple().to_string();
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis());
    format!("{base}{}{millis}", &id[..8])
}
