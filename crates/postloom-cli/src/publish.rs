//! `publish` command: drive one publish batch from the terminal.

use std::time::Duration;

use postloom_core::AppConfig;
use postloom_publisher::{run_publish_batch, SimulatedPublisher};
use sqlx::PgPool;

/// Claims one batch of ready posts, delivers them through the simulator, and
/// prints each outcome.
///
/// # Errors
///
/// Returns an error when the claim query fails. Per-post delivery failures
/// are printed, not propagated.
pub(crate) async fn run_publish(
    pool: &PgPool,
    config: &AppConfig,
    batch_size: Option<i64>,
    no_delay: bool,
) -> anyhow::Result<()> {
    let publisher = if no_delay {
        SimulatedPublisher::with_delay(Duration::ZERO)
    } else {
        SimulatedPublisher::new()
    };
    let batch_size = batch_size.unwrap_or(config.publish_batch_size);

    let results = run_publish_batch(pool, &publisher, batch_size).await?;
    if results.is_empty() {
        println!("no posts ready to publish");
        return Ok(());
    }

    for result in &results {
        if result.success {
            println!(
                "posted  {}  {}  {}",
                result.post_id,
                result.platform,
                result.post_url.as_deref().unwrap_or("-")
            );
        } else {
            println!(
                "failed  {}  {}  {}",
                result.post_id,
                result.platform,
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    let succeeded = results.iter().filter(|r| r.success).count();
    println!(
        "{} processed, {} succeeded, {} failed",
        results.len(),
        succeeded,
        results.len() - succeeded
    );

    Ok(())
}
