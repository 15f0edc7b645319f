//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring publish and stale-brief jobs.

use std::sync::Arc;

use postloom_core::AppConfig;
use postloom_publisher::{run_publish_batch, Publisher};
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Publish runs every five minutes; the stale-brief sweep runs hourly at
/// minute ten.
const PUBLISH_SCHEDULE: &str = "0 */5 * * * *";
const RECONCILE_SCHEDULE: &str = "0 10 * * * *";

/// Builds and starts the background job scheduler.
///
/// Registers the recurring jobs and starts the scheduler. Returns the
/// running [`JobScheduler`] handle, which must be kept alive for the
/// lifetime of the process; dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: &AppConfig,
    publisher: Arc<dyn Publisher>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_publish_job(&scheduler, pool.clone(), publisher, config.publish_batch_size).await?;
    register_reconcile_job(&scheduler, pool, config.brief_stale_after_secs).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the five-minute publish job: claim one batch of ready posts and
/// deliver them.
async fn register_publish_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    publisher: Arc<dyn Publisher>,
    batch_size: i64,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async(PUBLISH_SCHEDULE, move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let publisher = Arc::clone(&publisher);

        Box::pin(async move {
            tracing::info!("scheduler: starting publish run");
            match run_publish_batch(&pool, publisher.as_ref(), batch_size).await {
                Ok(results) => {
                    let succeeded = results.iter().filter(|r| r.success).count();
                    tracing::info!(
                        processed = results.len(),
                        succeeded,
                        failed = results.len() - succeeded,
                        "scheduler: publish run complete"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: publish run failed");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Register the hourly stale-brief sweep: briefs stuck in `processing`
/// longer than the threshold are finalized from whatever they produced.
async fn register_reconcile_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    stale_after_secs: u64,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async(RECONCILE_SCHEDULE, move |_uuid, _lock| {
        let pool = Arc::clone(&pool);

        Box::pin(async move {
            tracing::info!("scheduler: starting stale-brief sweep");
            match postloom_db::reconcile_stale_briefs(&pool, stale_after_secs).await {
                Ok((completed, errored)) => {
                    tracing::info!(
                        completed,
                        errored,
                        "scheduler: stale-brief sweep complete"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "scheduler: stale-brief sweep failed");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
