//! Recurring pipeline runs on a cron schedule.

use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::job::CronJob;

/// Builds and starts a scheduler that runs `job` on `schedule`.
///
/// The returned [`JobScheduler`] must be kept alive for as long as runs
/// should happen; dropping it stops them.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the schedule does not parse or the
/// scheduler cannot be started.
pub(crate) async fn build_scheduler(
    job: Arc<CronJob>,
    schedule: &str,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;
    let id = scheduler.add(pipeline_job(job, schedule)?).await?;
    scheduler.start().await?;

    tracing::info!(job_id = %id, schedule, "scheduler started");
    Ok(scheduler)
}

/// A cron job that runs the pipeline once per tick.
///
/// A failed run is logged and the next tick proceeds. A tick that fires while
/// the previous run is still going is skipped.
pub(crate) fn pipeline_job(job: Arc<CronJob>, schedule: &str) -> Result<Job, JobSchedulerError> {
    let running = Arc::new(Mutex::new(()));

    Job::new_async(schedule, move |_uuid, _lock| {
        let job = Arc::clone(&job);
        let running = Arc::clone(&running);

        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                tracing::warn!("scheduler: previous run still in progress; skipping tick");
                return;
            };

            tracing::info!("scheduler: starting pipeline run");
            match job.run().await {
                Ok(report) => tracing::info!(
                    headlines = report.headlines,
                    categorised = report.categorised,
                    failed_pairs = report.failed_pairs.len(),
                    "scheduler: pipeline run complete"
                ),
                Err(e) => tracing::error!(error = ?e, "scheduler: pipeline run failed"),
            }
        })
    })
}
