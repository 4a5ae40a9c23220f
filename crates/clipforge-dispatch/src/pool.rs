//! Worker pool.
//!
//! Each worker owns a private inbox channel and advertises availability
//! by sending the inbox handle into the shared ready channel. The
//! dispatch loop forwards one job per registration, so a worker is never
//! handed a second job while one is in flight.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

use clipforge_media::MediaTool;
use clipforge_models::JobStatus;
use clipforge_queue::QueuedJob;
use clipforge_store::JobStore;

use crate::logging::JobLogger;
use crate::processor;

/// Sender half of a worker's private inbox.
pub(crate) type WorkerSender = mpsc::Sender<QueuedJob>;

/// Run a single worker until shutdown.
///
/// Jobs run strictly sequentially within one worker. The shutdown signal
/// is only observed between jobs, so an in-flight job always finishes
/// and reaches a terminal status before the worker exits.
pub(crate) async fn run_worker(
    worker_id: usize,
    store: Arc<dyn JobStore>,
    media: Arc<dyn MediaTool>,
    ready_tx: mpsc::UnboundedSender<WorkerSender>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let (inbox_tx, mut inbox_rx) = mpsc::channel::<QueuedJob>(1);

    loop {
        if ready_tx.send(inbox_tx.clone()).is_err() {
            // Dispatch loop is gone; no further work can arrive.
            break;
        }

        tokio::select! {
            _ = shutdown_rx.changed() => {
                // A job may already have been handed off concurrently
                // with the signal; finish it before stopping.
                if let Ok(envelope) = inbox_rx.try_recv() {
                    handle_job(worker_id, store.as_ref(), media.as_ref(), envelope).await;
                }
                break;
            }
            maybe_job = inbox_rx.recv() => {
                match maybe_job {
                    Some(envelope) => {
                        handle_job(worker_id, store.as_ref(), media.as_ref(), envelope).await;
                    }
                    None => break,
                }
            }
        }
    }

    debug!(worker_id, "Worker stopped");
}

/// Run one job to its terminal status.
async fn handle_job(
    worker_id: usize,
    store: &dyn JobStore,
    media: &dyn MediaTool,
    envelope: QueuedJob,
) {
    let dispatched = &envelope.job;
    let logger = JobLogger::new(&dispatched.id, dispatched.job.kind().as_str());
    logger.claimed(worker_id);

    // The job executes even if this update fails; the record lags
    // behind until the terminal write.
    if let Err(e) = store
        .update(&dispatched.id, JobStatus::Processing, None, None)
        .await
    {
        warn!(job_id = %dispatched.id, "Failed to mark job processing: {}", e);
    }

    match processor::execute(&dispatched.job, media).await {
        Ok(output) => {
            counter!("dispatch_jobs_completed_total").increment(1);
            logger.completed();
            if let Err(e) = store
                .update(&dispatched.id, JobStatus::Completed, Some(output), None)
                .await
            {
                warn!(job_id = %dispatched.id, "Failed to record completion: {}", e);
            }
        }
        Err(e) => {
            counter!("dispatch_jobs_failed_total").increment(1);
            logger.failed(&e);
            if let Err(update_err) = store
                .update(&dispatched.id, JobStatus::Failed, None, Some(e.to_string()))
                .await
            {
                warn!(job_id = %dispatched.id, "Failed to record failure: {}", update_err);
            }
        }
    }
    // Dropping the envelope releases the job's queue slot.
}
