//! Job dispatcher.
//!
//! Single entry point for submission. Owns the bounded queue, the worker
//! pool, and the dispatch loop that routes queued jobs to idle workers.

use std::sync::Arc;

use metrics::counter;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use clipforge_media::MediaTool;
use clipforge_models::{JobId, JobStatus};
use clipforge_queue::{DispatchedJob, Job, JobQueue, JobReceiver, QueueError};
use clipforge_store::JobStore;

use crate::config::WorkerConfig;
use crate::error::{DispatchError, DispatchResult};
use crate::pool::{self, WorkerSender};

/// The dispatch subsystem: bounded queue, dispatch loop, worker pool.
///
/// Constructed once at startup with its collaborators injected; stopped
/// exactly once via [`Dispatcher::stop`], which consumes it.
pub struct Dispatcher {
    store: Arc<dyn JobStore>,
    queue: JobQueue,
    dispatch_shutdown: watch::Sender<bool>,
    worker_shutdown: watch::Sender<bool>,
    dispatch_handle: JoinHandle<()>,
    worker_handles: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Start the worker pool and dispatch loop.
    pub fn start(
        config: WorkerConfig,
        store: Arc<dyn JobStore>,
        media: Arc<dyn MediaTool>,
    ) -> Self {
        let workers = config.max_workers.max(1);
        let (queue, queue_rx) = JobQueue::new(config.queue_capacity, workers);
        let (ready_tx, ready_rx) = mpsc::unbounded_channel();
        let (dispatch_shutdown, dispatch_shutdown_rx) = watch::channel(false);
        let (worker_shutdown, _) = watch::channel(false);

        let mut worker_handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            worker_handles.push(tokio::spawn(pool::run_worker(
                worker_id,
                Arc::clone(&store),
                Arc::clone(&media),
                ready_tx.clone(),
                worker_shutdown.subscribe(),
            )));
        }
        drop(ready_tx);

        let dispatch_handle = tokio::spawn(dispatch_loop(queue_rx, ready_rx, dispatch_shutdown_rx));

        info!(
            workers,
            queue_capacity = config.queue_capacity,
            "Dispatcher started"
        );

        Self {
            store,
            queue,
            dispatch_shutdown,
            worker_shutdown,
            dispatch_handle,
            worker_handles,
        }
    }

    /// Submit a job for asynchronous execution.
    ///
    /// Creates the PENDING status record first, so a caller polling by
    /// the returned id always finds one. Enqueueing is non-blocking: a
    /// full queue records the job as QUEUE_FAILED and rejects it.
    pub async fn submit(&self, job: Job) -> DispatchResult<JobId> {
        let id = self.store.create(job.kind(), job.input_payload()).await?;
        counter!("dispatch_jobs_submitted_total").increment(1);
        debug!(job_id = %id, job_type = %job.kind(), "Job record created");

        let dispatched = DispatchedJob {
            id: id.clone(),
            job,
        };

        match self.queue.try_enqueue(dispatched) {
            Ok(()) => Ok(id),
            Err(err) => {
                counter!("dispatch_queue_rejections_total").increment(1);
                let message = format!("job rejected at submission: {}", err);
                warn!(job_id = %id, "{}", message);

                // The record is this job's only trace; it is never
                // retried or requeued.
                if let Err(update_err) = self
                    .store
                    .update(&id, JobStatus::QueueFailed, None, Some(message.clone()))
                    .await
                {
                    warn!(job_id = %id, "Failed to record queue rejection: {}", update_err);
                }

                match err {
                    QueueError::Full { .. } => Err(DispatchError::QueueFull {
                        job_id: id,
                        message,
                    }),
                    QueueError::Closed => Err(DispatchError::Stopped),
                }
            }
        }
    }

    /// Stop the subsystem, draining in-flight jobs.
    ///
    /// The dispatch loop is stopped first so no hand-off races a
    /// stopping worker, then every worker is signalled and joined. Jobs
    /// still waiting in the queue are not executed; their records stay
    /// PENDING.
    pub async fn stop(self) {
        info!("Stopping dispatcher");

        let _ = self.dispatch_shutdown.send(true);
        let _ = self.dispatch_handle.await;

        let _ = self.worker_shutdown.send(true);
        for handle in self.worker_handles {
            let _ = handle.await;
        }

        info!("Dispatcher stopped");
    }
}

/// Route queued jobs to ready workers until shutdown.
async fn dispatch_loop(
    mut queue_rx: JobReceiver,
    mut ready_rx: mpsc::UnboundedReceiver<WorkerSender>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        // Hold a ready worker before pulling a job, so a job is never
        // parked here with no worker to run it.
        let worker = tokio::select! {
            _ = shutdown_rx.changed() => break,
            maybe_worker = ready_rx.recv() => match maybe_worker {
                Some(worker) => worker,
                None => break,
            },
        };

        let envelope = tokio::select! {
            _ = shutdown_rx.changed() => break,
            maybe_job = queue_rx.recv() => match maybe_job {
                Some(envelope) => envelope,
                None => break,
            },
        };

        if worker.send(envelope).await.is_err() {
            // Workers only exit at shutdown; stop routing.
            warn!("Worker inbox closed during hand-off");
            break;
        }
    }

    debug!("Dispatch loop exited");
}
