//! Bounded in-process job queue.
//!
//! Submission never blocks: a job is accepted only while a capacity slot
//! is free, and slots cover both the waiting room and the jobs workers
//! currently hold. A worker releases its job's slot by dropping the
//! envelope once the terminal status is recorded, so acceptance tracks
//! `waiting_capacity + busy_workers` exactly.

use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, OwnedSemaphorePermit, Semaphore, TryAcquireError};
use tracing::debug;

use crate::error::{QueueError, QueueResult};
use crate::job::DispatchedJob;

/// A queued job plus the capacity slot it occupies.
///
/// The slot is released when the envelope is dropped, after the owning
/// worker has finished with the job.
#[derive(Debug)]
pub struct QueuedJob {
    /// The dispatched job
    pub job: DispatchedJob,
    _slot: OwnedSemaphorePermit,
}

/// Receiving half of the queue, owned by the dispatch loop.
pub type JobReceiver = mpsc::Receiver<QueuedJob>;

/// Submission handle for the bounded job queue.
#[derive(Debug, Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<QueuedJob>,
    slots: Arc<Semaphore>,
    waiting_capacity: usize,
}

impl JobQueue {
    /// Create a queue with the given waiting capacity for a pool of
    /// `workers`, returning the submission handle and the receiving half.
    pub fn new(waiting_capacity: usize, workers: usize) -> (Self, JobReceiver) {
        let workers = workers.max(1);
        let slots = waiting_capacity + workers;
        // The channel buffer matches the slot count, so a job holding a
        // slot always fits in the channel.
        let (tx, rx) = mpsc::channel(slots);

        (
            Self {
                tx,
                slots: Arc::new(Semaphore::new(slots)),
                waiting_capacity,
            },
            rx,
        )
    }

    /// Enqueue a job without blocking.
    ///
    /// Fails with [`QueueError::Full`] when every slot is taken by a
    /// queued or in-flight job.
    pub fn try_enqueue(&self, job: DispatchedJob) -> QueueResult<()> {
        let slot = match Arc::clone(&self.slots).try_acquire_owned() {
            Ok(slot) => slot,
            Err(TryAcquireError::NoPermits) => {
                return Err(QueueError::Full {
                    capacity: self.waiting_capacity,
                })
            }
            Err(TryAcquireError::Closed) => return Err(QueueError::Closed),
        };

        let id = job.id.clone();
        self.tx
            .try_send(QueuedJob { job, _slot: slot })
            .map_err(|e| match e {
                TrySendError::Full(_) => QueueError::Full {
                    capacity: self.waiting_capacity,
                },
                TrySendError::Closed(_) => QueueError::Closed,
            })?;

        debug!(job_id = %id, "Job enqueued");
        Ok(())
    }

    /// Waiting capacity beyond the jobs workers hold.
    pub fn waiting_capacity(&self) -> usize {
        self.waiting_capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{GetMetadataJob, Job};
    use clipforge_models::JobId;

    fn probe_job() -> DispatchedJob {
        DispatchedJob {
            id: JobId::new(),
            job: Job::GetMetadata(GetMetadataJob::new("in.mp4")),
        }
    }

    #[tokio::test]
    async fn accepts_up_to_slot_count_then_rejects() {
        let (queue, _rx) = JobQueue::new(2, 1);

        queue.try_enqueue(probe_job()).unwrap();
        queue.try_enqueue(probe_job()).unwrap();
        queue.try_enqueue(probe_job()).unwrap();

        let err = queue.try_enqueue(probe_job()).unwrap_err();
        assert!(matches!(err, QueueError::Full { capacity: 2 }));
    }

    #[tokio::test]
    async fn zero_waiting_capacity_admits_one_job_per_worker() {
        let (queue, _rx) = JobQueue::new(0, 1);

        queue.try_enqueue(probe_job()).unwrap();
        let err = queue.try_enqueue(probe_job()).unwrap_err();
        assert!(matches!(err, QueueError::Full { capacity: 0 }));
    }

    #[tokio::test]
    async fn dropping_an_envelope_frees_its_slot() {
        let (queue, mut rx) = JobQueue::new(0, 1);

        queue.try_enqueue(probe_job()).unwrap();
        assert!(queue.try_enqueue(probe_job()).is_err());

        let envelope = rx.recv().await.unwrap();
        drop(envelope);

        queue.try_enqueue(probe_job()).unwrap();
    }

    #[tokio::test]
    async fn closed_receiver_rejects_submissions() {
        let (queue, rx) = JobQueue::new(1, 1);
        drop(rx);

        let err = queue.try_enqueue(probe_job()).unwrap_err();
        assert!(matches!(err, QueueError::Closed));
    }
}
