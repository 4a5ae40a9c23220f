//! Dispatch error types.

use thiserror::Error;

use clipforge_models::JobId;
use clipforge_store::StoreError;

pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors surfaced to submitters.
///
/// Execution-time failures never appear here; once a job is enqueued its
/// outcome is only observable through the status record.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Status record creation failed; the job was not enqueued and no
    /// record exists.
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// The queue had no capacity. The job was recorded as QUEUE_FAILED
    /// and dropped; the id is kept so callers can still poll the record.
    #[error("Job {job_id} rejected: {message}")]
    QueueFull { job_id: JobId, message: String },

    /// The dispatcher is no longer accepting work.
    #[error("Dispatcher is stopped")]
    Stopped,
}
