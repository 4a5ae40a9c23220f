//! Queue error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    /// No waiting room left beyond the jobs workers already hold.
    #[error("job queue is full (waiting capacity {capacity})")]
    Full { capacity: usize },

    /// The receiving side has shut down.
    #[error("job queue is closed")]
    Closed,
}
