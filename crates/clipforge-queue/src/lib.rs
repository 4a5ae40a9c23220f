//! Job variants and the bounded in-process dispatch queue.
//!
//! This crate provides:
//! - The closed set of dispatchable job types and their payload snapshots
//! - A bounded queue handle with non-blocking submission
//! - Queue capacity accounting shared with the worker pool

pub mod error;
pub mod job;
pub mod queue;

pub use error::{QueueError, QueueResult};
pub use job::{DispatchedJob, ExtractClipJob, GetMetadataJob, Job, OverlayCaptionsJob};
pub use queue::{JobQueue, JobReceiver, QueuedJob};
