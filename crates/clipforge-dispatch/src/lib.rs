//! Job dispatcher and worker pool.
//!
//! This crate owns the lifecycle of submitted media-processing jobs:
//! - [`Dispatcher::submit`] creates the durable status record and places
//!   the job on a bounded queue without blocking
//! - A dispatch loop routes queued jobs to idle workers
//! - Each worker runs its job to completion and writes the terminal
//!   status, never crashing the pool on a job failure
//! - [`Dispatcher::stop`] drains in-flight work before reporting stopped

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod logging;
pub mod processor;

mod pool;

pub use config::WorkerConfig;
pub use dispatcher::Dispatcher;
pub use error::{DispatchError, DispatchResult};
pub use logging::JobLogger;
