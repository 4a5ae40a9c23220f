//! Structured job logging.
//!
//! Lifecycle events carry the job id and kind tag as fields so log
//! lines for one job can be correlated across workers.

use tracing::{error, info};

use clipforge_models::JobId;

/// Per-job logger.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    job_type: &'static str,
}

impl JobLogger {
    /// Create a logger for a specific job.
    pub fn new(job_id: &JobId, job_type: &'static str) -> Self {
        Self {
            job_id: job_id.to_string(),
            job_type,
        }
    }

    /// Log that a worker claimed the job.
    pub fn claimed(&self, worker_id: usize) {
        info!(
            job_id = %self.job_id,
            job_type = %self.job_type,
            worker_id,
            "Job claimed"
        );
    }

    /// Log successful completion.
    pub fn completed(&self) {
        info!(
            job_id = %self.job_id,
            job_type = %self.job_type,
            "Job completed"
        );
    }

    /// Log a terminal failure.
    pub fn failed(&self, err: &dyn std::fmt::Display) {
        error!(
            job_id = %self.job_id,
            job_type = %self.job_type,
            "Job failed: {}", err
        );
    }
}
