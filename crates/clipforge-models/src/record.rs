//! Job status records.
//!
//! One record is persisted per submitted job. Callers poll the record by
//! id instead of blocking on execution, so the record carries everything
//! needed to observe the outcome: inputs, status, output, and error.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::job::{JobId, JobKind};

/// Lifecycle status of a job record.
///
/// Statuses move forward only: PENDING -> PROCESSING -> COMPLETED/FAILED,
/// or PENDING -> QUEUE_FAILED when the queue has no capacity at submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Job is waiting in the queue
    #[default]
    Pending,
    /// A worker is executing the job
    Processing,
    /// Job finished successfully
    Completed,
    /// Job execution failed
    Failed,
    /// Job was rejected at submission because the queue was full
    QueueFailed,
}

impl JobStatus {
    /// String tag as persisted in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::QueueFailed => "QUEUE_FAILED",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::QueueFailed
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The durable row tracking a job's identity, inputs, and outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Unique job identifier, immutable once created
    pub job_id: JobId,
    /// Which job variant this record tracks
    pub job_type: JobKind,
    /// Current lifecycle status
    pub status: JobStatus,
    /// Snapshot of the job's constructor inputs, written once at creation
    pub input_payload: Value,
    /// Result payload, written only on COMPLETED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_details: Option<Value>,
    /// Failure reason, written only on FAILED or QUEUE_FAILED
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// When the record was created
    pub created_at: DateTime<Utc>,
    /// Refreshed on every status transition
    pub updated_at: DateTime<Utc>,
}

impl JobRecord {
    /// Create a new PENDING record.
    pub fn new(job_id: JobId, job_type: JobKind, input_payload: Value) -> Self {
        let now = Utc::now();
        Self {
            job_id,
            job_type,
            status: JobStatus::Pending,
            input_payload,
            output_details: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Check if the record is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Mark the record as claimed by a worker.
    pub fn mark_processing(&mut self) {
        self.status = JobStatus::Processing;
        self.updated_at = Utc::now();
    }

    /// Mark the record completed with the execution output.
    pub fn complete(&mut self, output: Value) {
        self.status = JobStatus::Completed;
        self.output_details = Some(output);
        self.updated_at = Utc::now();
    }

    /// Mark the record failed with an error message.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.error_message = Some(error.into());
        self.updated_at = Utc::now();
    }

    /// Mark the record rejected because the queue had no capacity.
    pub fn queue_fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::QueueFailed;
        self.error_message = Some(error.into());
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn record_starts_pending() {
        let record = JobRecord::new(
            JobId::new(),
            JobKind::ExtractClip,
            json!({"input_path": "in.mp4"}),
        );
        assert_eq!(record.status, JobStatus::Pending);
        assert!(record.output_details.is_none());
        assert!(record.error_message.is_none());
        assert!(!record.is_terminal());
    }

    #[test]
    fn record_lifecycle_transitions() {
        let mut record = JobRecord::new(JobId::new(), JobKind::GetMetadata, json!({}));

        record.mark_processing();
        assert_eq!(record.status, JobStatus::Processing);
        assert!(!record.is_terminal());

        record.complete(json!({"duration": "60.0"}));
        assert_eq!(record.status, JobStatus::Completed);
        assert!(record.is_terminal());
        assert!(record.output_details.is_some());
    }

    #[test]
    fn record_failure_carries_message() {
        let mut record = JobRecord::new(JobId::new(), JobKind::OverlayCaptions, json!({}));
        record.mark_processing();
        record.fail("tool exited with status 1");
        assert_eq!(record.status, JobStatus::Failed);
        assert_eq!(
            record.error_message.as_deref(),
            Some("tool exited with status 1")
        );
    }

    #[test]
    fn queue_failed_is_terminal() {
        let mut record = JobRecord::new(JobId::new(), JobKind::ExtractClip, json!({}));
        record.queue_fail("queue full");
        assert_eq!(record.status, JobStatus::QueueFailed);
        assert!(record.is_terminal());
    }

    #[test]
    fn status_wire_tags() {
        assert_eq!(
            serde_json::to_string(&JobStatus::QueueFailed).unwrap(),
            "\"QUEUE_FAILED\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Pending).unwrap(),
            "\"PENDING\""
        );
    }
}
