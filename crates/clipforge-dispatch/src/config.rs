//! Dispatcher configuration.

/// Dispatcher configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Number of workers in the pool
    pub max_workers: usize,
    /// Queue capacity beyond the jobs workers hold
    pub queue_capacity: usize,
    /// Work directory for intermediate files
    pub work_dir: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_workers: 4,
            queue_capacity: 16,
            work_dir: "/tmp/clipforge".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_workers: std::env::var("DISPATCH_MAX_WORKERS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4),
            queue_capacity: std::env::var("DISPATCH_QUEUE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            work_dir: std::env::var("DISPATCH_WORK_DIR")
                .unwrap_or_else(|_| "/tmp/clipforge".to_string()),
        }
    }
}
