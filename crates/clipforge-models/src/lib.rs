//! Shared data models for the clipforge job dispatcher.
//!
//! This crate provides Serde-serializable types for:
//! - Job identity and kind tags
//! - Job status records and their lifecycle transitions
//! - Timestamp parsing for clip boundaries

pub mod job;
pub mod record;
pub mod timestamp;

// Re-export common types
pub use job::{JobId, JobKind};
pub use record::{JobRecord, JobStatus};
pub use timestamp::{format_seconds, parse_timestamp, TimestampError};
