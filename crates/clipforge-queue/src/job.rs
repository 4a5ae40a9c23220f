//! Job types for dispatch.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;

use clipforge_models::{format_seconds, parse_timestamp, JobId, JobKind, TimestampError};

/// Job to extract a time-bounded sub-clip from a video.
///
/// Start and duration arrive as human-readable strings and are parsed at
/// construction, so a malformed value fails before anything is persisted
/// or enqueued.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractClipJob {
    /// Source video path
    pub input_path: PathBuf,
    /// Destination path for the extracted clip
    pub output_path: PathBuf,
    /// Start offset in fractional seconds
    pub start_secs: f64,
    /// Clip length in fractional seconds
    pub duration_secs: f64,
}

impl ExtractClipJob {
    /// Create a new extract job, parsing the start/duration strings.
    pub fn new(
        input_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        start: &str,
        duration: &str,
    ) -> Result<Self, TimestampError> {
        Ok(Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            start_secs: parse_timestamp(start)?,
            duration_secs: parse_timestamp(duration)?,
        })
    }

    /// Snapshot of the constructor inputs, durations rendered back to
    /// strings so the stored shape is independent of the in-memory one.
    pub fn input_payload(&self) -> Value {
        json!({
            "input_path": self.input_path,
            "output_path": self.output_path,
            "start": format_seconds(self.start_secs),
            "duration": format_seconds(self.duration_secs),
        })
    }
}

/// Job to probe full container and stream metadata for a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMetadataJob {
    /// Video path to probe
    pub input_path: PathBuf,
}

impl GetMetadataJob {
    /// Create a new metadata job.
    pub fn new(input_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
        }
    }

    /// Snapshot of the constructor inputs.
    pub fn input_payload(&self) -> Value {
        json!({ "input_path": self.input_path })
    }
}

/// Job to burn a caption track into a video.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayCaptionsJob {
    /// Source video path
    pub input_path: PathBuf,
    /// Caption track path (subtitle file)
    pub captions_path: PathBuf,
    /// Destination path for the composited video
    pub output_path: PathBuf,
}

impl OverlayCaptionsJob {
    /// Create a new caption overlay job.
    pub fn new(
        input_path: impl Into<PathBuf>,
        captions_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            input_path: input_path.into(),
            captions_path: captions_path.into(),
            output_path: output_path.into(),
        }
    }

    /// Snapshot of the constructor inputs.
    pub fn input_payload(&self) -> Value {
        json!({
            "input_path": self.input_path,
            "captions_path": self.captions_path,
            "output_path": self.output_path,
        })
    }
}

/// The closed set of dispatchable jobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Job {
    /// Extract a time-bounded sub-clip
    ExtractClip(ExtractClipJob),
    /// Probe container and stream metadata
    GetMetadata(GetMetadataJob),
    /// Burn a caption track into a video
    OverlayCaptions(OverlayCaptionsJob),
}

impl Job {
    /// Kind tag persisted as the record's `job_type`.
    pub fn kind(&self) -> JobKind {
        match self {
            Job::ExtractClip(_) => JobKind::ExtractClip,
            Job::GetMetadata(_) => JobKind::GetMetadata,
            Job::OverlayCaptions(_) => JobKind::OverlayCaptions,
        }
    }

    /// Serialized snapshot of the job's inputs.
    pub fn input_payload(&self) -> Value {
        match self {
            Job::ExtractClip(j) => j.input_payload(),
            Job::GetMetadata(j) => j.input_payload(),
            Job::OverlayCaptions(j) => j.input_payload(),
        }
    }
}

/// A job paired with its store-assigned id.
///
/// Owned by the dispatcher and then exactly one worker for the job's
/// lifetime; durability lives in the status record, not here.
#[derive(Debug, Clone)]
pub struct DispatchedJob {
    /// Id of the status record created at submission
    pub id: JobId,
    /// The job itself
    pub job: Job,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_clip_parses_durations_at_construction() {
        let job = ExtractClipJob::new("in.mp4", "out.mp4", "00:00:10", "00:00:15").unwrap();
        assert_eq!(job.start_secs, 10.0);
        assert_eq!(job.duration_secs, 15.0);
    }

    #[test]
    fn extract_clip_rejects_malformed_duration() {
        let err = ExtractClipJob::new("in.mp4", "out.mp4", "00:00:10", "fifteen").unwrap_err();
        assert!(matches!(err, TimestampError::InvalidValue { .. }));
    }

    #[test]
    fn extract_clip_payload_renders_durations_as_strings() {
        let job = ExtractClipJob::new("in.mp4", "out.mp4", "90", "15").unwrap();
        let payload = job.input_payload();
        assert_eq!(payload["start"], "00:01:30");
        assert_eq!(payload["duration"], "00:00:15");
        assert_eq!(payload["input_path"], "in.mp4");
    }

    #[test]
    fn job_kind_matches_variant() {
        let job = Job::GetMetadata(GetMetadataJob::new("in.mp4"));
        assert_eq!(job.kind(), JobKind::GetMetadata);
        assert_eq!(job.input_payload()["input_path"], "in.mp4");
    }

    #[test]
    fn job_serde_roundtrip() {
        let job = Job::OverlayCaptions(OverlayCaptionsJob::new(
            "in.mp4",
            "captions.srt",
            "out.mp4",
        ));

        let json = serde_json::to_string(&job).expect("serialize Job");
        let decoded: Job = serde_json::from_str(&json).expect("deserialize Job");

        match decoded {
            Job::OverlayCaptions(j) => {
                assert_eq!(j.input_path, PathBuf::from("in.mp4"));
                assert_eq!(j.captions_path, PathBuf::from("captions.srt"));
                assert_eq!(j.output_path, PathBuf::from("out.mp4"));
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }
}
