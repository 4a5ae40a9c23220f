//! Job execution.
//!
//! Exhaustive dispatch over the closed job set. Each arm calls the media
//! tool and shapes the output payload written to the status record on
//! completion.

use serde_json::{json, Value};

use clipforge_media::{MediaResult, MediaTool};
use clipforge_queue::Job;

/// Execute a job against the media tool, returning its output payload.
pub async fn execute(job: &Job, media: &dyn MediaTool) -> MediaResult<Value> {
    match job {
        Job::ExtractClip(j) => {
            media
                .extract_clip(
                    &j.input_path,
                    &j.output_path,
                    j.start_secs,
                    j.duration_secs,
                )
                .await?;
            Ok(json!({ "output_file": j.output_path }))
        }
        Job::GetMetadata(j) => {
            let probe = media.probe_metadata(&j.input_path).await?;
            Ok(serde_json::to_value(probe)?)
        }
        Job::OverlayCaptions(j) => {
            media
                .overlay_captions(&j.input_path, &j.captions_path, &j.output_path)
                .await?;
            Ok(json!({ "output_file": j.output_path }))
        }
    }
}
