//! Media tool seam.
//!
//! Worker and job logic depend on this interface rather than on the
//! external tool's CLI syntax, so tests can substitute a fake and the
//! tool itself can be swapped without touching the dispatch path.

use async_trait::async_trait;
use std::path::Path;

use crate::error::MediaResult;
use crate::probe::MediaProbe;
use crate::{captions, clip, probe};

/// Facade over the external command-line media tool.
///
/// All operations are blocking subprocess calls with no internal retry;
/// failure handling belongs to the caller.
#[async_trait]
pub trait MediaTool: Send + Sync {
    /// Probe the duration of a media file, in fractional seconds.
    async fn probe_duration(&self, path: &Path) -> MediaResult<f64>;

    /// Probe full container and stream metadata.
    async fn probe_metadata(&self, path: &Path) -> MediaResult<MediaProbe>;

    /// Extract a time-bounded sub-clip, overwriting `output`.
    async fn extract_clip(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        duration_secs: f64,
    ) -> MediaResult<()>;

    /// Burn a caption track into a video.
    async fn overlay_captions(
        &self,
        input: &Path,
        captions: &Path,
        output: &Path,
    ) -> MediaResult<()>;
}

/// The FFmpeg-backed implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ffmpeg;

impl Ffmpeg {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MediaTool for Ffmpeg {
    async fn probe_duration(&self, path: &Path) -> MediaResult<f64> {
        probe::probe_duration(path).await
    }

    async fn probe_metadata(&self, path: &Path) -> MediaResult<MediaProbe> {
        probe::probe_metadata(path).await
    }

    async fn extract_clip(
        &self,
        input: &Path,
        output: &Path,
        start_secs: f64,
        duration_secs: f64,
    ) -> MediaResult<()> {
        clip::extract_clip(input, output, start_secs, duration_secs).await
    }

    async fn overlay_captions(
        &self,
        input: &Path,
        captions: &Path,
        output: &Path,
    ) -> MediaResult<()> {
        captions::overlay_captions(input, captions, output).await
    }
}
