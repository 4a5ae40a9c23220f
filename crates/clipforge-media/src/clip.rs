//! Clip extraction.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Extract a time-bounded sub-clip into a new file.
///
/// Streams are copied without re-encoding, and any existing file at
/// `output` is overwritten.
pub async fn extract_clip(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    start_secs: f64,
    duration_secs: f64,
) -> MediaResult<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    info!(
        "Extracting clip: {} -> {} (start: {:.2}s, duration: {:.2}s)",
        input.display(),
        output.display(),
        start_secs,
        duration_secs
    );

    let cmd = FfmpegCommand::new(input, output)
        .seek(start_secs)
        .duration(duration_secs)
        .codec_copy();

    FfmpegRunner::new().run(&cmd).await?;

    info!("Clip extracted: {}", output.display());
    Ok(())
}
