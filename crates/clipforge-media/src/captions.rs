//! Caption burn-in.

use std::path::Path;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::MediaResult;

/// Burn a caption track into a video, writing the composite to `output`.
///
/// The video stream is re-encoded (the subtitle filter rasterizes text
/// onto frames); audio is copied through untouched.
pub async fn overlay_captions(
    input: impl AsRef<Path>,
    captions: impl AsRef<Path>,
    output: impl AsRef<Path>,
) -> MediaResult<()> {
    let input = input.as_ref();
    let captions = captions.as_ref();
    let output = output.as_ref();

    info!(
        "Overlaying captions: {} + {} -> {}",
        input.display(),
        captions.display(),
        output.display()
    );

    let cmd = FfmpegCommand::new(input, output)
        .video_filter(subtitles_filter(captions))
        .video_codec("libx264")
        .audio_codec("copy");

    FfmpegRunner::new().run(&cmd).await?;

    info!("Captions overlaid: {}", output.display());
    Ok(())
}

/// Build the `subtitles=` filter expression for a captions path.
///
/// Filter arguments have their own quoting layer; special characters in
/// the path must be escaped or FFmpeg splits the filter at them.
fn subtitles_filter(path: &Path) -> String {
    format!("subtitles='{}'", escape_filter_path(&path.to_string_lossy()))
}

fn escape_filter_path(path: &str) -> String {
    let mut escaped = String::with_capacity(path.len());
    for c in path.chars() {
        if matches!(c, '\\' | '\'' | ':' | '[' | ']' | ',' | ';') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
