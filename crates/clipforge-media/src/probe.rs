//! FFprobe metadata probing.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use crate::error::{MediaError, MediaResult};

/// Parsed FFprobe output: container format plus per-stream metadata.
///
/// Serializes back to JSON unchanged, so it can be stored as a job's
/// output payload without a separate wire shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MediaProbe {
    pub format: ProbeFormat,
    #[serde(default)]
    pub streams: Vec<ProbeStream>,
}

/// Container-level metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeFormat {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bit_rate: Option<String>,
}

/// Per-stream metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeStream {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codec_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r_frame_rate: Option<String>,
}

impl MediaProbe {
    /// Duration in fractional seconds, when the container reports one.
    pub fn duration_secs(&self) -> Option<f64> {
        self.format.duration.as_ref().and_then(|d| d.parse().ok())
    }
}

/// Probe full container and stream metadata for a media file.
pub async fn probe_metadata(path: impl AsRef<Path>) -> MediaResult<MediaProbe> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(MediaError::FileNotFound(path.to_path_buf()));
    }

    which::which("ffprobe").map_err(|_| MediaError::FfprobeNotFound)?;

    let output = Command::new("ffprobe")
        .args([
            "-v",
            "quiet",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
        ])
        .arg(path)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::ffprobe_failed(
            "FFprobe exited with non-zero status",
            Some(String::from_utf8_lossy(&output.stderr).to_string()),
        ));
    }

    parse_probe_output(&output.stdout)
}

/// Probe just the duration of a media file, in fractional seconds.
pub async fn probe_duration(path: impl AsRef<Path>) -> MediaResult<f64> {
    let probe = probe_metadata(path).await?;
    probe
        .duration_secs()
        .ok_or_else(|| MediaError::InvalidVideo("no duration reported by container".to_string()))
}

fn parse_probe_output(bytes: &[u8]) -> MediaResult<MediaProbe> {
    let probe: MediaProbe = serde_json::from_slice(bytes)?;
    Ok(probe)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "streams": [
            {"codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080, "r_frame_rate": "30/1"},
            {"codec_type": "audio", "codec_name": "aac"}
        ],
        "format": {"format_name": "mov,mp4,m4a", "duration": "60.041000", "size": "10485760", "bit_rate": "1396963"}
    }"#;

    #[test]
    fn parses_ffprobe_json() {
        let probe = parse_probe_output(SAMPLE.as_bytes()).unwrap();
        assert_eq!(probe.streams.len(), 2);
        assert_eq!(probe.streams[0].codec_name.as_deref(), Some("h264"));
        assert_eq!(probe.streams[0].width, Some(1920));
        assert_eq!(probe.format.format_name.as_deref(), Some("mov,mp4,m4a"));
    }

    #[test]
    fn reads_duration_from_format() {
        let probe = parse_probe_output(SAMPLE.as_bytes()).unwrap();
        let duration = probe.duration_secs().unwrap();
        assert!((duration - 60.041).abs() < 0.001);
    }

    #[test]
    fn missing_duration_is_none() {
        let probe = parse_probe_output(br#"{"format": {}, "streams": []}"#).unwrap();
        assert!(probe.duration_secs().is_none());
    }

    #[test]
    fn garbage_output_is_an_error() {
        assert!(matches!(
            parse_probe_output(b"not json"),
            Err(MediaError::JsonParse(_))
        ));
    }

    #[test]
    fn probe_serializes_back_to_json() {
        let probe = parse_probe_output(SAMPLE.as_bytes()).unwrap();
        let value = serde_json::to_value(&probe).unwrap();
        assert_eq!(value["format"]["duration"], "60.041000");
        assert_eq!(value["streams"][0]["codec_type"], "video");
    }
}
