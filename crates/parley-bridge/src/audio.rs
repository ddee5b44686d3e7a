use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;

use tempfile::TempPath;
use tokio::process::Command;

use crate::error::{BridgeError, Result};

const BITRATE: &str = "32k";
const SAMPLE_RATE: &str = "24000";

/// Voice notes must be Opus in an Ogg container.
pub fn needs_conversion(path: &Path) -> bool {
    !path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ogg"))
}

fn ffmpeg_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["-i".into(), input.into()];
    args.extend(
        [
            "-c:a",
            "libopus",
            "-b:a",
            BITRATE,
            "-ar",
            SAMPLE_RATE,
            "-application",
            "voip",
            "-vbr",
            "on",
            "-compression_level",
            "10",
            "-frame_duration",
            "60",
            "-y",
        ]
        .map(OsString::from),
    );
    args.push(output.into());
    args
}

/// Transcode `input` to Opus at `output` with ffmpeg.
pub async fn convert_to_opus(input: &Path, output: &Path) -> Result<()> {
    if !input.is_file() {
        return Err(BridgeError::MissingFile(input.to_path_buf()));
    }

    tracing::debug!(input = %input.display(), output = %output.display(), "Converting audio");

    let result = Command::new("ffmpeg")
        .args(ffmpeg_args(input, output))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| BridgeError::Conversion(format!("failed to run ffmpeg: {e}")))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(BridgeError::Conversion(format!(
            "ffmpeg exited with {}: {}",
            result.status,
            stderr.trim()
        )));
    }

    Ok(())
}

/// Convert into a fresh `audio_*.ogg` temp file, removed when the returned
/// path is dropped.
pub async fn convert_to_opus_temp(input: &Path) -> Result<TempPath> {
    let output = tempfile::Builder::new()
        .prefix("audio_")
        .suffix(".ogg")
        .tempfile()?
        .into_temp_path();
    convert_to_opus(input, &output).await?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_conversion() {
        assert!(needs_conversion(Path::new("note.mp3")));
        assert!(needs_conversion(Path::new("note")));
        assert!(!needs_conversion(Path::new("note.ogg")));
        assert!(!needs_conversion(Path::new("/tmp/NOTE.OGG")));
    }

    #[test]
    fn test_ffmpeg_args() {
        let args = ffmpeg_args(Path::new("in.wav"), Path::new("out.ogg"));
        let args: Vec<_> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        assert_eq!(
            args,
            [
                "-i",
                "in.wav",
                "-c:a",
                "libopus",
                "-b:a",
                "32k",
                "-ar",
                "24000",
                "-application",
                "voip",
                "-vbr",
                "on",
                "-compression_level",
                "10",
                "-frame_duration",
                "60",
                "-y",
                "out.ogg",
            ]
        );
    }

    #[tokio::test]
    async fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let err = convert_to_opus_temp(&dir.path().join("gone.mp3")).await.unwrap_err();
        assert!(matches!(err, BridgeError::MissingFile(_)));
    }
}
