//! Video download using yt-dlp.
//!
//! Short-form sources only (reels, Shorts), so downloads are capped at 720p
//! mp4. Metadata quality varies by source; duration is best-effort and the
//! caller is expected to fall back to probing the downloaded file.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{info, warn};

use crate::error::{MediaError, MediaResult};
use reelsight_models::{normalize_youtube_url, VideoMetadata};

/// yt-dlp format selector for short-form content.
const FORMAT_SELECTOR: &str = "best[ext=mp4][height<=720]/best[ext=mp4]/best";

/// A downloaded source video on local disk.
#[derive(Debug, Clone)]
pub struct DownloadedVideo {
    /// Local file path of the downloaded video.
    pub path: PathBuf,
    /// Source-reported metadata (approximate).
    pub metadata: VideoMetadata,
}

/// Download a YouTube video or Short into `dest_dir`.
pub async fn download_youtube(url: &str, dest_dir: impl AsRef<Path>) -> MediaResult<DownloadedVideo> {
    let dest_dir = dest_dir.as_ref();

    which::which("yt-dlp").map_err(|_| MediaError::YtDlpNotFound)?;

    let url = normalize_youtube_url(url);
    let output_path = dest_dir.join(format!("yt_{}.mp4", uuid::Uuid::new_v4().simple()));

    info!(url = %url, dest = %output_path.display(), "Downloading video with yt-dlp");

    let output = Command::new("yt-dlp")
        .args([
            "--no-playlist",
            "--quiet",
            "-f",
            FORMAT_SELECTOR,
            "-o",
        ])
        .arg(&output_path)
        .arg(&url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await?;

    if !output.status.success() {
        return Err(MediaError::download_failed(format!(
            "yt-dlp failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let size = tokio::fs::metadata(&output_path)
        .await
        .map(|m| m.len())
        .unwrap_or(0);
    if size == 0 {
        return Err(MediaError::download_failed(
            "yt-dlp produced no output file".to_string(),
        ));
    }

    let metadata = fetch_metadata(&url).await;

    Ok(DownloadedVideo {
        path: output_path,
        metadata,
    })
}

/// Query source metadata (title, duration) without downloading.
///
/// Failures degrade to empty metadata rather than erroring; the duration is
/// advisory and the pipeline re-probes the downloaded file anyway.
pub async fn fetch_metadata(url: &str) -> VideoMetadata {
    let empty = VideoMetadata {
        title: None,
        duration_secs: None,
        source_url: url.to_string(),
    };

    let output = Command::new("yt-dlp")
        .args([
            "--no-playlist",
            "--no-download",
            "--print",
            "title",
            "--print",
            "duration",
        ])
        .arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await;

    let output = match output {
        Ok(o) if o.status.success() => o,
        Ok(o) => {
            warn!(
                url = %url,
                stderr = %String::from_utf8_lossy(&o.stderr).trim(),
                "yt-dlp metadata query failed"
            );
            return empty;
        }
        Err(e) => {
            warn!(url = %url, error = %e, "Failed to spawn yt-dlp for metadata");
            return empty;
        }
    };

    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines().map(str::trim).filter(|l| !l.is_empty());

    let title = lines.next().map(str::to_string);
    let duration_secs = lines.next().and_then(|d| d.parse::<f64>().ok());

    VideoMetadata {
        title,
        duration_secs,
        source_url: url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_selector_caps_height() {
        assert!(FORMAT_SELECTOR.contains("height<=720"));
        assert!(FORMAT_SELECTOR.ends_with("/best"));
    }
}
