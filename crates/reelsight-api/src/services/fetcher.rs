//! Fetching source videos: Instagram reels via the downloader service,
//! YouTube via yt-dlp.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info};
use uuid::Uuid;

use reelsight_media::{download_youtube, DownloadedVideo};
use reelsight_models::VideoMetadata;

use crate::error::{ApiError, ApiResult};

/// Response envelope from the downloader service.
#[derive(Debug, Deserialize)]
struct DownloaderResponse {
    #[serde(default)]
    success: bool,
    data: Option<DownloaderData>,
}

#[derive(Debug, Deserialize)]
struct DownloaderData {
    #[serde(default)]
    medias: Vec<DownloaderMedia>,
    title: Option<String>,
    duration: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct DownloaderMedia {
    url: String,
}

/// Resolve a reel post URL to a direct media URL via the downloader service.
async fn resolve_reel_url(
    http: &reqwest::Client,
    base_url: &str,
    post_url: &str,
) -> ApiResult<(String, VideoMetadata)> {
    let endpoint = format!("{}/api/video", base_url.trim_end_matches('/'));
    debug!(endpoint = %endpoint, post_url = %post_url, "resolving reel url");

    let response = http
        .get(&endpoint)
        .query(&[("postUrl", post_url), ("enhanced", "true")])
        .send()
        .await
        .map_err(|e| ApiError::fetch(format!("downloader service unreachable: {e}")))?;

    if !response.status().is_success() {
        return Err(ApiError::fetch(format!(
            "downloader service returned {}",
            response.status()
        )));
    }

    let body: DownloaderResponse = response
        .json()
        .await
        .map_err(|e| ApiError::fetch(format!("invalid downloader response: {e}")))?;

    if !body.success {
        return Err(ApiError::fetch("downloader service reported failure"));
    }

    let data = body
        .data
        .ok_or_else(|| ApiError::fetch("downloader response missing data"))?;
    let media = data
        .medias
        .into_iter()
        .next()
        .ok_or_else(|| ApiError::fetch("downloader response has no media"))?;

    let metadata = VideoMetadata {
        title: data.title,
        duration_secs: data.duration,
        source_url: post_url.to_string(),
    };

    Ok((media.url, metadata))
}

/// Download an Instagram reel into `dest_dir` and return its local path.
pub async fn fetch_reel(
    http: &reqwest::Client,
    downloader_base_url: &str,
    post_url: &str,
    dest_dir: impl AsRef<Path>,
) -> ApiResult<DownloadedVideo> {
    let (media_url, metadata) = resolve_reel_url(http, downloader_base_url, post_url).await?;

    let path = dest_dir
        .as_ref()
        .join(format!("temp_reel_{}.mp4", Uuid::new_v4()));

    let response = http
        .get(&media_url)
        .send()
        .await
        .map_err(|e| ApiError::fetch(format!("media download failed: {e}")))?;
    if !response.status().is_success() {
        return Err(ApiError::fetch(format!(
            "media host returned {}",
            response.status()
        )));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| ApiError::fetch(format!("media download interrupted: {e}")))?;
    if bytes.is_empty() {
        return Err(ApiError::fetch("media host returned an empty file"));
    }

    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("failed to store video: {e}")))?;

    info!(path = %path.display(), size = bytes.len(), "reel downloaded");
    Ok(DownloadedVideo { path, metadata })
}

/// Download a YouTube video into `dest_dir` via yt-dlp.
pub async fn fetch_youtube(
    video_url: &str,
    dest_dir: impl AsRef<Path>,
) -> ApiResult<DownloadedVideo> {
    let downloaded = download_youtube(video_url, dest_dir).await?;
    info!(path = %downloaded.path.display(), "youtube video downloaded");
    Ok(downloaded)
}

/// Remove a temporary video file, logging rather than failing on error.
pub async fn cleanup_video(path: &PathBuf) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove temp video");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downloader_response_parses_expected_shape() {
        let json = r#"{
            "success": true,
            "data": {
                "medias": [{"url": "https://cdn.example.com/v.mp4"}],
                "title": "A reel",
                "duration": 12.5
            }
        }"#;
        let parsed: DownloaderResponse = serde_json::from_str(json).unwrap();
        assert!(parsed.success);
        let data = parsed.data.unwrap();
        assert_eq!(data.medias[0].url, "https://cdn.example.com/v.mp4");
        assert_eq!(data.duration, Some(12.5));
    }

    #[test]
    fn downloader_response_tolerates_missing_fields() {
        let parsed: DownloaderResponse = serde_json::from_str(r#"{"success": false}"#).unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());
    }
}
