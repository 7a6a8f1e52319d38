//! Analysis handlers.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use reelsight_models::{
    is_youtube_url, ReelAnalysisRequest, ReelReport, VideoSummary, YouTubeAnalysisRequest,
};

use crate::error::{ApiError, ApiResult};
use crate::services::pipeline;
use crate::state::AppState;

/// Video container extensions accepted for direct upload.
const ALLOWED_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi"];

#[derive(Serialize)]
pub struct UploadAnalysisResponse {
    pub filename: String,
    pub summary: VideoSummary,
}

/// Analyze an Instagram reel by post URL.
///
/// POST /analyze-video/reel
pub async fn analyze_reel(
    State(state): State<AppState>,
    Json(request): Json<ReelAnalysisRequest>,
) -> ApiResult<Json<ReelReport>> {
    let post_url = request.post_url.trim();
    if post_url.is_empty() {
        return Err(ApiError::bad_request("post_url must not be empty"));
    }

    info!(url = %post_url, "reel analysis requested");
    let report = pipeline::analyze_reel(&state, post_url).await?;
    Ok(Json(report))
}

/// Analyze a YouTube video by URL.
///
/// POST /analyze-video/youtube
pub async fn analyze_youtube(
    State(state): State<AppState>,
    Json(request): Json<YouTubeAnalysisRequest>,
) -> ApiResult<Json<ReelReport>> {
    let video_url = request.video_url.trim();
    if video_url.is_empty() {
        return Err(ApiError::bad_request("video_url must not be empty"));
    }
    if !is_youtube_url(video_url) {
        return Err(ApiError::bad_request("video_url is not a YouTube URL"));
    }

    info!(url = %video_url, "youtube analysis requested");
    let report = pipeline::analyze_youtube(&state, video_url).await?;
    Ok(Json(report))
}

/// Accept a video upload and return a summary of its content.
///
/// POST /analyze-video
pub async fn analyze_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadAnalysisResponse>> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
        .ok_or_else(|| ApiError::bad_request("missing video file field"))?;

    let original_name = field.file_name().unwrap_or("upload.mp4").to_string();
    let extension = validate_extension(&original_name)?;

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;
    if bytes.is_empty() {
        return Err(ApiError::bad_request("uploaded file is empty"));
    }

    let filename = format!("{}.{extension}", Uuid::new_v4());
    let path = state.config.videos_dir.join(&filename);
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("failed to store upload: {e}")))?;

    info!(filename = %filename, size = bytes.len(), "video uploaded");

    let summary = pipeline::summarize_video(&state, &path).await?;
    Ok(Json(UploadAnalysisResponse { filename, summary }))
}

/// Check the upload's extension against the allow-list.
fn validate_extension(filename: &str) -> ApiResult<String> {
    let extension = filename
        .rsplit('.')
        .next()
        .map(|e| e.to_ascii_lowercase())
        .filter(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
        .ok_or_else(|| {
            ApiError::bad_request(format!(
                "unsupported file type, expected one of: {}",
                ALLOWED_EXTENSIONS.join(", ")
            ))
        })?;
    Ok(extension)
}
