//! Stored video handlers: retrieval and deletion.

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: String,
}

/// Serve a stored video file.
///
/// GET /videos/:filename
pub async fn get_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let path = resolve_video_path(&state.config.videos_dir, &filename)?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| ApiError::not_found(format!("video not found: {filename}")))?;

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&filename))
        .header(header::CONTENT_LENGTH, bytes.len())
        .header(header::ACCEPT_RANGES, "bytes")
        .body(Body::from(bytes))
        .map_err(|e| ApiError::internal(format!("failed to build response: {e}")))
}

/// Delete a stored video file.
///
/// DELETE /videos/:filename
pub async fn delete_video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let path = resolve_video_path(&state.config.videos_dir, &filename)?;

    tokio::fs::remove_file(&path)
        .await
        .map_err(|_| ApiError::not_found(format!("video not found: {filename}")))?;

    info!(filename = %filename, "video deleted");
    Ok(Json(DeleteResponse { deleted: filename }))
}

/// Reject filenames that could escape the videos directory.
fn resolve_video_path(videos_dir: &std::path::Path, filename: &str) -> ApiResult<std::path::PathBuf> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(ApiError::bad_request("invalid filename"));
    }
    Ok(videos_dir.join(filename))
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("mp4") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("avi") => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_rejects_traversal() {
        assert!(resolve_video_path(std::path::Path::new("videos"), "../etc/passwd").is_err());
        assert!(resolve_video_path(std::path::Path::new("videos"), "a/b.mp4").is_err());
        assert!(resolve_video_path(std::path::Path::new("videos"), "a\\b.mp4").is_err());
        assert!(resolve_video_path(std::path::Path::new("videos"), "").is_err());
    }

    #[test]
    fn test_resolve_accepts_plain_names() {
        let path = resolve_video_path(std::path::Path::new("videos"), "clip.mp4").unwrap();
        assert_eq!(path, std::path::Path::new("videos").join("clip.mp4"));
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("a.mp4"), "video/mp4");
        assert_eq!(content_type_for("a.webm"), "video/webm");
        assert_eq!(content_type_for("a.bin"), "application/octet-stream");
    }
}
