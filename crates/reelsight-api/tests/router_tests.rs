//! Router integration tests.
//!
//! These exercise routing and request validation only; nothing here reaches
//! the Gemini API or the downloader service.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use tower::ServiceExt;

use reelsight_api::{create_router, ApiConfig, AppState};

async fn create_test_router() -> axum::Router {
    // The analyzer client is constructed from the environment but never
    // called by these tests.
    std::env::set_var("GEMINI_API_KEY", "test-key");

    let videos_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();

    let config = ApiConfig {
        videos_dir: videos_dir.keep(),
        cache_dir: cache_dir.keep(),
        ..ApiConfig::default()
    };

    let state = AppState::new(config).await.unwrap();
    create_router(state)
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/nonexistent")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reel_analysis_rejects_empty_url() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze-video/reel")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"post_url": "   "}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_youtube_analysis_rejects_non_youtube_url() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/analyze-video/youtube")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"video_url": "https://example.com/watch"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_missing_video_returns_404() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/videos/missing.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_rejects_traversal_filename() {
    let app = create_test_router().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/videos/..%2Fescape.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_stored_video_roundtrip() {
    std::env::set_var("GEMINI_API_KEY", "test-key");
    let videos_dir = tempfile::tempdir().unwrap();
    let cache_dir = tempfile::tempdir().unwrap();

    let config = ApiConfig {
        videos_dir: videos_dir.path().to_path_buf(),
        cache_dir: cache_dir.path().to_path_buf(),
        ..ApiConfig::default()
    };
    tokio::fs::write(videos_dir.path().join("clip.mp4"), b"not a real video")
        .await
        .unwrap();

    let state = AppState::new(config).await.unwrap();
    let app = create_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/videos/clip.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "video/mp4"
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/videos/clip.mp4")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(!videos_dir.path().join("clip.mp4").exists());
}
