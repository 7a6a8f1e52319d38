//! The analysis pipeline: fetch, analyze, enrich, cache.

use std::path::Path;

use tracing::{info, warn};

use reelsight_media::probe_video;
use reelsight_models::{
    ReelAnalysis, ReelReport, Seismograph, SentimentAnalysis, VideoSummary, VIS_RESOLUTION,
};

use crate::error::ApiResult;
use crate::services::fetcher::{self, cleanup_video};
use crate::services::prompts;
use crate::state::AppState;

/// Analyze an Instagram reel by post URL, using the cache when fresh.
pub async fn analyze_reel(state: &AppState, post_url: &str) -> ApiResult<ReelReport> {
    if let Some(report) = state.cache.get::<ReelReport>(post_url).await {
        info!(url = %post_url, "returning cached analysis");
        return Ok(report);
    }

    let downloaded = fetcher::fetch_reel(
        &state.http,
        &state.config.downloader_base_url,
        post_url,
        &state.config.videos_dir,
    )
    .await?;

    let result = run_analysis(state, &downloaded.path, post_url, &downloaded.metadata).await;
    cleanup_video(&downloaded.path).await;
    let report = result?;

    store_report(state, post_url, &report).await;
    Ok(report)
}

/// Analyze a YouTube video by URL, using the cache when fresh.
pub async fn analyze_youtube(state: &AppState, video_url: &str) -> ApiResult<ReelReport> {
    if let Some(report) = state.cache.get::<ReelReport>(video_url).await {
        info!(url = %video_url, "returning cached analysis");
        return Ok(report);
    }

    let downloaded = fetcher::fetch_youtube(video_url, &state.config.videos_dir).await?;

    let result = run_analysis(state, &downloaded.path, video_url, &downloaded.metadata).await;
    cleanup_video(&downloaded.path).await;
    let report = result?;

    store_report(state, video_url, &report).await;
    Ok(report)
}

/// Summarize an already-uploaded local video file.
pub async fn summarize_video(state: &AppState, path: &Path) -> ApiResult<VideoSummary> {
    let summary = state
        .analyzer
        .analyze_video::<VideoSummary>(path, prompts::SUMMARY_PROMPT)
        .await?;
    Ok(summary)
}

/// The shared core: upload to the analyzer, run both passes, build the
/// seismograph, attach character frames.
async fn run_analysis(
    state: &AppState,
    video_path: &Path,
    source_url: &str,
    metadata: &reelsight_models::VideoMetadata,
) -> ApiResult<ReelReport> {
    let duration_secs = probe_duration(video_path).await.or(metadata.duration_secs);

    let remote = state.analyzer.upload_video(video_path).await?;
    let remote = match state.analyzer.wait_until_active(&remote).await {
        Ok(remote) => remote,
        Err(e) => {
            state.analyzer.delete_file(&remote).await;
            return Err(e.into());
        }
    };

    let analysis = match state
        .analyzer
        .generate::<ReelAnalysis>(&remote, prompts::REEL_ANALYSIS_PROMPT)
        .await
    {
        Ok(analysis) => analysis,
        Err(e) => {
            state.analyzer.delete_file(&remote).await;
            return Err(e.into());
        }
    };

    // The sentiment pass is best-effort; the main report stands without it.
    let sentiment = match state
        .analyzer
        .generate::<SentimentAnalysis>(&remote, prompts::SENTIMENT_ANALYSIS_PROMPT)
        .await
    {
        Ok(mut sentiment) => {
            attach_seismographs(&mut sentiment, duration_secs);
            Some(sentiment)
        }
        Err(e) => {
            warn!(error = %e, "sentiment analysis failed, continuing without it");
            None
        }
    };

    state.analyzer.delete_file(&remote).await;

    let mut analysis = analysis;
    analysis.characters = state
        .extractor
        .extract(analysis.characters, video_path)
        .await;

    Ok(ReelReport {
        analysis,
        sentiment,
        source_url: source_url.to_string(),
        duration_secs,
        analyzed_at: chrono::Utc::now(),
    })
}

/// Rasterize the timeline into both visualization resolutions: the fixed
/// 100-bucket view and the one-bucket-per-second view. An unknown duration
/// yields all-zero and empty arrays respectively.
fn attach_seismographs(sentiment: &mut SentimentAnalysis, duration_secs: Option<f64>) {
    let duration = duration_secs.unwrap_or(0.0);
    sentiment.emotion_seismograph =
        Seismograph::from_segments(&sentiment.emotion_timeline, duration, VIS_RESOLUTION);
    sentiment.emotion_seismograph_per_second =
        Seismograph::per_second(&sentiment.emotion_timeline, duration);
}

async fn probe_duration(path: &Path) -> Option<f64> {
    match probe_video(path).await {
        Ok(info) if info.duration > 0.0 => Some(info.duration),
        Ok(_) => None,
        Err(e) => {
            warn!(error = %e, "probe failed, falling back to fetched metadata");
            None
        }
    }
}

async fn store_report(state: &AppState, url: &str, report: &ReelReport) {
    if let Err(e) = state.cache.set(url, report).await {
        warn!(error = %e, "failed to cache analysis");
    }
}
