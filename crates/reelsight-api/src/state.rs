//! Application state.

use std::sync::Arc;

use reelsight_analyzer::GeminiClient;
use reelsight_cache::AnalysisCache;
use reelsight_media::FrameExtractor;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub cache: Arc<AnalysisCache>,
    pub analyzer: Arc<GeminiClient>,
    pub extractor: FrameExtractor,
    pub http: reqwest::Client,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        tokio::fs::create_dir_all(&config.videos_dir).await?;

        let cache = AnalysisCache::open(&config.cache_dir, config.cache_ttl).await?;
        let analyzer = GeminiClient::from_env()?;

        Ok(Self {
            config,
            cache: Arc::new(cache),
            analyzer: Arc::new(analyzer),
            extractor: FrameExtractor::new(),
            http: reqwest::Client::new(),
        })
    }
}
