//! Error types for the content analyzer client.

use thiserror::Error;

/// Result type for analyzer operations.
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;

/// Errors that can occur while talking to the content analyzer.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error("GEMINI_API_KEY not set")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Analyzer API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("File processing failed, state: {0}")]
    FileProcessing(String),

    #[error("File not ready after {0} seconds")]
    PollTimeout(u64),

    #[error("No content in analyzer response")]
    EmptyResponse,

    #[error("Failed to parse analyzer JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("All analyzer models failed")]
    AllModelsFailed,
}
