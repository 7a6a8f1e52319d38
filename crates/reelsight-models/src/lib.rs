//! Shared data models for the ReelSight backend.
//!
//! This crate provides Serde-serializable types for:
//! - Emotion timeline segments and the seismograph visualization arrays
//! - Characters detected in a video
//! - Structured analysis reports returned to clients
//! - Source URL helpers (YouTube recognition/normalization)

pub mod analysis;
pub mod character;
pub mod emotion;
pub mod seismograph;
pub mod video;

// Re-export common types
pub use analysis::{
    ReelAnalysis, ReelAnalysisRequest, ReelReport, SentimentAnalysis, VideoSummary,
    YouTubeAnalysisRequest,
};
pub use character::Character;
pub use emotion::{CharacterEmotion, Emotion, EmotionSegment};
pub use seismograph::{Seismograph, VIS_RESOLUTION};
pub use video::{is_youtube_url, normalize_youtube_url, VideoMetadata};
