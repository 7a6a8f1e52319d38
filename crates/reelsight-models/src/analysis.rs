//! Analysis reports returned to clients.
//!
//! The field doc comments double as schema descriptions: schemars feeds them
//! into the JSON schema that constrains the content analyzer's output.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::emotion::{CharacterEmotion, EmotionSegment};
use crate::seismograph::Seismograph;

/// Simplified video content analysis with just a summary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct VideoSummary {
    /// Detailed 3-4 sentence summary of the video content, including main message and context.
    pub summary: String,
}

/// Structured analysis of a short-form social media video (reel).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReelAnalysis {
    /// A concise summary of the video's main topic or message in 2-3 sentences.
    pub main_summary: String,

    /// List of characters/people appearing in the video with their attributes.
    #[serde(default)]
    pub characters: Vec<Character>,

    /// A thorough explanation of the video's plot, narrative arc, and storyline from beginning to end, including dialogue context and on-screen text.
    pub commentary_summary: String,

    /// Potential content violations or sensitive topics detected (e.g., racism, hate speech, violence). Empty if none detected.
    #[serde(default)]
    pub possible_issues: Vec<String>,

    /// Transcript of audio/speech in the video, if available. Include speaker labels if multiple speakers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transcript: Option<String>,

    /// Suggestions or observations about the content (e.g., context needed, content warnings).
    #[serde(default)]
    pub suggestions: Vec<String>,
}

/// Emotion and sentiment analysis from the video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SentimentAnalysis {
    /// List of emotion segments with time and intensity.
    #[serde(default)]
    pub emotion_timeline: Vec<EmotionSegment>,

    /// Per-emotion intensity arrays for visualization (100 buckets).
    /// Derived locally from the timeline; excluded from the analyzer's
    /// response schema so the model is never asked to generate the arrays.
    #[serde(default)]
    #[schemars(skip)]
    pub emotion_seismograph: Seismograph,

    /// Per-emotion intensity arrays with one bucket per whole second of
    /// video. Derived locally, like `emotion_seismograph`.
    #[serde(default)]
    #[schemars(skip)]
    pub emotion_seismograph_per_second: Seismograph,

    /// Per-character emotion data (id, name, dominant_emotion, volatility, screen_time).
    #[serde(default)]
    pub character_emotions: Vec<CharacterEmotion>,

    /// Overall sentiment category, e.g., Positive/Alert, Negative/Concerning, Neutral/Mixed.
    pub global_category: String,

    /// Analysis confidence 0.0-1.0
    pub confidence_score: f64,
}

/// The combined client-facing report for one analyzed reel.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReelReport {
    /// Structured content analysis.
    pub analysis: ReelAnalysis,

    /// Sentiment/emotion analysis with seismograph arrays.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentAnalysis>,

    /// Source URL the report was built from.
    pub source_url: String,

    /// Video duration in seconds as reported by the media fetcher (approximate).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,

    /// When the analysis completed, for cache verification.
    pub analyzed_at: DateTime<Utc>,
}

/// Request body for reel analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ReelAnalysisRequest {
    /// The Instagram reel/post URL to analyze.
    pub post_url: String,
}

/// Request body for YouTube video analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct YouTubeAnalysisRequest {
    /// The YouTube video or Shorts URL to analyze.
    pub video_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reel_analysis_tolerates_sparse_json() {
        let json = r#"{
            "main_summary": "A cooking demo.",
            "commentary_summary": "Someone cooks pasta and plates it."
        }"#;
        let analysis: ReelAnalysis = serde_json::from_str(json).unwrap();
        assert!(analysis.characters.is_empty());
        assert!(analysis.possible_issues.is_empty());
        assert!(analysis.transcript.is_none());
    }

    #[test]
    fn test_sentiment_defaults_empty_seismograph() {
        let json = r#"{
            "emotion_timeline": [],
            "global_category": "Neutral/Mixed",
            "confidence_score": 0.9
        }"#;
        let sentiment: SentimentAnalysis = serde_json::from_str(json).unwrap();
        assert!(sentiment.emotion_seismograph.anger.is_empty());
        assert!(sentiment.emotion_seismograph_per_second.anger.is_empty());
        assert!(sentiment.character_emotions.is_empty());
    }

    // The seismograph arrays are computed locally; asking the model to fill
    // in ~600 floats it cannot know would only waste tokens and get thrown
    // away, so the response schema must not mention them.
    #[test]
    fn test_sentiment_schema_excludes_seismograph_arrays() {
        let schema = serde_json::to_value(schemars::schema_for!(SentimentAnalysis)).unwrap();
        let properties = schema["properties"].as_object().unwrap();
        assert!(!properties.contains_key("emotion_seismograph"));
        assert!(!properties.contains_key("emotion_seismograph_per_second"));
        assert!(properties.contains_key("emotion_timeline"));
        assert!(properties.contains_key("global_category"));
    }
}
