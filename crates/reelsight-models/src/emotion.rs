//! Emotion taxonomy and timeline segments.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The six emotions tracked on the seismograph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum Emotion {
    Anger,
    Disgust,
    Horror,
    Humor,
    Sadness,
    Surprise,
}

impl Emotion {
    /// All tracked emotions, in seismograph order.
    pub const ALL: [Emotion; 6] = [
        Emotion::Anger,
        Emotion::Disgust,
        Emotion::Horror,
        Emotion::Humor,
        Emotion::Sadness,
        Emotion::Surprise,
    ];

    /// Returns the canonical label for this emotion.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anger => "Anger",
            Self::Disgust => "Disgust",
            Self::Horror => "Horror",
            Self::Humor => "Humor",
            Self::Sadness => "Sadness",
            Self::Surprise => "Surprise",
        }
    }

    /// Parse a label produced by the analyzer.
    ///
    /// The analyzer output is not schema-enforced and may contain typos or
    /// labels outside the taxonomy; those return `None` and the caller is
    /// expected to skip them.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Anger" => Some(Self::Anger),
            "Disgust" => Some(Self::Disgust),
            "Horror" => Some(Self::Horror),
            "Humor" => Some(Self::Humor),
            "Sadness" => Some(Self::Sadness),
            "Surprise" => Some(Self::Surprise),
            _ => None,
        }
    }
}

impl std::fmt::Display for Emotion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An emotion segment in the timeline.
///
/// Produced by the content analyzer. `emotion` is kept as a free-form string
/// because the model occasionally emits labels outside the taxonomy; missing
/// numeric fields fall back to neutral defaults instead of failing the parse.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmotionSegment {
    /// Emotion name: Anger, Disgust, Horror, Humor, Sadness, or Surprise
    #[serde(default)]
    pub emotion: String,

    /// Start time in seconds
    #[serde(default)]
    pub start: f64,

    /// End time in seconds
    #[serde(default)]
    pub end: f64,

    /// Emotion intensity 0.0-1.0
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

fn default_intensity() -> f64 {
    0.5
}

impl EmotionSegment {
    /// Create a segment with a recognized emotion.
    pub fn new(emotion: Emotion, start: f64, end: f64, intensity: f64) -> Self {
        Self {
            emotion: emotion.as_str().to_string(),
            start,
            end,
            intensity,
        }
    }
}

/// Per-character emotion summary from the analyzer.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CharacterEmotion {
    /// Character ID
    pub id: String,

    /// Character name
    pub name: String,

    /// Dominant emotion: Anger, Disgust, Horror, Humor, Sadness, or Surprise
    pub dominant_emotion: String,

    /// Emotion volatility: Low, Medium, or High
    pub volatility: String,

    /// Percentage of screen time 0.0-100.0
    pub screen_time: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emotion_label_roundtrip() {
        for emotion in Emotion::ALL {
            assert_eq!(Emotion::from_label(emotion.as_str()), Some(emotion));
        }
    }

    #[test]
    fn test_unknown_label_rejected() {
        assert_eq!(Emotion::from_label("Glee"), None);
        assert_eq!(Emotion::from_label("anger"), None);
        assert_eq!(Emotion::from_label(""), None);
    }

    #[test]
    fn test_segment_missing_fields_default() {
        let segment: EmotionSegment = serde_json::from_str(r#"{"emotion": "Anger"}"#).unwrap();
        assert_eq!(segment.start, 0.0);
        assert_eq!(segment.end, 0.0);
        assert!((segment.intensity - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_segment_missing_emotion_defaults_empty() {
        let segment: EmotionSegment =
            serde_json::from_str(r#"{"start": 1.0, "end": 2.0, "intensity": 0.9}"#).unwrap();
        assert_eq!(segment.emotion, "");
        assert_eq!(Emotion::from_label(&segment.emotion), None);
    }
}
