//! Characters detected in a video.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A character/person detected in the video.
///
/// All attribute fields are free-form strings assigned by the content
/// analyzer. `timestamp` is advisory: it may point past the end of the video
/// or at a frame that fails to decode, in which case `frame_image_b64`
/// simply stays unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Character {
    /// Perceived gender of the character (male, female, or non-binary). If unclear, say 'Unknown'.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// Perceived race/ethnicity of the character (e.g., South Asian, East Asian, Caucasian, African, etc.). If unclear, say 'Unknown'.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub race: Option<String>,

    /// The tone of voice or demeanor (e.g., sarcastic, serious, comedic, aggressive, friendly).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,

    /// Primary facial expression (e.g., smiling, frowning, neutral, angry, surprised).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facial_expression: Option<String>,

    /// Overall mood conveyed (e.g., happy, sad, anxious, excited, calm).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,

    /// Any additional notes about the character (clothing, role in video, etc.).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Video timestamp (in seconds) when this character is most visible. Each character should have a different timestamp that shows that specific person clearly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<f64>,

    /// Base64-encoded JPEG frame captured at the timestamp showing this character. Populated locally, never by the analyzer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_image_b64: Option<String>,
}

impl Character {
    /// Create a character carrying only a timestamp.
    pub fn at_timestamp(timestamp: f64) -> Self {
        Self {
            timestamp: Some(timestamp),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_fields_omitted_from_json() {
        let character = Character::at_timestamp(2.5);
        let json = serde_json::to_value(&character).unwrap();
        assert_eq!(json["timestamp"], 2.5);
        assert!(json.get("frame_image_b64").is_none());
        assert!(json.get("gender").is_none());
    }

    #[test]
    fn test_deserializes_from_sparse_analyzer_output() {
        let character: Character =
            serde_json::from_str(r#"{"mood": "happy", "timestamp": 3.2}"#).unwrap();
        assert_eq!(character.mood.as_deref(), Some("happy"));
        assert_eq!(character.timestamp, Some(3.2));
        assert!(character.frame_image_b64.is_none());
    }
}
