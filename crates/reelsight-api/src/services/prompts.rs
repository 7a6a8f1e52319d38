//! Prompt templates for the Gemini analyzer.

/// Full reel analysis: summary, characters, commentary, issues, transcript.
pub const REEL_ANALYSIS_PROMPT: &str = "\
You are analyzing a short-form vertical video (a reel). Watch it end to end \
and produce a structured report.

- main_summary: two or three sentences describing what happens in the video.
- characters: every distinct person on screen. For each, give a short name \
or descriptor, then gender, race, tone of voice, facial expression, and mood \
where they can be determined. Set timestamp to the second (from the start of \
the video) where that person is most clearly visible. Leave frame_image_b64 \
empty; it is filled in later.
- commentary_summary: if there is voice-over or on-screen commentary, \
summarize its argument. Otherwise say there is none.
- possible_issues: content moderation concerns, misleading claims, or \
anything a platform reviewer would flag. Empty list if nothing stands out.
- transcript: a best-effort transcript of all spoken words, or null if the \
video has no speech.
- suggestions: two or three concrete ideas to improve the video's engagement.

Base everything strictly on what is visible and audible. Do not invent \
details.";

/// Sentiment pass: emotion timeline plus per-character emotion summaries.
///
/// The seismograph arrays are computed locally from the timeline, so the
/// model is never asked for them.
pub const SENTIMENT_ANALYSIS_PROMPT: &str = "\
You are analyzing the emotional content of a short-form video. Produce a \
structured sentiment report.

- emotion_timeline: a list of segments covering moments with a clear \
emotional charge. Each segment has an emotion (one of: Anger, Disgust, \
Horror, Humor, Sadness, Surprise), a start and end in seconds from the \
start of the video, and an intensity between 0.0 and 1.0. Segments may \
overlap when several emotions are present at once. Do not pad quiet \
stretches with segments.
- character_emotions: for each distinct person: an id, a short name, their \
dominant emotion across the video, their volatility (Low, Medium, or High, \
by how much their emotion changes), and their screen_time as a percentage \
of the video between 0.0 and 100.0 (100.0 if they appear throughout).
- global_category: the overall sentiment category, e.g. \"Positive/Alert\", \
\"Negative/Concerning\", or \"Neutral/Mixed\".
- confidence_score: your confidence in this report, between 0.0 and 1.0.

For emotion and dominant_emotion, use only the six labels listed above, \
spelled exactly as shown.";

/// Lightweight summary used for plain uploads without the full report.
pub const SUMMARY_PROMPT: &str = "\
Summarize this video in two or three sentences. Mention who appears, what \
happens, and the overall tone. Base the summary strictly on what is visible \
and audible.";

#[cfg(test)]
mod tests {
    use super::*;

    // The prompt's field descriptions must agree with the schema sent
    // alongside it; mismatched instructions make the model pick one or
    // the other at random.
    #[test]
    fn test_sentiment_prompt_matches_schema_vocabulary() {
        assert!(SENTIMENT_ANALYSIS_PROMPT.contains("Low, Medium, or High"));
        assert!(SENTIMENT_ANALYSIS_PROMPT.contains("0.0 and 100.0"));
        assert!(SENTIMENT_ANALYSIS_PROMPT.contains("Positive/Alert"));
        assert!(SENTIMENT_ANALYSIS_PROMPT.contains("Neutral/Mixed"));
        assert!(!SENTIMENT_ANALYSIS_PROMPT.contains("screen time in seconds"));
    }

    #[test]
    fn test_sentiment_prompt_lists_all_emotions() {
        for label in ["Anger", "Disgust", "Horror", "Humor", "Sadness", "Surprise"] {
            assert!(SENTIMENT_ANALYSIS_PROMPT.contains(label));
        }
    }
}
