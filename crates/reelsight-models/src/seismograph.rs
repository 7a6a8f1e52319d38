//! Emotion seismograph rasterization.
//!
//! Converts the sparse, possibly-overlapping emotion timeline produced by the
//! content analyzer into dense, fixed-length per-emotion intensity arrays for
//! timeline visualization. The same rasterizer serves both the fixed
//! 100-bucket view and the one-bucket-per-second view by varying the
//! resolution.

use serde::{Deserialize, Serialize};

use crate::emotion::{Emotion, EmotionSegment};

/// Default visualization resolution (~one bucket per 1% of the video).
pub const VIS_RESOLUTION: usize = 100;

/// Seismograph data with intensity arrays for each emotion.
///
/// Every emotion key is always present, even when no segment referenced it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Seismograph {
    /// Anger intensity array
    #[serde(default)]
    pub anger: Vec<f64>,
    /// Disgust intensity array
    #[serde(default)]
    pub disgust: Vec<f64>,
    /// Horror intensity array
    #[serde(default)]
    pub horror: Vec<f64>,
    /// Humor intensity array
    #[serde(default)]
    pub humor: Vec<f64>,
    /// Sadness intensity array
    #[serde(default)]
    pub sadness: Vec<f64>,
    /// Surprise intensity array
    #[serde(default)]
    pub surprise: Vec<f64>,
}

impl Seismograph {
    /// All-zero arrays of the given resolution for every emotion.
    pub fn zeroed(resolution: usize) -> Self {
        Self {
            anger: vec![0.0; resolution],
            disgust: vec![0.0; resolution],
            horror: vec![0.0; resolution],
            humor: vec![0.0; resolution],
            sadness: vec![0.0; resolution],
            surprise: vec![0.0; resolution],
        }
    }

    /// Rasterize an emotion timeline into dense intensity arrays.
    ///
    /// Each segment's `[start, end)` interval maps onto bucket indices
    /// `floor(start/duration * N) .. floor(end/duration * N)`, clamped to
    /// `[0, N)`, and every bucket in that range is set to the segment's
    /// intensity. Segments are processed in the given order and later
    /// segments overwrite earlier ones in overlapping buckets (most recent
    /// classification wins). Segments with unrecognized emotion labels are
    /// skipped.
    ///
    /// A non-positive `duration` yields all-zero arrays; the caller may
    /// legitimately not know the duration yet.
    pub fn from_segments(segments: &[EmotionSegment], duration: f64, resolution: usize) -> Self {
        let mut seismograph = Self::zeroed(resolution);
        if duration <= 0.0 {
            return seismograph;
        }

        for segment in segments {
            let Some(emotion) = Emotion::from_label(&segment.emotion) else {
                continue;
            };

            let start_idx = bucket_index(segment.start, duration, resolution);
            let end_idx = bucket_index(segment.end, duration, resolution);

            let track = seismograph.track_mut(emotion);
            for bucket in track.iter_mut().take(end_idx).skip(start_idx) {
                *bucket = segment.intensity;
            }
        }

        seismograph
    }

    /// Rasterize with one bucket per whole second of video.
    pub fn per_second(segments: &[EmotionSegment], duration: f64) -> Self {
        let resolution = if duration > 0.0 { duration as usize } else { 0 };
        Self::from_segments(segments, duration, resolution)
    }

    /// The intensity array for one emotion.
    pub fn track(&self, emotion: Emotion) -> &[f64] {
        match emotion {
            Emotion::Anger => &self.anger,
            Emotion::Disgust => &self.disgust,
            Emotion::Horror => &self.horror,
            Emotion::Humor => &self.humor,
            Emotion::Sadness => &self.sadness,
            Emotion::Surprise => &self.surprise,
        }
    }

    fn track_mut(&mut self, emotion: Emotion) -> &mut [f64] {
        match emotion {
            Emotion::Anger => &mut self.anger,
            Emotion::Disgust => &mut self.disgust,
            Emotion::Horror => &mut self.horror,
            Emotion::Humor => &mut self.humor,
            Emotion::Sadness => &mut self.sadness,
            Emotion::Surprise => &mut self.surprise,
        }
    }
}

/// Map a time offset to a bucket index, clamped to `[0, resolution]`.
fn bucket_index(seconds: f64, duration: f64, resolution: usize) -> usize {
    let raw = ((seconds / duration) * resolution as f64).floor();
    if raw <= 0.0 {
        0
    } else if raw >= resolution as f64 {
        resolution
    } else {
        raw as usize
    }
}
