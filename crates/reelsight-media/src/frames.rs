//! Character frame extraction.
//!
//! For each character carrying a timestamp, grabs one representative still
//! from the source video, resizes it so the longer side fits a fixed cap
//! while preserving aspect ratio, and stores it as a base64 JPEG on the
//! character. Extraction is best-effort enrichment: every failure mode
//! degrades to "frame left unset," never to an error for the caller.

use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use tracing::{debug, warn};

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::error::{MediaError, MediaResult};
use crate::probe::probe_video;
use reelsight_models::Character;

/// Longest output side in pixels.
const DEFAULT_MAX_DIM: u32 = 500;
/// JPEG encode quality.
const DEFAULT_JPEG_QUALITY: u8 = 85;
/// Per-frame FFmpeg timeout.
const FRAME_TIMEOUT_SECS: u64 = 30;

/// Extracts normalized character stills from a video file.
#[derive(Debug, Clone)]
pub struct FrameExtractor {
    max_dim: u32,
    jpeg_quality: u8,
}

impl Default for FrameExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameExtractor {
    /// Create an extractor with the default 500 px cap and quality 85.
    pub fn new() -> Self {
        Self {
            max_dim: DEFAULT_MAX_DIM,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Override the output size cap.
    pub fn with_max_dim(mut self, max_dim: u32) -> Self {
        self.max_dim = max_dim;
        self
    }

    /// Populate `frame_image_b64` for every character with a usable timestamp.
    ///
    /// Returns the characters in their input order and identity. The call
    /// never fails: an empty list, an unopenable video, or a non-positive
    /// frame rate all return the input unchanged, and a per-character grab
    /// failure (timestamp past the end, decode error) leaves only that
    /// character's frame unset.
    ///
    /// Characters are processed sequentially, each with its own FFmpeg
    /// invocation; there is no shared decode handle whose seek/read pair
    /// could interleave.
    pub async fn extract(
        &self,
        mut characters: Vec<Character>,
        video_path: impl AsRef<Path>,
    ) -> Vec<Character> {
        let video_path = video_path.as_ref();

        if characters.is_empty() || !video_path.exists() {
            debug!(path = %video_path.display(), "Skipping frame extraction (no work)");
            return characters;
        }

        let info = match probe_video(video_path).await {
            Ok(info) => info,
            Err(e) => {
                warn!(path = %video_path.display(), error = %e, "Failed to open video for frame extraction");
                return characters;
            }
        };

        if info.fps <= 0.0 {
            warn!(fps = info.fps, "Invalid frame rate, skipping frame extraction");
            return characters;
        }

        let scratch = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => {
                warn!(error = %e, "Failed to create scratch dir for frame extraction");
                return characters;
            }
        };

        for (slot, character) in characters.iter_mut().enumerate() {
            let Some(timestamp) = character.timestamp else {
                continue;
            };

            match self
                .grab_and_encode(video_path, scratch.path(), slot, timestamp, info.fps)
                .await
            {
                Ok(encoded) => character.frame_image_b64 = Some(encoded),
                Err(e) => {
                    warn!(timestamp, error = %e, "Failed to extract character frame");
                }
            }
        }

        // scratch dir and its frame files are removed on drop
        characters
    }

    /// Grab one frame, resize it, and return it base64-encoded.
    async fn grab_and_encode(
        &self,
        video_path: &Path,
        scratch: &Path,
        slot: usize,
        timestamp: f64,
        fps: f64,
    ) -> MediaResult<String> {
        let index = frame_index(timestamp, fps);
        let frame_path = scratch.join(format!("frame_{slot}.png"));

        let cmd = FfmpegCommand::new(video_path, &frame_path)
            .seek(seek_seconds(index, fps))
            .single_frame()
            .log_level("error");

        FfmpegRunner::new()
            .with_timeout(FRAME_TIMEOUT_SECS)
            .run(&cmd)
            .await?;

        // FFmpeg exits zero but writes nothing when the seek lands past the
        // last frame; treat that the same as a read failure.
        let bytes = tokio::fs::read(&frame_path).await.map_err(|_| {
            MediaError::EmptyFrame(index)
        })?;
        if bytes.is_empty() {
            return Err(MediaError::EmptyFrame(index));
        }

        let frame = image::load_from_memory(&bytes)?;
        let (width, height) = fit_within(frame.width(), frame.height(), self.max_dim);
        // JPEG has no alpha channel; normalize whatever FFmpeg produced
        let resized = frame
            .resize_exact(width, height, FilterType::Lanczos3)
            .to_rgb8();

        let mut jpeg = Vec::new();
        JpegEncoder::new_with_quality(&mut jpeg, self.jpeg_quality).encode_image(&resized)?;

        Ok(BASE64.encode(&jpeg))
    }
}

/// Map a timestamp to the nearest frame index, never negative.
fn frame_index(timestamp: f64, fps: f64) -> i64 {
    ((timestamp * fps).round() as i64).max(0)
}

/// Seek position for a frame index.
fn seek_seconds(index: i64, fps: f64) -> f64 {
    index as f64 / fps
}

/// Output dimensions with the longer side equal to `max_dim`, aspect
/// ratio preserved.
fn fit_within(width: u32, height: u32, max_dim: u32) -> (u32, u32) {
    if width >= height {
        let scaled = (height as f64 * (max_dim as f64 / width as f64)) as u32;
        (max_dim, scaled.max(1))
    } else {
        let scaled = (width as f64 * (max_dim as f64 / height as f64)) as u32;
        (scaled.max(1), max_dim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fit_within_landscape() {
        assert_eq!(fit_within(1920, 1080, 500), (500, 281));
    }

    #[test]
    fn test_fit_within_portrait() {
        assert_eq!(fit_within(1080, 1920, 500), (281, 500));
    }

    #[test]
    fn test_fit_within_square_and_tiny() {
        assert_eq!(fit_within(640, 640, 500), (500, 500));
        // extreme aspect ratios never collapse to zero
        assert_eq!(fit_within(4000, 2, 500), (500, 1));
    }

    #[test]
    fn test_frame_index_rounds() {
        assert_eq!(frame_index(2.5, 30.0), 75);
        assert_eq!(frame_index(0.016, 30.0), 0);
        assert_eq!(frame_index(0.017, 30.0), 1);
        // advisory timestamps can be garbage; never seek backwards past zero
        assert_eq!(frame_index(-1.0, 30.0), 0);
    }

    #[test]
    fn test_seek_seconds() {
        assert!((seek_seconds(75, 30.0) - 2.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_extract_empty_list_is_noop() {
        let extractor = FrameExtractor::new();
        let result = extractor.extract(Vec::new(), "/nonexistent/path.mp4").await;
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_extract_missing_video_returns_input_unchanged() {
        let characters = vec![
            Character::at_timestamp(5.0),
            Character::default(),
            Character::at_timestamp(2.0),
        ];

        let extractor = FrameExtractor::new();
        let result = extractor
            .extract(characters.clone(), "/nonexistent/path.mp4")
            .await;

        assert_eq!(result, characters);
    }

    #[tokio::test]
    async fn test_extract_undecodable_video_returns_input_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not_a_video.mp4");
        tokio::fs::write(&bogus, b"definitely not mp4 bytes").await.unwrap();

        let characters = vec![
            Character::at_timestamp(1.0),
            Character::at_timestamp(3.0),
        ];

        let extractor = FrameExtractor::new();
        let result = extractor.extract(characters.clone(), &bogus).await;

        // order and identity preserved, no frames populated
        assert_eq!(result, characters);
        assert!(result.iter().all(|c| c.frame_image_b64.is_none()));
    }
}
