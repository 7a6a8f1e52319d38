#![deny(unreachable_patterns)]
//! FFmpeg CLI wrappers for the ReelSight backend.
//!
//! This crate provides:
//! - Type-safe FFmpeg command building
//! - Video probing (duration, dimensions, frame rate)
//! - Character frame extraction with aspect-preserving resize
//! - Video download via yt-dlp

pub mod command;
pub mod download;
pub mod error;
pub mod frames;
pub mod probe;

pub use command::{check_ffmpeg, check_ffprobe, check_ytdlp, FfmpegCommand, FfmpegRunner};
pub use download::{download_youtube, DownloadedVideo};
pub use error::{MediaError, MediaResult};
pub use frames::FrameExtractor;
pub use probe::{probe_video, VideoInfo};
