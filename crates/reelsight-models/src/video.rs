//! Source video metadata and URL helpers.

use serde::{Deserialize, Serialize};
use url::Url;

/// YouTube hostnames accepted by the fetcher.
const YOUTUBE_DOMAINS: [&str; 5] = [
    "youtube.com",
    "www.youtube.com",
    "m.youtube.com",
    "youtu.be",
    "youtube-nocookie.com",
];

/// Metadata about a fetched source video.
///
/// Duration quality varies by source and must be treated as approximate;
/// downstream consumers handle `None`/zero via degenerate-input defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMetadata {
    /// Video title reported by the source, if any.
    pub title: Option<String>,
    /// Duration in seconds, if the source reported one.
    pub duration_secs: Option<f64>,
    /// The canonical source URL.
    pub source_url: String,
}

/// Check whether the URL points at a YouTube video or Short.
pub fn is_youtube_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return false;
    };
    match parsed.host_str() {
        Some(host) => YOUTUBE_DOMAINS.contains(&host.to_ascii_lowercase().as_str()),
        None => false,
    }
}

/// Convert short `youtu.be` URLs to full `youtube.com/watch` URLs.
///
/// Preserves the timestamp (`t`) query parameter when present. URLs that are
/// not short links are returned unchanged.
pub fn normalize_youtube_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url.trim()) else {
        return url.to_string();
    };

    if parsed.host_str() != Some("youtu.be") {
        return url.to_string();
    }

    let video_id = parsed.path().trim_start_matches('/');
    if video_id.is_empty() {
        return url.to_string();
    }

    let time_param = parsed
        .query_pairs()
        .find(|(k, _)| k == "t")
        .map(|(_, v)| v.to_string());

    let mut normalized = Url::parse("https://www.youtube.com/watch").expect("static URL");
    normalized.query_pairs_mut().append_pair("v", video_id);
    if let Some(t) = time_param {
        normalized.query_pairs_mut().append_pair("t", &t);
    }
    normalized.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_youtube_url() {
        assert!(is_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://youtu.be/dQw4w9WgXcQ"));
        assert!(is_youtube_url("https://m.youtube.com/shorts/abc123def45"));
        assert!(!is_youtube_url("https://www.instagram.com/reel/xyz/"));
        assert!(!is_youtube_url("not a url"));
    }

    #[test]
    fn test_normalize_short_url() {
        let normalized = normalize_youtube_url("https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(normalized, "https://www.youtube.com/watch?v=dQw4w9WgXcQ");
    }

    #[test]
    fn test_normalize_preserves_timestamp() {
        let normalized = normalize_youtube_url("https://youtu.be/dQw4w9WgXcQ?t=42");
        assert!(normalized.contains("v=dQw4w9WgXcQ"));
        assert!(normalized.contains("t=42"));
    }

    #[test]
    fn test_normalize_leaves_full_urls_alone() {
        let full = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";
        assert_eq!(normalize_youtube_url(full), full);
    }
}
