//! URL validation utilities.

use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;
use url::Url;

/// Errors returned by URL validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlError {
    #[error("'{0}' is not a valid YouTube URL")]
    InvalidYoutubeUrl(String),

    #[error("'{0}' is not a well-formed URL")]
    Malformed(String),
}

fn youtube_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"^(https?://)?(www\.)?(youtube|youtu|youtube-nocookie)\.(com|be)/(watch\?v=|embed/|v/|.+\?v=)?([^&=%\?]{11})",
        )
        .expect("static YouTube pattern is valid")
    })
}

/// Validate a YouTube URL and return its 11-character video ID.
///
/// Accepts `youtube.com`, `youtu.be` and `youtube-nocookie.com` links, with
/// or without a scheme.
pub fn validate_youtube_url(url: &str) -> Result<String, UrlError> {
    let url = url.trim();

    if url.starts_with("http://") || url.starts_with("https://") {
        Url::parse(url).map_err(|_| UrlError::Malformed(url.to_string()))?;
    }

    youtube_pattern()
        .captures(url)
        .and_then(|caps| caps.get(6))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| UrlError::InvalidYoutubeUrl(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        assert_eq!(
            validate_youtube_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_short_and_embed_urls() {
        assert_eq!(validate_youtube_url("youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            validate_youtube_url("https://www.youtube-nocookie.com/embed/dQw4w9WgXcQ").unwrap(),
            "dQw4w9WgXcQ"
        );
    }

    #[test]
    fn test_rejects_other_hosts() {
        assert_eq!(
            validate_youtube_url("https://vimeo.com/123456789"),
            Err(UrlError::InvalidYoutubeUrl("https://vimeo.com/123456789".to_string()))
        );
        assert!(validate_youtube_url("https://youtube.com/watch?v=short").is_err());
    }
}
