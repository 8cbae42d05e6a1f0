use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Recognized URL shapes, tried in order: watch, short link, embed.
/// Each pattern is anchored at the start of the input; anything after the id is ignored.
static URL_PATTERNS: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        compile(r"^(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]+)"),
        compile(r"^(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]+)"),
        compile(r"^(?:https?://)?(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]+)"),
    ]
});

fn compile(pattern: &str) -> Regex {
    // Patterns are literals above; a failure here is a programming error.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid URL pattern {pattern}: {e}"))
}

/// Identifier of a YouTube video as understood by the captions provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoId(String);

impl VideoId {
    /// Accept a bare id made of letters, digits, `-` and `_`
    pub fn parse(raw: &str) -> Option<Self> {
        let valid = !raw.is_empty()
            && raw
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

        valid.then(|| Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Check if the string is one of the supported YouTube URL shapes
pub fn is_valid_url(url: &str) -> bool {
    URL_PATTERNS.iter().any(|pattern| pattern.is_match(url))
}

/// Extract the video id from a YouTube URL
pub fn extract_video_id(url: &str) -> Option<VideoId> {
    if url.is_empty() {
        return None;
    }

    URL_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|id| VideoId(id.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(url: &str) -> Option<String> {
        extract_video_id(url).map(|id| id.to_string())
    }

    #[test]
    fn test_watch_urls() {
        for url in [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "http://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtube.com/watch?v=dQw4w9WgXcQ",
            "www.youtube.com/watch?v=dQw4w9WgXcQ",
            "youtube.com/watch?v=dQw4w9WgXcQ",
        ] {
            assert!(is_valid_url(url), "{url}");
            assert_eq!(id(url).as_deref(), Some("dQw4w9WgXcQ"), "{url}");
        }
    }

    #[test]
    fn test_short_urls() {
        for url in [
            "https://youtu.be/abc-DEF_123",
            "http://youtu.be/abc-DEF_123",
            "https://www.youtu.be/abc-DEF_123",
            "youtu.be/abc-DEF_123",
        ] {
            assert!(is_valid_url(url), "{url}");
            assert_eq!(id(url).as_deref(), Some("abc-DEF_123"), "{url}");
        }
    }

    #[test]
    fn test_embed_urls() {
        for url in [
            "https://www.youtube.com/embed/xyz789",
            "https://youtube.com/embed/xyz789",
            "youtube.com/embed/xyz789",
        ] {
            assert!(is_valid_url(url), "{url}");
            assert_eq!(id(url).as_deref(), Some("xyz789"), "{url}");
        }
    }

    #[test]
    fn test_trailing_parameters_are_ignored() {
        assert_eq!(
            id("https://www.youtube.com/watch?v=abc123&t=120s").as_deref(),
            Some("abc123")
        );
        assert_eq!(id("https://youtu.be/abc123?si=share").as_deref(), Some("abc123"));
    }

    #[test]
    fn test_invalid_urls() {
        for url in [
            "",
            "not a url",
            "https://example.com/notavideo",
            "https://www.youtube.com/watch?list=PL123",
            "https://vimeo.com/12345",
            "see https://youtu.be/abc123",
        ] {
            assert!(!is_valid_url(url), "{url}");
            assert_eq!(id(url), None, "{url}");
        }
    }

    #[test]
    fn test_video_id_parse() {
        assert_eq!(VideoId::parse("abc_-1").map(|v| v.to_string()).as_deref(), Some("abc_-1"));
        assert!(VideoId::parse("").is_none());
        assert!(VideoId::parse("abc 123").is_none());
        assert!(VideoId::parse("abc/123").is_none());
    }
}
