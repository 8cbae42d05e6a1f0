use async_trait::async_trait;

pub mod youtube;

pub use youtube::YoutubeProvider;

use crate::resolver::VideoId;
use crate::transcript::TranscriptSegment;

/// One caption track offered for a video
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptTrack {
    /// Language code such as `en`, `en-GB` or `de`
    pub language_code: String,

    /// Human readable language name
    pub language: String,

    /// Whether the track was produced by speech recognition
    pub is_generated: bool,

    /// Languages this track can be machine translated into
    pub translation_languages: Vec<String>,

    /// Provider specific location of the caption payload
    pub base_url: String,
}

impl TranscriptTrack {
    pub fn is_translatable(&self) -> bool {
        !self.translation_languages.is_empty()
    }

    pub fn can_translate_to(&self, language: &str) -> bool {
        self.translation_languages.iter().any(|code| code == language)
    }
}

/// Failures reported by a captions provider
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("subtitles are disabled for this video")]
    TranscriptsDisabled,

    #[error("video is unavailable: {reason}")]
    VideoUnavailable { reason: String },

    #[error("track cannot be translated to {language}")]
    TranslationLanguageNotAvailable { language: String },

    #[error("too many requests, the provider answered with a captcha page")]
    TooManyRequests,

    #[error("unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error("invalid request header: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("invalid provider URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Source of caption tracks for a video
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CaptionsProvider: Send + Sync {
    /// List every caption track available for the video
    async fn list_tracks(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptTrack>, ProviderError>;

    /// Fetch the segments of a track in its own language
    async fn fetch_track(
        &self,
        track: &TranscriptTrack,
    ) -> Result<Vec<TranscriptSegment>, ProviderError>;

    /// Fetch the segments of a track machine translated into `language`
    async fn fetch_translated(
        &self,
        track: &TranscriptTrack,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, ProviderError>;
}
