//! YouTube Transcript Tool - print the English transcript of a YouTube video
//!
//! This library resolves a video id from a YouTube URL, retrieves the best available
//! English caption track (translating another track when no English one exists) and
//! renders it as plain text, one caption segment per line.

pub mod cli;
pub mod config;
pub mod output;
pub mod provider;
pub mod resolver;
pub mod transcript;
pub mod utils;

pub use cli::Cli;
pub use config::Config;
pub use provider::{CaptionsProvider, ProviderError, TranscriptTrack};
pub use resolver::{extract_video_id, is_valid_url, VideoId};
pub use transcript::{TranscriptFetcher, TranscriptPipeline, TranscriptSegment};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Classified failures surfaced to the user. The `Display` text is the message printed
/// after `Error: ` on stderr.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TranscriptError {
    #[error("Invalid YouTube URL format.")]
    InvalidUrl,

    #[error("Could not extract video ID from URL.")]
    VideoIdNotFound,

    #[error("Transcripts are disabled for this video.")]
    TranscriptsDisabled,

    #[error("No English transcript found for this video.")]
    NoTranscriptFound,

    #[error("The video is not available or requires authentication.")]
    VideoUnavailable,

    #[error("No transcripts are available for this video.")]
    NoTranscriptAvailable,

    #[error("English translation is not available for this video.")]
    TranslationLanguageNotAvailable,

    #[error("Failed to fetch transcript: {0}")]
    Acquisition(String),
}
