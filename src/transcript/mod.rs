use crate::output::format_transcript;
use crate::provider::CaptionsProvider;
use crate::resolver::{extract_video_id, is_valid_url};
use crate::{Result, TranscriptError};

pub mod fetcher;
pub mod selection;

pub use fetcher::TranscriptFetcher;

/// Individual transcript segment with timing
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    /// Spoken text
    pub text: String,

    /// Start time in seconds
    pub start: f64,

    /// Duration in seconds
    pub duration: f64,
}

/// URL in, plain text transcript out
pub struct TranscriptPipeline<P> {
    fetcher: TranscriptFetcher<P>,
}

impl<P: CaptionsProvider> TranscriptPipeline<P> {
    pub fn new(provider: P) -> Self {
        Self {
            fetcher: TranscriptFetcher::new(provider),
        }
    }

    /// Resolve the video, fetch its English transcript and render it as text.
    ///
    /// The URL is checked before the provider is contacted.
    pub async fn transcript_from_url(&self, url: &str) -> Result<String> {
        if !is_valid_url(url) {
            return Err(TranscriptError::InvalidUrl);
        }

        let video_id = extract_video_id(url).ok_or(TranscriptError::VideoIdNotFound)?;
        tracing::info!("Fetching transcript for video {}", video_id);

        let segments = self.fetcher.get_transcript(&video_id).await?;
        Ok(format_transcript(&segments))
    }
}
