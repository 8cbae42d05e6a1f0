use super::selection::{select_fallback_track, select_native_track, TARGET_LANGUAGE};
use super::TranscriptSegment;
use crate::provider::{CaptionsProvider, ProviderError};
use crate::resolver::VideoId;
use crate::utils::format_duration;
use crate::{Result, TranscriptError};

/// Transcript acquisition against a captions provider
pub struct TranscriptFetcher<P> {
    provider: P,
}

impl<P: CaptionsProvider> TranscriptFetcher<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Fetch the English transcript of a video.
    ///
    /// A native English track is used when one exists. Otherwise the first listed track
    /// is translated to English; no other track is tried if that fails.
    pub async fn get_transcript(&self, video_id: &VideoId) -> Result<Vec<TranscriptSegment>> {
        tracing::debug!("Listing transcript tracks for video {}", video_id);

        let tracks = self
            .provider
            .list_tracks(video_id)
            .await
            .map_err(classify)?;

        if tracks.is_empty() {
            return Err(TranscriptError::NoTranscriptAvailable);
        }

        let segments = match select_native_track(&tracks) {
            Some(track) => {
                tracing::debug!(
                    "Using {} track ({}, generated: {})",
                    track.language_code,
                    track.language,
                    track.is_generated
                );
                self.provider.fetch_track(track).await.map_err(classify)?
            }
            None => {
                let track =
                    select_fallback_track(&tracks).ok_or(TranscriptError::NoTranscriptAvailable)?;

                if !track.can_translate_to(TARGET_LANGUAGE) {
                    tracing::debug!(
                        "Fallback track {} cannot be translated to {} (translatable: {})",
                        track.language_code,
                        TARGET_LANGUAGE,
                        track.is_translatable()
                    );
                    return Err(TranscriptError::TranslationLanguageNotAvailable);
                }

                tracing::debug!(
                    "No English track, translating {} track to {}",
                    track.language_code,
                    TARGET_LANGUAGE
                );
                self.provider
                    .fetch_translated(track, TARGET_LANGUAGE)
                    .await
                    .map_err(classify)?
            }
        };

        if segments.is_empty() {
            return Err(TranscriptError::NoTranscriptFound);
        }

        let covered = segments
            .last()
            .map(|last| last.start + last.duration)
            .unwrap_or_default();
        tracing::info!(
            "Fetched {} segments covering {}",
            segments.len(),
            format_duration(covered)
        );

        Ok(segments)
    }
}

/// Map provider failures onto the user facing taxonomy
fn classify(error: ProviderError) -> TranscriptError {
    match error {
        ProviderError::TranscriptsDisabled => TranscriptError::TranscriptsDisabled,
        ProviderError::VideoUnavailable { reason } => {
            tracing::debug!("Video unavailable: {}", reason);
            TranscriptError::VideoUnavailable
        }
        ProviderError::TranslationLanguageNotAvailable { .. } => {
            TranscriptError::TranslationLanguageNotAvailable
        }
        other => TranscriptError::Acquisition(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{MockCaptionsProvider, TranscriptTrack};

    fn video() -> VideoId {
        VideoId::parse("abc123").unwrap()
    }

    fn track(code: &str, translations: &[&str]) -> TranscriptTrack {
        TranscriptTrack {
            language_code: code.to_string(),
            language: code.to_string(),
            is_generated: false,
            translation_languages: translations.iter().map(|s| s.to_string()).collect(),
            base_url: format!("/api/timedtext?v=abc123&lang={code}"),
        }
    }

    fn segment(text: &str, start: f64) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start,
            duration: 1.5,
        }
    }

    #[tokio::test]
    async fn test_native_track_is_fetched_verbatim() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .times(1)
            .returning(|_| Ok(vec![track("de", &["en"]), track("en", &["de"])]));
        provider
            .expect_fetch_track()
            .withf(|track| track.language_code == "en")
            .times(1)
            .returning(|_| Ok(vec![segment("first", 0.0), segment("second", 1.5)]));
        provider.expect_fetch_translated().never();

        let fetcher = TranscriptFetcher::new(provider);
        let segments = fetcher.get_transcript(&video()).await.unwrap();

        assert_eq!(segments, vec![segment("first", 0.0), segment("second", 1.5)]);
    }

    #[tokio::test]
    async fn test_regional_track_is_native() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Ok(vec![track("fr", &["en"]), track("en-GB", &[])]));
        provider
            .expect_fetch_track()
            .withf(|track| track.language_code == "en-GB")
            .times(1)
            .returning(|_| Ok(vec![segment("cheers", 0.0)]));
        provider.expect_fetch_translated().never();

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await.unwrap(),
            vec![segment("cheers", 0.0)]
        );
    }

    #[tokio::test]
    async fn test_translates_first_track_when_no_english() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Ok(vec![track("de", &["en", "fr"]), track("fr", &["en"])]));
        provider.expect_fetch_track().never();
        provider
            .expect_fetch_translated()
            .withf(|track, language| track.language_code == "de" && language == "en")
            .times(1)
            .returning(|_, _| Ok(vec![segment("hello", 0.0)]));

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await.unwrap(),
            vec![segment("hello", 0.0)]
        );
    }

    #[tokio::test]
    async fn test_untranslatable_fallback() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Ok(vec![track("de", &[]), track("fr", &["en"])]));
        provider.expect_fetch_track().never();
        provider.expect_fetch_translated().never();

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await,
            Err(TranscriptError::TranslationLanguageNotAvailable)
        );
    }

    #[tokio::test]
    async fn test_failed_translation_is_not_retried_on_other_tracks() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Ok(vec![track("de", &["en"]), track("fr", &["en"])]));
        provider
            .expect_fetch_translated()
            .times(1)
            .returning(|_, _| Err(ProviderError::InvalidResponse("boom".to_string())));

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await,
            Err(TranscriptError::Acquisition(
                "unexpected provider response: boom".to_string()
            ))
        );
    }

    #[tokio::test]
    async fn test_zero_tracks() {
        let mut provider = MockCaptionsProvider::new();
        provider.expect_list_tracks().returning(|_| Ok(Vec::new()));
        provider.expect_fetch_track().never();
        provider.expect_fetch_translated().never();

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await,
            Err(TranscriptError::NoTranscriptAvailable)
        );
    }

    #[tokio::test]
    async fn test_disabled_transcripts_skip_fallback() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Err(ProviderError::TranscriptsDisabled));
        provider.expect_fetch_track().never();
        provider.expect_fetch_translated().never();

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await,
            Err(TranscriptError::TranscriptsDisabled)
        );
    }

    #[tokio::test]
    async fn test_unavailable_video() {
        let mut provider = MockCaptionsProvider::new();
        provider.expect_list_tracks().returning(|_| {
            Err(ProviderError::VideoUnavailable {
                reason: "Private video".to_string(),
            })
        });

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await,
            Err(TranscriptError::VideoUnavailable)
        );
    }

    #[tokio::test]
    async fn test_unavailable_during_fetch() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Ok(vec![track("en", &[])]));
        provider.expect_fetch_track().returning(|_| {
            Err(ProviderError::VideoUnavailable {
                reason: "Sign in required".to_string(),
            })
        });

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await,
            Err(TranscriptError::VideoUnavailable)
        );
    }

    #[tokio::test]
    async fn test_empty_track_payload() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Ok(vec![track("en", &[])]));
        provider.expect_fetch_track().returning(|_| Ok(Vec::new()));

        let fetcher = TranscriptFetcher::new(provider);
        assert_eq!(
            fetcher.get_transcript(&video()).await,
            Err(TranscriptError::NoTranscriptFound)
        );
    }

    #[tokio::test]
    async fn test_rate_limited_is_generic_failure() {
        let mut provider = MockCaptionsProvider::new();
        provider
            .expect_list_tracks()
            .returning(|_| Err(ProviderError::TooManyRequests));

        let fetcher = TranscriptFetcher::new(provider);
        let error = fetcher.get_transcript(&video()).await.unwrap_err();
        assert!(matches!(error, TranscriptError::Acquisition(_)));
        assert!(error.to_string().starts_with("Failed to fetch transcript: too many requests"));
    }
}
