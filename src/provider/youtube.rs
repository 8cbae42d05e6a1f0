use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE};
use reqwest::Client;
use serde::Deserialize;
use std::sync::LazyLock;
use std::time::Duration;
use url::Url;

use super::{CaptionsProvider, ProviderError, TranscriptTrack};
use crate::config::ProviderConfig;
use crate::resolver::VideoId;
use crate::transcript::TranscriptSegment;

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";
const RECAPTCHA_MARKER: &str = "class=\"g-recaptcha\"";

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>").unwrap_or_else(|e| panic!("invalid markup pattern: {e}"))
});

/// Player response embedded in the watch page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    playability_status: Option<PlayabilityStatus>,
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: String,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TracklistRenderer {
    caption_tracks: Vec<CaptionTrack>,
    translation_languages: Vec<TranslationLanguage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    name: Option<Label>,
    kind: Option<String>,
    #[serde(default)]
    is_translatable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationLanguage {
    language_code: String,
}

/// Display text in either of the two shapes YouTube uses
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Label {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<LabelRun>,
}

#[derive(Debug, Deserialize)]
struct LabelRun {
    text: String,
}

impl Label {
    fn text(&self) -> Option<String> {
        self.simple_text
            .clone()
            .or_else(|| self.runs.first().map(|run| run.text.clone()))
    }
}

/// Captions provider backed by the public YouTube watch page and timedtext endpoint
pub struct YoutubeProvider {
    client: Client,
    base_url: Url,
}

impl YoutubeProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_str(&config.accept_language)?,
        );

        let mut builder = Client::builder()
            .user_agent(config.user_agent.as_str())
            .default_headers(headers);

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            base_url: Url::parse(&config.base_url)?,
        })
    }

    fn watch_url(&self, video_id: &VideoId) -> Result<Url, ProviderError> {
        let mut url = self.base_url.join("/watch")?;
        url.query_pairs_mut().append_pair("v", video_id.as_str());
        Ok(url)
    }

    /// Resolve a track location, dropping the srv3 format so the classic XML is served
    fn track_url(&self, track: &TranscriptTrack) -> Result<Url, ProviderError> {
        let location = track.base_url.replace("&fmt=srv3", "");
        Ok(self.base_url.join(&location)?)
    }

    async fn get_text(&self, url: Url) -> Result<String, ProviderError> {
        tracing::debug!("GET {}", url);

        let response = self.client.get(url).send().await?.error_for_status()?;
        Ok(response.text().await?)
    }

    async fn fetch_segments(&self, url: Url) -> Result<Vec<TranscriptSegment>, ProviderError> {
        let xml = self.get_text(url).await?;
        parse_timedtext(&xml)
    }
}

#[async_trait]
impl CaptionsProvider for YoutubeProvider {
    async fn list_tracks(
        &self,
        video_id: &VideoId,
    ) -> Result<Vec<TranscriptTrack>, ProviderError> {
        let html = self.get_text(self.watch_url(video_id)?).await?;
        let player = extract_player_response(&html)?;
        tracks_from_player_response(player)
    }

    async fn fetch_track(
        &self,
        track: &TranscriptTrack,
    ) -> Result<Vec<TranscriptSegment>, ProviderError> {
        self.fetch_segments(self.track_url(track)?).await
    }

    async fn fetch_translated(
        &self,
        track: &TranscriptTrack,
        language: &str,
    ) -> Result<Vec<TranscriptSegment>, ProviderError> {
        if !track.can_translate_to(language) {
            return Err(ProviderError::TranslationLanguageNotAvailable {
                language: language.to_string(),
            });
        }

        let mut url = self.track_url(track)?;
        url.query_pairs_mut().append_pair("tlang", language);
        self.fetch_segments(url).await
    }
}

/// Locate and decode the player response JSON inside a watch page
fn extract_player_response(html: &str) -> Result<PlayerResponse, ProviderError> {
    let Some(start) = html.find(PLAYER_RESPONSE_MARKER) else {
        if html.contains(RECAPTCHA_MARKER) {
            return Err(ProviderError::TooManyRequests);
        }
        return Err(ProviderError::InvalidResponse(
            "player response not found in watch page".to_string(),
        ));
    };

    // Only the first JSON value matters; the rest of the script follows it.
    let tail = &html[start + PLAYER_RESPONSE_MARKER.len()..];
    serde_json::Deserializer::from_str(tail)
        .into_iter::<PlayerResponse>()
        .next()
        .ok_or_else(|| ProviderError::InvalidResponse("empty player response".to_string()))?
        .map_err(|e| ProviderError::InvalidResponse(format!("malformed player response: {e}")))
}

fn tracks_from_player_response(
    player: PlayerResponse,
) -> Result<Vec<TranscriptTrack>, ProviderError> {
    if let Some(status) = player.playability_status {
        if status.status != "OK" {
            return Err(ProviderError::VideoUnavailable {
                reason: status.reason.unwrap_or(status.status),
            });
        }
    }

    let renderer = player
        .captions
        .and_then(|captions| captions.player_captions_tracklist_renderer)
        .ok_or(ProviderError::TranscriptsDisabled)?;

    let translation_languages: Vec<String> = renderer
        .translation_languages
        .into_iter()
        .map(|language| language.language_code)
        .collect();

    let (mut manual, generated): (Vec<_>, Vec<_>) = renderer
        .caption_tracks
        .into_iter()
        .map(|track| {
            let language = track
                .name
                .as_ref()
                .and_then(Label::text)
                .unwrap_or_else(|| track.language_code.clone());

            TranscriptTrack {
                is_generated: track.kind.as_deref() == Some("asr"),
                translation_languages: if track.is_translatable {
                    translation_languages.clone()
                } else {
                    Vec::new()
                },
                language,
                language_code: track.language_code,
                base_url: track.base_url,
            }
        })
        .partition(|track| !track.is_generated);

    manual.extend(generated);
    Ok(manual)
}

/// Parse a timedtext XML document into segments
fn parse_timedtext(xml: &str) -> Result<Vec<TranscriptSegment>, ProviderError> {
    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current: Option<(f64, f64, String)> = None;

    loop {
        match reader.read_event().map_err(invalid_payload)? {
            Event::Start(element) if element.name().as_ref() == b"text" => {
                let mut start = 0.0;
                let mut duration = 0.0;

                for attribute in element.attributes() {
                    let attribute = attribute.map_err(invalid_payload)?;
                    let value = attribute.unescape_value().map_err(invalid_payload)?;
                    match attribute.key.as_ref() {
                        b"start" => start = parse_seconds(&value)?,
                        b"dur" => duration = parse_seconds(&value)?,
                        _ => {}
                    }
                }

                current = Some((start, duration, String::new()));
            }
            // Caption bodies use HTML entities, which the XML entity table does not cover
            Event::Text(text) => {
                if let Some((_, _, buffer)) = current.as_mut() {
                    let raw = String::from_utf8_lossy(&text);
                    buffer.push_str(&html_escape::decode_html_entities(&raw));
                }
            }
            Event::CData(data) => {
                if let Some((_, _, buffer)) = current.as_mut() {
                    buffer.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::End(element) if element.name().as_ref() == b"text" => {
                if let Some((start, duration, raw)) = current.take() {
                    segments.push(TranscriptSegment {
                        text: clean_caption_text(&raw),
                        start,
                        duration,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(segments)
}

fn invalid_payload(e: impl std::fmt::Display) -> ProviderError {
    ProviderError::InvalidResponse(format!("malformed caption payload: {e}"))
}

fn parse_seconds(value: &str) -> Result<f64, ProviderError> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|seconds| seconds.is_finite() && *seconds >= 0.0)
        .ok_or_else(|| {
            ProviderError::InvalidResponse(format!("invalid caption timestamp: {value}"))
        })
}

/// Caption text arrives HTML-escaped inside the XML and may carry inline markup
fn clean_caption_text(raw: &str) -> String {
    let decoded = html_escape::decode_html_entities(raw);
    MARKUP_TAG.replace_all(&decoded, "").into_owned()
}
