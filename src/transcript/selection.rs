use crate::provider::TranscriptTrack;

/// Language every transcript is resolved to
pub const TARGET_LANGUAGE: &str = "en";

/// English codes in preference order: the base code, then regional variants
pub const ENGLISH_VARIANTS: &[&str] = &[
    "en", "en-US", "en-GB", "en-CA", "en-AU", "en-NZ", "en-IE", "en-IN", "en-ZA",
];

fn is_english_variant(code: &str) -> bool {
    code.strip_prefix("en-").is_some_and(|region| !region.is_empty())
}

/// Pick the native English track, if any.
///
/// Codes are tried in [`ENGLISH_VARIANTS`] order, then any other `en-*` code in listing
/// order. Within one code the first listed track wins, which favors manual captions
/// because providers list them first.
pub fn select_native_track(tracks: &[TranscriptTrack]) -> Option<&TranscriptTrack> {
    ENGLISH_VARIANTS
        .iter()
        .find_map(|code| tracks.iter().find(|track| track.language_code == *code))
        .or_else(|| {
            tracks
                .iter()
                .find(|track| is_english_variant(&track.language_code))
        })
}

/// The single track used for the translation fallback
pub fn select_fallback_track(tracks: &[TranscriptTrack]) -> Option<&TranscriptTrack> {
    tracks.first()
}
