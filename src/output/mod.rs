use std::io::{self, Write};

use crate::transcript::TranscriptSegment;

/// Render segments as plain text, one trimmed non-empty segment per line
pub fn format_transcript(segments: &[TranscriptSegment]) -> String {
    segments
        .iter()
        .map(|segment| segment.text.trim())
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Print a formatted transcript followed by a newline
pub fn print_to_console(transcript: &str, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{}", transcript)?;
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segment(text: &str) -> TranscriptSegment {
        TranscriptSegment {
            text: text.to_string(),
            start: 0.0,
            duration: 1.0,
        }
    }

    #[test]
    fn test_trims_and_drops_empty_segments() {
        let segments = vec![segment("  Hello "), segment(""), segment("world")];
        assert_eq!(format_transcript(&segments), "Hello\nworld");
    }

    #[test]
    fn test_whitespace_only_segment_is_dropped() {
        let segments = vec![segment("\n \t"), segment("only line"), segment("   ")];
        assert_eq!(format_transcript(&segments), "only line");
    }

    #[test]
    fn test_segments_are_never_merged_or_reordered() {
        let segments = vec![segment("c"), segment("a"), segment("b")];
        assert_eq!(format_transcript(&segments), "c\na\nb");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_transcript(&[]), "");
    }

    #[test]
    fn test_print_to_console() {
        let mut out = Vec::new();
        print_to_console("Hello\nworld", &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello\nworld\n");
    }
}
