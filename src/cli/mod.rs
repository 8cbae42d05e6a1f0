use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

use crate::output::print_to_console;
use crate::provider::CaptionsProvider;
use crate::transcript::TranscriptPipeline;

#[derive(Parser, Debug)]
#[command(
    name = "youtube-transcript",
    about = "Fetch the English transcript of a YouTube video",
    version,
    long_about = "Prints the English captions of a YouTube video as plain text, one caption \
                  per line. When a video has no English track, another track is machine \
                  translated to English."
)]
pub struct Cli {
    /// YouTube video URL (watch, youtu.be or embed link)
    #[arg(value_name = "URL")]
    pub url: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file (YAML)
    #[arg(short, long, value_name = "FILE", env = "YT_TRANSCRIPT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the captions provider base URL
    #[arg(long, value_name = "URL", env = "YT_TRANSCRIPT_BASE_URL", hide = true)]
    pub base_url: Option<String>,
}

/// Run the pipeline for one URL and report the outcome.
///
/// Returns the process exit code: 0 with the transcript on `out`, 1 with a single
/// `Error: ...` line on `err`.
pub async fn execute<P: CaptionsProvider>(
    url: &str,
    provider: P,
    out: &mut impl Write,
    err: &mut impl Write,
) -> u8 {
    let pipeline = TranscriptPipeline::new(provider);

    match pipeline.transcript_from_url(url).await {
        Ok(transcript) => match print_to_console(&transcript, out) {
            Ok(()) => 0,
            Err(e) => {
                let _ = writeln!(err, "Error: failed to write transcript: {}", e);
                1
            }
        },
        Err(e) => {
            tracing::debug!("Transcript request failed: {:?}", e);
            let _ = writeln!(err, "Error: {}", e);
            1
        }
    }
}
