use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use youtube_transcript_tool::cli::{self, Cli};
use youtube_transcript_tool::config::Config;
use youtube_transcript_tool::provider::YoutubeProvider;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing on stderr so stdout only carries the transcript
    let default_filter = if cli.verbose {
        "youtube_transcript_tool=debug"
    } else {
        "youtube_transcript_tool=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let provider = match build_provider(&cli) {
        Ok(provider) => provider,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            return ExitCode::FAILURE;
        }
    };

    let code = cli::execute(&cli.url, provider, &mut io::stdout(), &mut io::stderr()).await;

    ExitCode::from(code)
}

fn build_provider(cli: &Cli) -> Result<YoutubeProvider> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(base_url) = &cli.base_url {
        config.provider.base_url = base_url.clone();
        config.validate()?;
    }

    YoutubeProvider::new(&config.provider).context("Failed to create captions provider")
}
