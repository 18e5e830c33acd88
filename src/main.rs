mod config;
mod download;
mod errors;
mod fetch;
mod listing;
mod patterns;
mod session;

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, Resolution};
use crate::download::Downloader;
use crate::fetch::HttpFetcher;
use crate::session::Session;

/// Download WWDC session videos and slides.
#[derive(Debug, Parser)]
#[command(name = "wwdc-dl", version, about = "Download WWDC session videos and slides")]
struct Cli {
    /// Comma-separated session ids to download
    #[arg(short = 's', value_name = "IDS", value_delimiter = ',')]
    sessions: Vec<String>,

    /// Download every session listed for the year
    #[arg(short = 'a')]
    all: bool,

    /// Conference year
    #[arg(short = 'y', value_name = "YEAR", default_value = "2017")]
    year: String,

    /// Video resolution for direct downloads
    #[arg(short = 'f', value_enum, default_value_t = Resolution::Sd)]
    format: Resolution,

    /// Skip the slide PDF
    #[arg(long)]
    nopdf: bool,

    /// Download only the slide PDF
    #[arg(long)]
    pdfonly: bool,

    /// Directory to save into (defaults to the user's Documents)
    #[arg(short = 'd', value_name = "DIR")]
    directory: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let config = Config {
        year: cli.year,
        resolution: cli.format,
        wants_pdf: !cli.nopdf,
        pdf_only: cli.pdfonly,
        output_dir: cli.directory,
    };

    let fetcher = HttpFetcher;
    let downloader = Downloader::new(config.output_dir.clone());

    // An explicit -s list wins over -a, as it always has.
    let session_ids = if !cli.sessions.is_empty() {
        log::info!("Downloading for sessions: {:?}", cli.sessions);
        cli.sessions
    } else if cli.all {
        listing::list_sessions(&fetcher, &config.year).await?
    } else {
        log::warn!("Nothing to do; pass -s <ids> or -a");
        return Ok(());
    };

    for id in &session_ids {
        log::info!("Processing for Session {}..", id);
        let session = match Session::try_new(&fetcher, &config.year, id).await {
            Ok(session) => session,
            Err(error) => {
                log::warn!("Skipping session {}: {:#}", id, error);
                continue;
            }
        };
        if let Err(error) = session.download(&fetcher, &downloader, &config).await {
            log::warn!("Session {} failed: {:#}", id, error);
        }
    }
    Ok(())
}
