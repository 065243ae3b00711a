//! Hugging Face file downloader CLI
//!
//! Streams a fully-known URL to a local folder, deriving the filename from
//! the URL path. No authentication, no redirect resolution.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use downloader::{
    BarReporter, DirectSource, DownloadConfig, DownloadRequest, HttpClient,
    IntoProgressCallback,
};

#[derive(Parser, Debug)]
#[command(
    name = "hf-dl",
    about = "Download huggingface model from URL to local folder",
    version
)]
struct Args {
    /// URL of the file to download
    #[arg(long)]
    url: String,

    /// Path to the output folder
    #[arg(long)]
    output: PathBuf,

    /// Overwrite existing file if it exists
    #[arg(long)]
    overwrite: bool,

    /// Http proxy, set to use proxy to download files. Supports socks5
    /// proxies; use socks5h:// to enable host resolving with socks5 proxy
    #[arg(long)]
    proxy: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    if let Err(e) = run(args).await {
        eprintln!("\nERROR: {e:#}");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = DownloadConfig::default().with_proxy(args.proxy.as_deref());
    let http = HttpClient::new(&config)?;
    let source = DirectSource::new(&args.url);

    let filename = source.filename()?;
    println!("Downloading {}:", filename);

    let request = DownloadRequest::new(&args.output).with_overwrite(args.overwrite);
    let reporter = BarReporter::new(&filename);
    let outcome = source
        .download(&http, &request, Some(reporter.into_callback()))
        .await?;

    if let Some((expected, actual)) = outcome.size_mismatch() {
        // soft integrity check: the file is kept, the discrepancy reported
        eprintln!(
            "Error: something went wrong during the download \
(expected {expected} bytes, got {actual})."
        );
    } else {
        println!("File downloaded successfully: {}", outcome.path.display());
    }
    Ok(())
}
