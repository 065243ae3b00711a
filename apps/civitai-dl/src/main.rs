//! CivitAI downloader CLI
//!
//! Resolves a CivitAI API download URL to its signed URL and true filename,
//! then streams the file to a local folder with a progress bar.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use downloader::{
    BarReporter, CivitaiSource, DownloadConfig, DownloadRequest, HttpClient,
    IntoProgressCallback, TokenStore,
};

#[derive(Parser, Debug)]
#[command(name = "civitai-dl", about = "CivitAI Downloader", version)]
struct Args {
    /// CivitAI download URL, eg: https://civitai.com/api/download/models/46846
    #[arg(long)]
    url: String,

    /// Output path, eg: /workspace/stable-diffusion-webui/models/Stable-diffusion
    #[arg(long, default_value = ".")]
    output: PathBuf,

    /// Overwrite existing file if it exists
    #[arg(long)]
    overwrite: bool,

    /// Inspect the actual model download URL and file name without downloading
    #[arg(long)]
    inspect: bool,

    /// Specify a proxy server, e.g. http://proxy.example.com:8080 or socks5h://localhost:1080
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
    dotenv::dotenv().ok();

    let store = TokenStore::new()?;
    let token = resolve_token(&store).await?;

    let config = DownloadConfig::default().with_proxy(args.proxy.as_deref());
    let http = HttpClient::new(&config)?;
    let source = CivitaiSource::new(&args.url, token);

    let target = source.resolve(&http).await?;

    if args.inspect {
        println!();
        println!("Actual Filename: {}", target.filename);
        println!("Actual Download URL: \n{}", target.download_url);
        return Ok(());
    }

    println!("Downloading {}:", target.filename);
    let request = DownloadRequest::new(&args.output).with_overwrite(args.overwrite);
    let reporter = BarReporter::new(&target.filename);
    let outcome = source
        .download(&http, &target, &request, Some(reporter.into_callback()))
        .await?;

    println!();
    println!("Download completed. File saved as: {}", target.filename);
    println!("Full Path: {}", outcome.path.display());
    Ok(())
}

/// Stored token, then environment, then interactive prompt (persisted for
/// future runs)
async fn resolve_token(store: &TokenStore) -> anyhow::Result<String> {
    println!("Loading API token from {} ...", store.path().display());
    if let Some(token) = store.load().await? {
        return Ok(token);
    }

    if let Ok(token) = std::env::var("CIVITAI_API_TOKEN") {
        let token = token.trim().to_string();
        if !token.is_empty() {
            return Ok(token);
        }
    }

    prompt_for_token(store).await
}

async fn prompt_for_token(store: &TokenStore) -> anyhow::Result<String> {
    println!(
        "CivitAI API token is needed to download models. You can get one here \
(https://civitai.com/user/account) at the API Keys section."
    );
    print!("Please enter your CivitAI API token: ");
    std::io::stdout().flush()?;

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read token from stdin")?;
    let token = line.trim().to_string();
    anyhow::ensure!(!token.is_empty(), "no API token provided");

    store.store(&token).await?;
    Ok(token)
}
