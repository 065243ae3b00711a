//! Progress tracking and reporting for download operations

use std::sync::Arc;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress callback for download operations
pub type ProgressCallback = Arc<dyn Fn(ProgressEvent) + Send + Sync>;

/// Events emitted during download operations
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    DownloadStarted {
        url: String,
        total_size: Option<u64>,
    },
    DownloadProgress {
        url: String,
        downloaded: u64,
        total: Option<u64>,
        speed_bps: f64,
    },
    DownloadComplete {
        url: String,
        final_size: u64,
    },
    Warning {
        url: String,
        message: String,
    },
    Error {
        url: String,
        error: String,
    },
}

/// Trait for progress reporting with more granular control
pub trait ProgressReporter: Send + Sync {
    fn on_download_started(&self, _url: &str, _total_size: Option<u64>) {}
    fn on_download_progress(&self, _url: &str, _downloaded: u64, _total: Option<u64>, _speed_bps: f64) {}
    fn on_download_complete(&self, _url: &str, _final_size: u64) {}
    fn on_warning(&self, _url: &str, _message: &str) {}
    fn on_error(&self, _url: &str, _error: &str) {}
}

/// Extension trait to convert ProgressReporter to ProgressCallback
pub trait IntoProgressCallback {
    fn into_callback(self) -> ProgressCallback;
}

impl<T: ProgressReporter + 'static> IntoProgressCallback for T {
    fn into_callback(self) -> ProgressCallback {
        Arc::new(move |event| match event {
            ProgressEvent::DownloadStarted { url, total_size } => {
                self.on_download_started(&url, total_size);
            }
            ProgressEvent::DownloadProgress { url, downloaded, total, speed_bps } => {
                self.on_download_progress(&url, downloaded, total, speed_bps);
            }
            ProgressEvent::DownloadComplete { url, final_size } => {
                self.on_download_complete(&url, final_size);
            }
            ProgressEvent::Warning { url, message } => {
                self.on_warning(&url, &message);
            }
            ProgressEvent::Error { url, error } => {
                self.on_error(&url, &error);
            }
        })
    }
}

/// Progress reporter that discards all events
#[derive(Debug, Default)]
pub struct NullProgressReporter;

impl ProgressReporter for NullProgressReporter {}

/// Simple console progress reporter implementation
#[derive(Debug, Default)]
pub struct ConsoleProgressReporter {
    pub verbose: bool,
}

impl ConsoleProgressReporter {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleProgressReporter {
    fn on_download_started(&self, url: &str, total_size: Option<u64>) {
        if self.verbose {
            match total_size {
                Some(size) => println!("Starting download: {} ({} bytes)", url, size),
                None => println!("Starting download: {}", url),
            }
        }
    }

    fn on_download_progress(&self, url: &str, downloaded: u64, total: Option<u64>, speed_bps: f64) {
        if self.verbose {
            let speed_mb = speed_bps / 1_000_000.0;
            match total {
                Some(total) => {
                    let percent = (downloaded as f64 / total as f64) * 100.0;
                    println!("{}: {:.1}% ({}/{} bytes, {:.1} MB/s)",
                        url, percent, downloaded, total, speed_mb);
                }
                None => {
                    println!("{}: {} bytes downloaded ({:.1} MB/s)", url, downloaded, speed_mb);
                }
            }
        }
    }

    fn on_download_complete(&self, url: &str, final_size: u64) {
        println!("Download complete: {} ({} bytes)", url, final_size);
    }

    fn on_warning(&self, _url: &str, message: &str) {
        eprintln!("Warning: {}", message);
    }

    fn on_error(&self, url: &str, error: &str) {
        eprintln!("Error downloading {}: {}", url, error);
    }
}

/// Terminal progress bar reporter backed by indicatif
///
/// The bar length is set lazily from the DownloadStarted event; when the
/// server declares no content length the bar degrades to a byte spinner.
pub struct BarReporter {
    bar: ProgressBar,
}

impl BarReporter {
    pub fn new(name: &str) -> Self {
        let bar = ProgressBar::hidden();
        bar.set_message(name.to_string());
        Self { bar }
    }

    fn sized_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.cyan} [{bar:40.cyan/blue}] {bytes}/{total_bytes} @ {bytes_per_sec} - {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-")
    }

    fn unsized_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {bytes} @ {bytes_per_sec} - {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}

impl ProgressReporter for BarReporter {
    fn on_download_started(&self, _url: &str, total_size: Option<u64>) {
        match total_size {
            Some(size) if size > 0 => {
                self.bar.set_style(Self::sized_style());
                self.bar.set_length(size);
            }
            _ => self.bar.set_style(Self::unsized_style()),
        }
        self.bar.set_draw_target(indicatif::ProgressDrawTarget::stderr());
    }

    fn on_download_progress(&self, _url: &str, downloaded: u64, _total: Option<u64>, _speed_bps: f64) {
        self.bar.set_position(downloaded);
    }

    fn on_download_complete(&self, _url: &str, final_size: u64) {
        self.bar.set_position(final_size);
        self.bar.finish();
    }

    fn on_warning(&self, _url: &str, message: &str) {
        self.bar.println(format!("Warning: {}", message));
    }

    fn on_error(&self, _url: &str, error: &str) {
        self.bar.abandon_with_message(error.to_string());
    }
}
