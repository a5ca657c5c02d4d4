//! CLI for grab.

mod commands;

use anyhow::Result;
use clap::Parser;
use grab_core::config::{self, GrabConfig};
use grab_core::ExitPolicy;
use std::path::PathBuf;

use commands::run_fetch;

/// Download files over HTTP, one after another, with a live progress line.
#[derive(Debug, Parser)]
#[command(name = "grab", version)]
#[command(about = "grab: sequential HTTP downloader with a progress bar", long_about = None)]
pub struct Cli {
    /// HTTP/HTTPS URLs to download, in order.
    #[arg(value_name = "URL")]
    pub urls: Vec<String>,

    /// Directory to save files in (default: current directory).
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Exit with status 1 if any download failed.
    #[arg(long)]
    pub fail_on_error: bool,

    /// Download bodies whose size the server does not declare.
    #[arg(long)]
    pub allow_unknown_length: bool,

    /// Bytes per body read (default 4068).
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,
}

impl Cli {
    /// Overlays command-line flags on top of the loaded config.
    pub fn apply_to(&self, cfg: &mut GrabConfig) {
        if let Some(dir) = &self.output_dir {
            cfg.output_dir = Some(dir.clone());
        }
        if self.fail_on_error {
            cfg.exit_policy = ExitPolicy::FailOnError;
        }
        if self.allow_unknown_length {
            cfg.require_content_length = false;
        }
        if let Some(size) = self.chunk_size {
            cfg.chunk_size = size;
        }
    }
}

/// Parses arguments, loads config and runs the downloads. Returns the exit code.
pub fn run_from_args() -> Result<u8> {
    let cli = Cli::parse();
    let mut cfg = config::load()?;
    cli.apply_to(&mut cfg);
    tracing::debug!("effective config: {:?}", cfg);

    run_fetch(&cli.urls, &cfg)
}
