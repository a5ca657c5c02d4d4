//! `grab <URL>...` – download each URL in turn.

use anyhow::{Context, Result};
use grab_core::config::GrabConfig;
use grab_core::run_batch;
use grab_core::transport::CurlTransport;
use std::io;
use std::path::PathBuf;

pub fn run_fetch(urls: &[String], cfg: &GrabConfig) -> Result<u8> {
    let dir: PathBuf = match &cfg.output_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create output directory {}", dir.display()))?;
            dir.clone()
        }
        None => std::env::current_dir().context("current directory")?,
    };

    let mut transport = CurlTransport::new(cfg.curl_options());
    let report = {
        let mut status = io::stderr().lock();
        let mut diagnostics = io::stdout().lock();
        run_batch(
            &mut transport,
            urls,
            &dir,
            &cfg.download_options(),
            &mut status,
            &mut diagnostics,
        )
    };

    tracing::info!(
        "run finished: {} downloaded, {} failed",
        report.completed.len(),
        report.failed.len()
    );
    Ok(report.exit_code(cfg.exit_policy))
}
