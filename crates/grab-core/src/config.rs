use crate::batch::ExitPolicy;
use crate::download::DownloadOptions;
use crate::response::LengthPolicy;
use crate::transport::CurlOptions;
use crate::writer::DEFAULT_CHUNK_SIZE;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Optional configuration loaded from `~/.config/grab/config.toml`.
///
/// Every key may be omitted. CLI flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrabConfig {
    /// Bytes per body read.
    pub chunk_size: usize,
    /// If false, bodies without Content-Length are streamed with an unknown-length bar.
    pub require_content_length: bool,
    /// "always-zero" (default) or "fail-on-error".
    pub exit_policy: ExitPolicy,
    /// Download directory (None = current directory).
    pub output_dir: Option<PathBuf>,
    /// curl connect timeout in seconds (None = curl default).
    pub connect_timeout_secs: Option<u64>,
    /// User-Agent request header.
    pub user_agent: Option<String>,
}

impl Default for GrabConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            require_content_length: true,
            exit_policy: ExitPolicy::AlwaysZero,
            output_dir: None,
            connect_timeout_secs: None,
            user_agent: Some(concat!("grab/", env!("CARGO_PKG_VERSION")).to_string()),
        }
    }
}

impl GrabConfig {
    pub fn length_policy(&self) -> LengthPolicy {
        if self.require_content_length {
            LengthPolicy::Require
        } else {
            LengthPolicy::AllowUnknown
        }
    }

    pub fn download_options(&self) -> DownloadOptions {
        DownloadOptions {
            chunk_size: self.chunk_size.max(1),
            length_policy: self.length_policy(),
        }
    }

    pub fn curl_options(&self) -> CurlOptions {
        CurlOptions {
            user_agent: self.user_agent.clone(),
            connect_timeout: self.connect_timeout_secs.map(Duration::from_secs),
            buffer_size: Some(self.chunk_size.max(1)),
        }
    }
}

/// Location of the config file, if one exists.
pub fn config_path() -> Result<Option<PathBuf>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("grab")?;
    Ok(xdg_dirs.find_config_file("config.toml"))
}

/// Load configuration from the XDG config dir, or defaults when there is no file.
/// The file is never created.
pub fn load() -> Result<GrabConfig> {
    match config_path()? {
        Some(path) => load_from_path(&path),
        None => Ok(GrabConfig::default()),
    }
}

pub fn load_from_path(path: &Path) -> Result<GrabConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: GrabConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}
