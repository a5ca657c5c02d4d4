pub mod config;
pub mod logging;

pub mod batch;
pub mod download;
pub mod error;
pub mod progress;
pub mod response;
pub mod transport;
pub mod url_model;
pub mod writer;

pub use batch::{run_batch, BatchReport, ExitPolicy};
pub use download::{download, DownloadOptions, DownloadOutcome};
pub use error::{DownloadError, ErrorKind};
