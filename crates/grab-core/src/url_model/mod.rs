//! Filename derivation.
//!
//! Picks a local filename from the Content-Disposition header or the final URL
//! path and reduces it to a bare name that cannot escape the output directory.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::{parse_content_disposition, ContentDisposition};
pub use path::decoded_url_path;
pub use sanitize::{clean_rooted, sanitize_filename};

use url::Url;

/// Filename used when neither the header nor the URL path yields a usable name.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe filename for saving a download.
///
/// Uses the `filename` parameter of `content_disposition` when the header parses
/// and carries one, otherwise the decoded path of `final_url` (the URL after
/// redirects). The candidate is rooted, normalized and cut down to its last
/// segment.
///
/// # Examples
///
/// - `/a/b/c/report.pdf` → `"report.pdf"`
/// - `attachment; filename="../../etc/passwd"` → `"passwd"`
pub fn derive_filename(content_disposition: Option<&str>, final_url: &Url) -> String {
    let candidate = content_disposition
        .and_then(parse_content_disposition)
        .and_then(|cd| cd.filename)
        .unwrap_or_else(|| decoded_url_path(final_url));

    sanitize_filename(&candidate).unwrap_or_else(|| DEFAULT_FILENAME.to_string())
}
