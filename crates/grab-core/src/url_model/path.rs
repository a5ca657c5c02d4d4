//! Filename hint from the final request URL.

use super::content_disposition::percent_decode;
use url::Url;

/// Returns the percent-decoded path of `url` (e.g. `/a/my%20file.txt` → `/a/my file.txt`).
///
/// Query and fragment are ignored. The result still contains directory
/// components; [`sanitize_filename`](super::sanitize_filename) reduces it.
pub fn decoded_url_path(url: &Url) -> String {
    percent_decode(url.path())
}
