//! Response validation: status, filename and expected size.

mod head;

pub use head::{HeadParser, ResponseHead};

use crate::error::DownloadError;
use crate::url_model::derive_filename;
use serde::{Deserialize, Serialize};

/// The only status accepted as success.
pub const ACCEPTED_STATUS: u32 = 200;

/// What to do when the server sends no `Content-Length`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LengthPolicy {
    /// Fail before opening the output file.
    #[default]
    Require,
    /// Stream anyway and render the unknown-length progress form.
    AllowUnknown,
}

/// Everything the pipeline needs from the response before writing the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseMetadata {
    /// Sanitized bare filename.
    pub filename: String,
    /// Declared body size; `None` only under [`LengthPolicy::AllowUnknown`].
    pub expected_len: Option<u64>,
}

impl ResponseMetadata {
    /// Validates `head` and extracts filename and size.
    ///
    /// Checks run in order: status (exactly 200), filename, Content-Length.
    pub fn from_head(head: &ResponseHead, policy: LengthPolicy) -> Result<Self, DownloadError> {
        if head.status != ACCEPTED_STATUS {
            return Err(status_error(head));
        }

        let filename = derive_filename(head.header("content-disposition"), &head.url);

        let expected_len = match head.header("content-length") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|source| {
                DownloadError::MalformedLength {
                    filename: filename.clone(),
                    value: raw.to_string(),
                    source: source.into(),
                }
            })?),
            None if policy == LengthPolicy::AllowUnknown => None,
            None => return Err(DownloadError::MissingLength { filename }),
        };

        Ok(Self {
            filename,
            expected_len,
        })
    }

    /// Error for a Content-Length the transport refused before it reached the
    /// head. A non-200 status still takes precedence.
    pub fn rejected_length<E>(head: &ResponseHead, value: &str, source: E) -> DownloadError
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        if head.status != ACCEPTED_STATUS {
            return status_error(head);
        }
        DownloadError::MalformedLength {
            filename: derive_filename(head.header("content-disposition"), &head.url),
            value: value.to_string(),
            source: source.into(),
        }
    }
}

fn status_error(head: &ResponseHead) -> DownloadError {
    DownloadError::HttpStatus {
        url: head.url.to_string(),
        status: head.status_text(),
    }
}
