//! libcurl transport: one easy handle per GET, blocking, on the calling thread.
//!
//! Body bytes are handed to the sink from inside curl's write callback, so the
//! disk write and progress draw finish before curl reads more from the socket.

use super::{ResponseSink, Transport};
use crate::error::DownloadError;
use crate::response::{HeadParser, ResponseMetadata};
use curl::easy::Easy;
use std::cell::RefCell;
use std::io;
use std::time::Duration;
use url::Url;

/// Redirect hop limit.
const MAX_REDIRECTIONS: u32 = 10;

/// Per-request curl settings. Defaults: no timeouts, curl's buffer size.
#[derive(Debug, Clone, Default)]
pub struct CurlOptions {
    pub user_agent: Option<String>,
    pub connect_timeout: Option<Duration>,
    /// Receive buffer hint; curl clamps it to its supported range.
    pub buffer_size: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    options: CurlOptions,
}

impl CurlTransport {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }
}

/// Delivery state shared by the header and write callbacks.
struct Feed<'s> {
    sink: &'s mut dyn ResponseSink,
    head_delivered: bool,
    failure: Option<DownloadError>,
}

impl Feed<'_> {
    fn deliver_head(&mut self, parser: &HeadParser, url: &str) -> Result<(), DownloadError> {
        if self.head_delivered {
            return Ok(());
        }
        let head = parser
            .head()
            .ok_or_else(|| DownloadError::transport(url, "response had no status line"))?;
        self.head_delivered = true;
        self.sink.on_head(&head)
    }
}

impl Transport for CurlTransport {
    fn get(&mut self, url: &str, sink: &mut dyn ResponseSink) -> Result<(), DownloadError> {
        let request_url = Url::parse(url).map_err(|e| DownloadError::transport(url, e))?;
        if !matches!(request_url.scheme(), "http" | "https") {
            return Err(DownloadError::transport(
                url,
                format!("unsupported protocol scheme `{}`", request_url.scheme()),
            ));
        }
        let setup = |e: curl::Error| DownloadError::transport(url, e);

        let mut easy = Easy::new();
        easy.url(request_url.as_str()).map_err(setup)?;
        easy.follow_location(true).map_err(setup)?;
        easy.max_redirections(MAX_REDIRECTIONS).map_err(setup)?;
        if let Some(agent) = &self.options.user_agent {
            easy.useragent(agent).map_err(setup)?;
        }
        if let Some(timeout) = self.options.connect_timeout {
            easy.connect_timeout(timeout).map_err(setup)?;
        }
        if let Some(size) = self.options.buffer_size {
            easy.buffer_size(size).map_err(setup)?;
        }

        tracing::debug!(%url, "GET");

        let parser = RefCell::new(HeadParser::new(request_url));
        let feed = RefCell::new(Feed {
            sink,
            head_delivered: false,
            failure: None,
        });

        let performed = {
            let mut transfer = easy.transfer();
            transfer
                .header_function(|line| {
                    parser.borrow_mut().push_line(line);
                    true
                })
                .map_err(setup)?;
            transfer
                .write_function(|data| {
                    let mut feed = feed.borrow_mut();
                    let delivered = feed
                        .deliver_head(&parser.borrow(), url)
                        .and_then(|()| feed.sink.on_data(data));
                    match delivered {
                        Ok(()) => Ok(data.len()),
                        Err(e) => {
                            feed.failure = Some(e);
                            // Short count makes curl abort with a write error.
                            Ok(0)
                        }
                    }
                })
                .map_err(setup)?;
            transfer.perform()
        };

        let mut feed = feed.into_inner();
        if let Some(err) = feed.failure.take() {
            return Err(err);
        }
        match performed {
            // Empty bodies never reach the write callback.
            Ok(()) => feed.deliver_head(&parser.borrow(), url),
            Err(e) if feed.head_delivered => Err(DownloadError::io(url, io::Error::other(e))),
            Err(e) => {
                // CURLE_WEIRD_SERVER_REPLY (8); curl has no named accessor for it.
                let refused = (e.code() == 8)
                    .then(|| e.extra_description().and_then(refused_length_value))
                    .flatten();
                let head = parser.borrow().head();
                match (refused, head) {
                    (Some(value), Some(head)) => {
                        Err(ResponseMetadata::rejected_length(&head, &value, e))
                    }
                    _ => Err(DownloadError::transport(url, e)),
                }
            }
        }
    }
}

/// curl rejects an unparsable Content-Length itself, after the status line
/// went through the header callback but before the bad header did. Returns
/// the value curl quoted, or "invalid" when it only printed a placeholder.
fn refused_length_value(detail: &str) -> Option<String> {
    let at = detail.to_ascii_lowercase().find("content-length")?;
    let value = detail[at + "content-length".len()..]
        .trim_start_matches(':')
        .trim();
    if value.is_empty() || value == "value" {
        Some("invalid".to_string())
    } else {
        Some(value.to_string())
    }
}
