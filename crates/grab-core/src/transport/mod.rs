//! HTTP exchange behind a small trait so the pipeline can run against libcurl
//! or an in-memory response.

mod libcurl;

pub use libcurl::{CurlOptions, CurlTransport};

use crate::error::DownloadError;
use crate::response::ResponseHead;

/// Consumer of one streamed response.
///
/// A transport calls [`on_head`](ResponseSink::on_head) exactly once, before any
/// body bytes, and then [`on_data`](ResponseSink::on_data) for each piece of the
/// body in order. An error from either aborts the transfer and is returned from
/// [`Transport::get`] unchanged.
pub trait ResponseSink {
    fn on_head(&mut self, head: &ResponseHead) -> Result<(), DownloadError>;
    fn on_data(&mut self, data: &[u8]) -> Result<(), DownloadError>;
}

/// Performs a blocking GET and streams the response into a sink.
pub trait Transport {
    fn get(&mut self, url: &str, sink: &mut dyn ResponseSink) -> Result<(), DownloadError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn get(&mut self, url: &str, sink: &mut dyn ResponseSink) -> Result<(), DownloadError> {
        (**self).get(url, sink)
    }
}
