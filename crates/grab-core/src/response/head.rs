//! Assemble the final response head from raw header lines.
//!
//! With redirects followed, the transport sees one header block per hop. Each
//! status line opens a new block; a 3xx block with `Location` moves the
//! effective URL before the next block starts.

use url::Url;

/// Status and headers of the final response, plus the URL it was served from.
#[derive(Debug, Clone)]
pub struct ResponseHead {
    /// Effective URL after redirects.
    pub url: Url,
    pub status: u32,
    /// Reason phrase from the status line; empty for HTTP/2.
    pub reason: String,
    headers: Vec<(String, String)>,
}

impl ResponseHead {
    /// First value of header `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// `"404 Not Found"`, or just `"404"` when the server sent no reason phrase.
    pub fn status_text(&self) -> String {
        if self.reason.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.reason)
        }
    }
}

/// Incremental header-line collector, fed one line at a time.
#[derive(Debug)]
pub struct HeadParser {
    url: Url,
    status: Option<(u32, String)>,
    headers: Vec<(String, String)>,
}

impl HeadParser {
    pub fn new(request_url: Url) -> Self {
        Self {
            url: request_url,
            status: None,
            headers: Vec::new(),
        }
    }

    /// Feeds one raw header line (trailing CRLF allowed).
    pub fn push_line(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim_end_matches(['\r', '\n']);
        if line.is_empty() {
            return;
        }

        if line.starts_with("HTTP/") {
            self.start_block(line);
            return;
        }

        if let Some((name, value)) = line.split_once(':') {
            self.headers
                .push((name.trim().to_string(), value.trim().to_string()));
        }
    }

    /// Snapshot of the latest block, or `None` before any status line.
    pub fn head(&self) -> Option<ResponseHead> {
        let (status, reason) = self.status.clone()?;
        Some(ResponseHead {
            url: self.url.clone(),
            status,
            reason,
            headers: self.headers.clone(),
        })
    }

    fn start_block(&mut self, status_line: &str) {
        if let Some((code, _)) = &self.status {
            if (300..400).contains(code) {
                let next = self
                    .headers
                    .iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case("location"))
                    .and_then(|(_, loc)| self.url.join(loc).ok());
                if let Some(next) = next {
                    self.url = next;
                }
            }
        }
        self.headers.clear();
        self.status = parse_status_line(status_line);
    }
}

/// `HTTP/1.1 404 Not Found` → `(404, "Not Found")`.
fn parse_status_line(line: &str) -> Option<(u32, String)> {
    let mut parts = line.splitn(3, ' ');
    let _version = parts.next()?;
    let code = parts.next()?.trim().parse::<u32>().ok()?;
    let reason = parts.next().unwrap_or("").trim().to_string();
    Some((code, reason))
}
