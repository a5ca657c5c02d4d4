//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves canned responses keyed by request path. Every response closes the
//! connection, so bodies without Content-Length end at EOF.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: &'static str,
    pub body: Vec<u8>,
    /// If false, omit Content-Length.
    pub send_length: bool,
    /// Overrides the Content-Length value (e.g. a malformed one).
    pub length_value: Option<String>,
    pub content_disposition: Option<String>,
    /// Path (relative to the server) for a `Location` header.
    pub location: Option<String>,
}

impl Route {
    pub fn ok(body: Vec<u8>) -> Self {
        Self {
            status: "200 OK",
            body,
            send_length: true,
            length_value: None,
            content_disposition: None,
            location: None,
        }
    }

    pub fn status(status: &'static str) -> Self {
        Self {
            status,
            ..Self::ok(b"nope".to_vec())
        }
    }

    pub fn redirect(to: &str) -> Self {
        Self {
            location: Some(to.to_string()),
            ..Self::status("302 Found")
        }
    }

    pub fn without_length(mut self) -> Self {
        self.send_length = false;
        self
    }

    pub fn length(mut self, value: &str) -> Self {
        self.length_value = Some(value.to_string());
        self
    }

    pub fn disposition(mut self, value: &str) -> Self {
        self.content_disposition = Some(value.to_string());
        self
    }
}

/// Starts a server in a background thread. Returns the base URL without a
/// trailing slash (e.g. "http://127.0.0.1:12345"). Unknown paths get 404.
pub fn start(routes: Vec<(&str, Route)>) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().unwrap().port();
    let base = format!("http://127.0.0.1:{}", port);
    let routes: Arc<HashMap<String, Route>> = Arc::new(
        routes
            .into_iter()
            .map(|(path, route)| (path.to_string(), route))
            .collect(),
    );
    let origin = base.clone();
    thread::spawn(move || {
        for stream in listener.incoming().flatten() {
            let routes = Arc::clone(&routes);
            let origin = origin.clone();
            thread::spawn(move || handle(stream, &routes, &origin));
        }
    });
    base
}

fn handle(mut stream: TcpStream, routes: &HashMap<String, Route>, origin: &str) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) => return,
        Ok(n) => n,
        Err(_) => return,
    };
    let request = match std::str::from_utf8(&buf[..n]) {
        Ok(s) => s,
        Err(_) => return,
    };
    let path = request_path(request);

    let missing;
    let route = match routes.get(path) {
        Some(route) => route,
        None => {
            missing = Route::status("404 Not Found");
            &missing
        }
    };

    let mut head = format!("HTTP/1.1 {}\r\nConnection: close\r\n", route.status);
    if route.send_length {
        let value = route
            .length_value
            .clone()
            .unwrap_or_else(|| route.body.len().to_string());
        head.push_str(&format!("Content-Length: {}\r\n", value));
    }
    if let Some(cd) = &route.content_disposition {
        head.push_str(&format!("Content-Disposition: {}\r\n", cd));
    }
    if let Some(to) = &route.location {
        head.push_str(&format!("Location: {}{}\r\n", origin, to));
    }
    head.push_str("\r\n");
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&route.body);
}

/// Path of the request line, e.g. "/files/a.bin" for `GET /files/a.bin HTTP/1.1`.
fn request_path(request: &str) -> &str {
    request
        .lines()
        .next()
        .and_then(|line| line.split_whitespace().nth(1))
        .unwrap_or("/")
}
