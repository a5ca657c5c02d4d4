//! Integration test: real libcurl transport against a local HTTP server.
//!
//! Each test starts its own server, downloads into a temp dir and checks the
//! files on disk plus what was written to the status and diagnostic streams.

mod common;

use common::http_server::{self, Route};
use grab_core::response::LengthPolicy;
use grab_core::transport::{CurlOptions, CurlTransport};
use grab_core::{download, run_batch, DownloadOptions, ErrorKind, ExitPolicy};
use tempfile::tempdir;

fn transport() -> CurlTransport {
    CurlTransport::new(CurlOptions::default())
}

fn body(len: usize) -> Vec<u8> {
    (0u8..251).cycle().take(len).collect()
}

#[test]
fn multi_chunk_download_matches_served_body() {
    let payload = body(4068 * 3 + 17);
    let base = http_server::start(vec![("/pool/main/tool.deb", Route::ok(payload.clone()))]);
    let dir = tempdir().unwrap();

    let mut status = Vec::new();
    let outcome = download(
        &mut transport(),
        &format!("{}/pool/main/tool.deb", base),
        dir.path(),
        &DownloadOptions::default(),
        &mut status,
    )
    .expect("download");

    assert_eq!(outcome.filename, "tool.deb");
    assert_eq!(outcome.bytes, payload.len() as u64);
    assert_eq!(std::fs::read(dir.path().join("tool.deb")).unwrap(), payload);

    let status = String::from_utf8(status).unwrap();
    assert!(status.starts_with('\r'), "{status:?}");
    assert!(status.contains("100% ["), "{status:?}");
    assert!(
        status.ends_with("\n `tool.deb` has been successfully downloaded [12.2 KB]\n"),
        "{status:?}"
    );
}

#[test]
fn non_200_status_creates_no_file() {
    let base = http_server::start(vec![]);
    let dir = tempdir().unwrap();

    let err = download(
        &mut transport(),
        &format!("{}/gone.iso", base),
        dir.path(),
        &DownloadOptions::default(),
        &mut std::io::sink(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert!(err.to_string().ends_with(": 404 Not Found"), "{err}");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn missing_length_is_rejected_unless_allowed() {
    let base = http_server::start(vec![(
        "/stream.log",
        Route::ok(b"no length here".to_vec()).without_length(),
    )]);
    let url = format!("{}/stream.log", base);
    let dir = tempdir().unwrap();

    let err = download(
        &mut transport(),
        &url,
        dir.path(),
        &DownloadOptions::default(),
        &mut std::io::sink(),
    )
    .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingLength);
    assert!(!dir.path().join("stream.log").exists());

    let options = DownloadOptions {
        length_policy: LengthPolicy::AllowUnknown,
        ..DownloadOptions::default()
    };
    let mut status = Vec::new();
    let outcome = download(&mut transport(), &url, dir.path(), &options, &mut status).unwrap();
    assert_eq!(outcome.bytes, 14);
    assert_eq!(
        std::fs::read(dir.path().join("stream.log")).unwrap(),
        b"no length here"
    );
    assert!(String::from_utf8(status).unwrap().contains("<=>"));
}

#[test]
fn malformed_length_is_rejected() {
    let base = http_server::start(vec![
        ("/four.bin", Route::ok(b"1234".to_vec()).length("four")),
        ("/negative.bin", Route::ok(b"1234".to_vec()).length("-5")),
        ("/suffix.bin", Route::ok(b"1234".to_vec()).length("12x")),
    ]);
    let dir = tempdir().unwrap();

    for name in ["four.bin", "negative.bin", "suffix.bin"] {
        let err = download(
            &mut transport(),
            &format!("{}/{}", base, name),
            dir.path(),
            &DownloadOptions::default(),
            &mut std::io::sink(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedLength, "{name}: {err}");
        assert!(err.to_string().starts_with(&format!("`{name}` - invalid Content-Length")), "{err}");
        assert!(!dir.path().join(name).exists());
    }
}

#[test]
fn redirect_names_file_after_final_url() {
    let payload = body(900);
    let base = http_server::start(vec![
        ("/latest", Route::redirect("/releases/v2/app-2.0.tar.gz")),
        ("/releases/v2/app-2.0.tar.gz", Route::ok(payload.clone())),
    ]);
    let dir = tempdir().unwrap();

    let outcome = download(
        &mut transport(),
        &format!("{}/latest", base),
        dir.path(),
        &DownloadOptions::default(),
        &mut std::io::sink(),
    )
    .unwrap();

    assert_eq!(outcome.filename, "app-2.0.tar.gz");
    assert_eq!(std::fs::read(dir.path().join("app-2.0.tar.gz")).unwrap(), payload);
    assert!(!dir.path().join("latest").exists());
}

#[test]
fn content_disposition_name_cannot_escape_dir() {
    let base = http_server::start(vec![(
        "/download?id=7",
        Route::ok(b"secret".to_vec()).disposition("attachment; filename=\"../../etc/passwd\""),
    )]);
    let dir = tempdir().unwrap();
    let target = dir.path().join("out");
    std::fs::create_dir(&target).unwrap();

    let outcome = download(
        &mut transport(),
        &format!("{}/download?id=7", base),
        &target,
        &DownloadOptions::default(),
        &mut std::io::sink(),
    )
    .unwrap();

    assert_eq!(outcome.filename, "passwd");
    assert_eq!(outcome.path, target.join("passwd"));
    assert_eq!(std::fs::read(target.join("passwd")).unwrap(), b"secret");
}

#[test]
fn batch_continues_after_failures() {
    let base = http_server::start(vec![
        ("/a.txt", Route::ok(b"alpha".to_vec())),
        ("/b.txt", Route::status("500 Internal Server Error")),
        ("/c.txt", Route::ok(b"gamma".to_vec())),
    ]);
    let dir = tempdir().unwrap();
    let urls = vec![
        format!("{}/a.txt", base),
        format!("{}/b.txt", base),
        "http://127.0.0.1:1/unreachable".to_string(),
        format!("{}/c.txt", base),
    ];

    let mut status = Vec::new();
    let mut diag = Vec::new();
    let report = run_batch(
        &mut transport(),
        &urls,
        dir.path(),
        &DownloadOptions::default(),
        &mut status,
        &mut diag,
    );

    assert_eq!(report.completed.len(), 2);
    assert_eq!(report.failed.len(), 2);
    assert_eq!(std::fs::read(dir.path().join("a.txt")).unwrap(), b"alpha");
    assert_eq!(std::fs::read(dir.path().join("c.txt")).unwrap(), b"gamma");
    assert!(!dir.path().join("b.txt").exists());

    let diag = String::from_utf8(diag).unwrap();
    assert_eq!(diag.lines().count(), 2, "{diag}");
    assert!(diag.lines().next().unwrap().contains("500 Internal Server Error"));
    assert_eq!(report.failed[1].1.kind(), ErrorKind::Transport);

    assert_eq!(report.exit_code(ExitPolicy::AlwaysZero), 0);
    assert_eq!(report.exit_code(ExitPolicy::FailOnError), 1);
}
