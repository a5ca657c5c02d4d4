//! Per-URL pipeline: request, validate, open file, stream chunks, report.

use crate::error::DownloadError;
use crate::progress::ProgressReporter;
use crate::response::{LengthPolicy, ResponseHead, ResponseMetadata};
use crate::transport::{ResponseSink, Transport};
use crate::writer::{ChunkWriter, DEFAULT_CHUNK_SIZE};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Knobs for a single download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadOptions {
    pub chunk_size: usize,
    pub length_policy: LengthPolicy,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            length_policy: LengthPolicy::Require,
        }
    }
}

/// A finished download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadOutcome {
    pub url: String,
    pub filename: String,
    pub path: PathBuf,
    pub bytes: u64,
}

/// Downloads `url` into `dir`, drawing progress on `status`.
///
/// The output file is only created after the response passed validation, so
/// status and length failures leave the directory untouched. On a mid-transfer
/// failure the partial file stays where it is.
pub fn download<T, S>(
    transport: &mut T,
    url: &str,
    dir: &Path,
    options: &DownloadOptions,
    status: &mut S,
) -> Result<DownloadOutcome, DownloadError>
where
    T: Transport + ?Sized,
    S: Write + ?Sized,
{
    let mut sink = FileSink {
        url,
        dir,
        options,
        reporter: ProgressReporter::new(status),
        active: None,
    };
    transport.get(url, &mut sink)?;
    sink.finish()
}

struct ActiveFile {
    meta: ResponseMetadata,
    path: PathBuf,
    writer: ChunkWriter<File>,
}

/// Sink that turns one response into one file on disk.
struct FileSink<'a, S: Write + ?Sized> {
    url: &'a str,
    dir: &'a Path,
    options: &'a DownloadOptions,
    reporter: ProgressReporter<&'a mut S>,
    active: Option<ActiveFile>,
}

impl<S: Write + ?Sized> ResponseSink for FileSink<'_, S> {
    fn on_head(&mut self, head: &ResponseHead) -> Result<(), DownloadError> {
        let meta = ResponseMetadata::from_head(head, self.options.length_policy)?;
        tracing::debug!(
            url = %self.url,
            final_url = %head.url,
            filename = %meta.filename,
            expected = ?meta.expected_len,
            "response accepted"
        );

        let path = self.dir.join(&meta.filename);
        let file = File::create(&path).map_err(|source| DownloadError::FileOpen {
            path: path.clone(),
            source,
        })?;
        let writer = ChunkWriter::new(file, meta.expected_len.unwrap_or(0), self.options.chunk_size);
        self.active = Some(ActiveFile { meta, path, writer });
        Ok(())
    }

    fn on_data(&mut self, data: &[u8]) -> Result<(), DownloadError> {
        let active = self.active.as_mut().ok_or_else(|| {
            DownloadError::io(
                self.url,
                io::Error::new(io::ErrorKind::InvalidData, "body arrived before response head"),
            )
        })?;
        active
            .writer
            .copy_from(data, &mut self.reporter)
            .map_err(|e| DownloadError::io(&active.meta.filename, e))?;
        Ok(())
    }
}

impl<S: Write + ?Sized> FileSink<'_, S> {
    fn finish(mut self) -> Result<DownloadOutcome, DownloadError> {
        let ActiveFile { meta, path, writer } = self.active.take().ok_or_else(|| {
            DownloadError::io(
                self.url,
                io::Error::new(io::ErrorKind::UnexpectedEof, "transport returned without a response"),
            )
        })?;
        let expected = writer.expected();
        let (_file, state) = writer
            .finish()
            .map_err(|e| DownloadError::io(&meta.filename, e))?;

        let bytes = state.transferred();
        self.reporter.complete(&meta.filename, bytes, expected);
        tracing::info!(url = %self.url, path = %path.display(), bytes, "download complete");

        Ok(DownloadOutcome {
            url: self.url.to_string(),
            filename: meta.filename,
            path,
            bytes,
        })
    }
}
