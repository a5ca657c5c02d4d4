//! Sequential chunk writer for the output file.
//!
//! Reads the body in chunks of at most `chunk_size` bytes, writes each chunk
//! verbatim before the next read, and reports progress after every write.
//! A failed read or write leaves the bytes already written in place.

use crate::progress::Progress;
use std::io::{self, Read, Write};

/// Bytes per read.
pub const DEFAULT_CHUNK_SIZE: usize = 4068;

/// Running byte count of one transfer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferState {
    transferred: u64,
}

impl TransferState {
    pub fn transferred(&self) -> u64 {
        self.transferred
    }
}

/// Owns the output handle and the transfer state for one download.
pub struct ChunkWriter<W> {
    out: W,
    expected: u64,
    state: TransferState,
    buf: Vec<u8>,
}

impl<W: Write> ChunkWriter<W> {
    /// `expected` is the declared size handed to progress (0 when unknown).
    /// A `chunk_size` of 0 is treated as 1.
    pub fn new(out: W, expected: u64, chunk_size: usize) -> Self {
        Self {
            out,
            expected,
            state: TransferState::default(),
            buf: vec![0u8; chunk_size.max(1)],
        }
    }

    /// Copies `body` to the output until end-of-stream, one chunk per read.
    /// Returns the number of bytes copied by this call.
    pub fn copy_from<R, P>(&mut self, mut body: R, progress: &mut P) -> io::Result<u64>
    where
        R: Read,
        P: Progress + ?Sized,
    {
        let mut copied = 0u64;
        loop {
            let n = match body.read(&mut self.buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.out.write_all(&self.buf[..n])?;
            self.state.transferred += n as u64;
            copied += n as u64;
            progress.update(self.state.transferred, self.expected);
        }
        Ok(copied)
    }

    pub fn expected(&self) -> u64 {
        self.expected
    }

    /// Flushes and hands back the output handle with the final state.
    pub fn finish(mut self) -> io::Result<(W, TransferState)> {
        self.out.flush()?;
        Ok((self.out, self.state))
    }
}
