//! Single-line progress display on the status stream.
//!
//! Each update starts with `\r` and ends without a newline so the terminal
//! redraws the same line. Output errors are swallowed: progress is cosmetic and
//! never changes the outcome of a download.

mod units;

pub use units::{format_bytes, BYTE_UNITS};

use std::io::Write;

/// Fill characters in the bar, excluding the `>` marker.
pub const BAR_WIDTH: usize = 38;

/// Receives a progress update after every chunk.
pub trait Progress {
    fn update(&mut self, transferred: u64, expected: u64);
}

impl<P: Progress + ?Sized> Progress for &mut P {
    fn update(&mut self, transferred: u64, expected: u64) {
        (**self).update(transferred, expected)
    }
}

/// `floor(100 * transferred / expected)`; callers must ensure `expected >= 1`.
pub fn percent(transferred: u64, expected: u64) -> i64 {
    let p = (transferred as u128 * 100) / expected as u128;
    i64::try_from(p).unwrap_or(i64::MAX)
}

/// Bar body for `percent`: `=` fill, one `>`, space padding. Always
/// `BAR_WIDTH + 1` characters; out-of-range percentages are clamped.
pub fn progress_bar(percent: i64) -> String {
    let filled = (percent.saturating_mul(BAR_WIDTH as i64) / 100).clamp(0, BAR_WIDTH as i64) as usize;
    let mut bar = String::with_capacity(BAR_WIDTH + 1);
    bar.extend(std::iter::repeat('=').take(filled));
    bar.push('>');
    bar.extend(std::iter::repeat(' ').take(BAR_WIDTH - filled));
    bar
}

/// The full status line (leading `\r`, no newline) for one update.
pub fn render_line(transferred: u64, expected: u64) -> String {
    if expected < 1 {
        return format!("\r     [{:<width$}] {}\t            ", " <=>", transferred, width = BAR_WIDTH);
    }
    let pct = percent(transferred, expected);
    format!(
        "\r{:>3}% [{}] {}\t            ",
        pct,
        progress_bar(pct),
        format_bytes(transferred)
    )
}

/// Draws progress lines and the completion message onto `out` (usually stderr).
pub struct ProgressReporter<W> {
    out: W,
}

impl<W: Write> ProgressReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Redraws the status line.
    pub fn draw(&mut self, transferred: u64, expected: u64) {
        let _ = self.out.write_all(render_line(transferred, expected).as_bytes());
        let _ = self.out.flush();
    }

    /// Final draw followed by the newline-terminated completion message.
    pub fn complete(&mut self, filename: &str, transferred: u64, expected: u64) {
        self.draw(transferred, expected);
        let _ = write!(
            self.out,
            "\n `{}` has been successfully downloaded [{}]\n",
            filename,
            format_bytes(transferred)
        );
        let _ = self.out.flush();
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Progress for ProgressReporter<W> {
    fn update(&mut self, transferred: u64, expected: u64) {
        self.draw(transferred, expected);
    }
}
