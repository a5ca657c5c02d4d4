//! Human-readable byte sizes in decimal (power-of-1000) units.

pub const BYTE_UNITS: [&str; 6] = ["B", "KB", "MB", "GB", "TB", "PB"];

/// Formats `n` bytes with three significant digits and the largest unit that
/// keeps the rounded value below 1000: `999 B`, `1 KB`, `1.5 MB`, `123 GB`.
///
/// A value that rounds up to 1000 moves to the next unit (`999_999` → `1 MB`).
/// Anything past the PB range stays in PB.
pub fn format_bytes(n: u64) -> String {
    let mut size = n as f64;
    let mut unit = 0;
    let mut digits = three_significant(size);
    while unit + 1 < BYTE_UNITS.len() && digits.parse::<f64>().unwrap_or(size) >= 1000.0 {
        size /= 1000.0;
        unit += 1;
        digits = three_significant(size);
    }
    format!("{} {}", digits, BYTE_UNITS[unit])
}

/// `%.3g`-style rendering for values in `[0, 1000)`, without exponent notation
/// and with trailing zeros trimmed. Larger inputs are printed without decimals.
fn three_significant(v: f64) -> String {
    let decimals = if v >= 100.0 {
        0
    } else if v >= 10.0 {
        1
    } else {
        2
    };
    let s = format!("{:.*}", decimals, v);
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}
