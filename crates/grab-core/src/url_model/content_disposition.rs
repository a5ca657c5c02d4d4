//! Content-Disposition header parsing (`filename`, `filename*`).

/// A parsed `Content-Disposition` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentDisposition {
    /// `filename*` (RFC 5987) if decodable, else `filename`. Never empty.
    pub filename: Option<String>,
}

/// Parses a raw Content-Disposition header value.
///
/// Returns `None` when the value is not a valid disposition type followed by a
/// parameter list: empty or non-token type, parameters without `=`, unterminated
/// quoted strings, or a parameter given twice. Quoted values may contain `;`.
pub fn parse_content_disposition(header_value: &str) -> Option<ContentDisposition> {
    let (kind, mut rest) = header_value.split_once(';').unwrap_or((header_value, ""));
    let kind = kind.trim();
    if kind.is_empty() || !kind.bytes().all(is_token_byte) {
        return None;
    }

    let mut seen: Vec<String> = Vec::new();
    let mut plain: Option<String> = None;
    let mut extended: Option<String> = None;

    loop {
        rest = rest.trim_start_matches(|c: char| c == ';' || c.is_ascii_whitespace());
        if rest.is_empty() {
            break;
        }
        let (name, value, tail) = next_param(rest)?;
        let name = name.to_ascii_lowercase();
        if seen.contains(&name) {
            return None;
        }
        match name.as_str() {
            "filename" => plain = Some(value),
            "filename*" => extended = decode_extended_value(&value),
            _ => {}
        }
        seen.push(name);
        rest = tail;
    }

    let filename = extended
        .filter(|s| !s.is_empty())
        .or_else(|| plain.filter(|s| !s.is_empty()));

    Some(ContentDisposition { filename })
}

/// Splits off one `name=value` parameter. Returns the name, the unquoted value and
/// the remaining input after the separating `;`.
fn next_param(input: &str) -> Option<(&str, String, &str)> {
    let (name, after_eq) = input.split_once('=')?;
    let name = name.trim();
    if name.is_empty() || !name.bytes().all(is_token_byte) {
        return None;
    }

    let after_eq = after_eq.trim_start();
    let (value, tail) = if let Some(quoted) = after_eq.strip_prefix('"') {
        let (value, consumed) = read_quoted(quoted)?;
        (value, &quoted[consumed..])
    } else {
        let end = after_eq.find(';').unwrap_or(after_eq.len());
        let token = after_eq[..end].trim();
        if token.is_empty() || !token.bytes().all(is_token_byte) {
            return None;
        }
        (token.to_string(), &after_eq[end..])
    };

    let tail = tail.trim_start();
    if !(tail.is_empty() || tail.starts_with(';')) {
        return None;
    }
    Some((name, value, tail))
}

/// Reads a quoted-string body (opening quote already stripped). Returns the
/// unescaped value and the number of bytes consumed including the closing quote.
fn read_quoted(s: &str) -> Option<(String, usize)> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((out, i + 1)),
            '\\' => {
                let (_, escaped) = chars.next()?;
                out.push(escaped);
            }
            _ => out.push(c),
        }
    }
    None
}

/// Decodes an RFC 5987 `charset'language'percent-encoded` value.
fn decode_extended_value(value: &str) -> Option<String> {
    let mut parts = value.splitn(3, '\'');
    let charset = parts.next()?;
    let _language = parts.next()?;
    let encoded = parts.next()?;
    if charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("us-ascii") {
        Some(percent_decode(encoded))
    } else {
        None
    }
}

/// Percent-decodes `input`; invalid escapes are kept verbatim and invalid UTF-8 is
/// replaced lossily.
pub(super) fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(h), Some(l)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(h << 4 | l);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

/// RFC 2045 token character (`*` allowed for extended parameter names).
fn is_token_byte(b: u8) -> bool {
    b.is_ascii_graphic() && !b"()<>@,;:\\\"/[]?=".contains(&b)
}
