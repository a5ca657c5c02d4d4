//! Reduction of an untrusted name to a bare, traversal-free filename.

/// Linux NAME_MAX.
const NAME_MAX: usize = 255;

/// Reduces `name` to its final path segment after rooting and normalizing it.
///
/// `name` is treated as if prefixed with `/`, then `.`, `..` and repeated
/// separators are collapsed, so no result can climb out of the target
/// directory. Control characters become `_` and the name is capped at 255
/// bytes. Returns `None` when nothing is left (`""`, `/`, `..`, `a/..`).
pub fn sanitize_filename(name: &str) -> Option<String> {
    let cleaned = clean_rooted(name);
    let last = cleaned.rsplit('/').next().unwrap_or("");
    if last.is_empty() {
        return None;
    }

    let replaced: String = last
        .chars()
        .map(|c| if c.is_control() { '_' } else { c })
        .collect();
    Some(truncate_to(replaced, NAME_MAX))
}

/// Lexically normalizes `path` as an absolute slash-separated path.
pub fn clean_rooted(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            s => parts.push(s),
        }
    }
    format!("/{}", parts.join("/"))
}

fn truncate_to(mut s: String, max: usize) -> String {
    if s.len() > max {
        let mut take = max;
        while take > 0 && !s.is_char_boundary(take) {
            take -= 1;
        }
        s.truncate(take);
    }
    s
}
