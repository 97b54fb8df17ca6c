// src/util.rs — Shared utility functions

/// Truncate a string for display/logging (UTF-8 safe).
///
/// Returns a substring of at most `max_len` bytes, ensuring the cut
/// point falls on a valid UTF-8 character boundary.
pub fn truncate_str(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        return s;
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Single-line, length-capped rendering of model output for log lines.
pub fn preview(s: &str, max_len: usize) -> String {
    let flat = s.split_whitespace().collect::<Vec<_>>().join(" ");
    let cut = truncate_str(&flat, max_len);
    if cut.len() < flat.len() {
        format!("{cut}…")
    } else {
        flat
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate_str("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate_str("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        // "กข" is 6 bytes; cutting at 4 must not split the second character.
        assert_eq!(truncate_str("กข", 4), "ก");
    }

    #[test]
    fn test_preview_flattens_whitespace() {
        assert_eq!(preview("a\n  b\tc", 20), "a b c");
    }

    #[test]
    fn test_preview_marks_truncation() {
        assert_eq!(preview("abcdefgh", 3), "abc…");
    }

    #[test]
    fn test_preview_empty() {
        assert_eq!(preview("", 10), "");
    }
}
