//! Character-offset helpers for text node data.
//!
//! All offsets exposed by this crate count characters, not bytes. Text node
//! data is UTF-8 `String`s internally, so every mutation and split has to
//! translate a character offset into a byte index first. These helpers keep
//! that translation in one place.

/// Number of characters in `s`.
///
/// # Examples
///
/// ```
/// use dom::text::char_len;
///
/// assert_eq!(char_len("hello"), 5);
/// assert_eq!(char_len("héllo"), 5);
/// assert_eq!(char_len(""), 0);
/// ```
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of the character at `char_offset`, clamped to the end of `s`.
///
/// `char_offset == char_len(s)` (or anything larger) maps to `s.len()`.
///
/// # Examples
///
/// ```
/// use dom::text::byte_for_char;
///
/// assert_eq!(byte_for_char("héllo", 0), 0);
/// assert_eq!(byte_for_char("héllo", 2), 3); // é is two bytes
/// assert_eq!(byte_for_char("héllo", 99), 6);
/// ```
pub fn byte_for_char(s: &str, char_offset: usize) -> usize {
    s.char_indices()
        .nth(char_offset)
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// The substring covering characters `start..end`.
///
/// Offsets are clamped to the string, and an inverted pair yields `""`.
///
/// # Examples
///
/// ```
/// use dom::text::substring;
///
/// assert_eq!(substring("héllo", 1, 3), "él");
/// assert_eq!(substring("héllo", 3, 99), "lo");
/// assert_eq!(substring("héllo", 4, 2), "");
/// ```
pub fn substring(s: &str, start: usize, end: usize) -> &str {
    if end <= start {
        return "";
    }
    let from = byte_for_char(s, start);
    let to = byte_for_char(s, end);
    &s[from..to]
}

/// Splits `s` at a character offset into `(prefix, suffix)`.
///
/// # Examples
///
/// ```
/// use dom::text::split_at_char;
///
/// assert_eq!(split_at_char("héllo", 2), ("hé", "llo"));
/// assert_eq!(split_at_char("héllo", 0), ("", "héllo"));
/// assert_eq!(split_at_char("héllo", 5), ("héllo", ""));
/// ```
pub fn split_at_char(s: &str, char_offset: usize) -> (&str, &str) {
    s.split_at(byte_for_char(s, char_offset))
}
