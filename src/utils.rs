use deunicode::deunicode_char;

/// Fill character for every bibcode slot.
pub const FILL: char = '.';

/// Right-justifies `value` in a field of `width` characters, filling on the left
/// with [`FILL`]. Values already at or past `width` are returned unchanged.
///
/// # Arguments
///
/// * `value` - The text to justify
/// * `width` - Target width in characters
pub fn right_justify(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut out = String::with_capacity(width);
    out.extend(std::iter::repeat_n(FILL, width - len));
    out.push_str(value);
    out
}

/// Left-justifies `value` in a field of `width` characters, filling on the right
/// with [`FILL`]. Values already at or past `width` are returned unchanged.
pub fn left_justify(value: &str, width: usize) -> String {
    let len = value.chars().count();
    if len >= width {
        return value.to_string();
    }
    let mut out = String::with_capacity(width);
    out.push_str(value);
    out.extend(std::iter::repeat_n(FILL, width - len));
    out
}

/// Returns the last `n` characters of `value` (all of it when shorter).
pub fn last_chars(value: &str, n: usize) -> &str {
    let len = value.chars().count();
    if len <= n {
        return value;
    }
    match value.char_indices().nth(len - n) {
        Some((idx, _)) => &value[idx..],
        None => value,
    }
}

/// Converts text to uppercase ASCII.
///
/// Used on the first character of the first author's surname. Implementations
/// return `None` when the text has no ASCII rendering.
pub trait Transliterator: Send + Sync {
    fn to_ascii_upper(&self, text: &str) -> Option<String>;
}

/// Transliterates with the `deunicode` tables, keeping ASCII alphanumerics.
///
/// `é` becomes `E`, `Ø` becomes `O`, `Æ` becomes `AE` and `ﬁ` becomes `FI`.
/// Characters with no table entry, or whose rendering is only punctuation,
/// have no rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct AsciiTransliterator;

impl Transliterator for AsciiTransliterator {
    fn to_ascii_upper(&self, text: &str) -> Option<String> {
        let ascii: String = text
            .chars()
            .filter_map(deunicode_char)
            .flat_map(str::chars)
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_uppercase())
            .collect();
        (!ascii.is_empty()).then_some(ascii)
    }
}

impl<F> Transliterator for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn to_ascii_upper(&self, text: &str) -> Option<String> {
        self(text)
    }
}
