/// Left-pads `value` with `'0'` up to `width` characters.
///
/// Values already `width` characters or longer are returned unchanged; callers enforce
/// their own length limits beforehand.
pub fn zero_pad(value: &str, width: usize) -> String {
    format!("{value:0>width$}")
}

/// Length in characters, not bytes.
pub fn char_len(value: &str) -> usize {
    value.chars().count()
}
