/// Largest prefix of `value` that fits in `max_bytes` without splitting a
/// UTF-8 sequence.
pub fn utf8_prefix(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Shortens text for the operator log, noting how much was cut.
pub fn clip_for_log(value: &str, max_bytes: usize) -> String {
    let prefix = utf8_prefix(value, max_bytes);
    if prefix.len() == value.len() {
        return value.to_string();
    }
    format!("{}... (+{} bytes)", prefix, value.len() - prefix.len())
}
