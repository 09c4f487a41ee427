//! Free-text input sanitizing.

/// Removes every character that is not a word character, a space or one of
/// `{`, `}`, `!`, `.`, `-`.
pub fn filter_out_illegal_characters(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | ' ' | '{' | '}' | '!' | '.' | '-'))
        .collect()
}
