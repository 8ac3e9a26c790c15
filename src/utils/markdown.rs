//! Helpers for Telegram MarkdownV2 text.
//!
//! Every character listed in [`RESERVED`] must be backslash-escaped outside of
//! entities, otherwise Telegram rejects the whole message.

const RESERVED: &[char] = &[
    '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
];

/// Escapes markdown special characters for MarkdownV2 parsing mode
///
/// # Example
/// ```
/// use birthday_reminder_bot::utils::markdown::escape_markdown;
///
/// let escaped = escape_markdown("Anna Lee (Engineer)");
/// assert_eq!(escaped, "Anna Lee \\(Engineer\\)");
/// ```
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if RESERVED.contains(&c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
