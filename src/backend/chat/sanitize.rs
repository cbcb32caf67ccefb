/**
 * Input Sanitization
 *
 * Publish input is untrusted. Every username and body goes through
 * `strip_markup` before it can be stored: HTML tags are removed (their text
 * content is kept), the remaining special characters are entity-escaped, and
 * surrounding whitespace is trimmed.
 *
 * Validation runs on the sanitized value, so `<b></b>` counts as empty.
 * Length limits count the characters as typed, not the escaped form, so
 * `&` counts as one character even though it is stored as `&amp;`.
 */
use crate::shared::text::visible_len;
use crate::shared::SharedError;
use std::collections::HashSet;

/// Longest accepted username, in characters
pub const MAX_USERNAME_LENGTH: usize = 100;

/// Longest accepted message body, in characters
pub const MAX_BODY_LENGTH: usize = 10_000;

/// Remove all markup from `raw`, keeping its text content escaped
pub fn strip_markup(raw: &str) -> String {
    // No allowed tags, and no tag whose content is dropped: `<script>x</script>`
    // keeps its text the way strip_tags does.
    let cleaned = ammonia::Builder::empty()
        .clean_content_tags(HashSet::new())
        .clean(raw)
        .to_string();
    cleaned.trim().to_string()
}

/// Sanitize a field and check it is non-empty and within `max_len`
pub fn sanitize_field(field: &str, raw: &str, max_len: usize) -> Result<String, SharedError> {
    let sanitized = strip_markup(raw);

    if sanitized.is_empty() {
        return Err(SharedError::validation(field, format!("{field} cannot be empty")));
    }

    let len = visible_len(&sanitized);
    if len > max_len {
        return Err(SharedError::validation(
            field,
            format!("{field} is too long ({len} > {max_len} characters)"),
        ));
    }

    Ok(sanitized)
}
