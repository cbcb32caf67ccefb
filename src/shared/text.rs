//! Escaped message text
//!
//! Stored usernames and bodies are HTML-escaped by the server. These helpers
//! turn them back into the text the user typed, for length checks and for
//! plain-text output.

use std::borrow::Cow;

/// Entities the server's sanitizer emits in text content, `&amp;` last
const ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&nbsp;", "\u{a0}"),
    ("&amp;", "&"),
];

/// Decode the entities produced by escaping
pub fn unescape_html(escaped: &str) -> Cow<'_, str> {
    if !escaped.contains('&') {
        return Cow::Borrowed(escaped);
    }
    let mut text = escaped.to_string();
    for (entity, raw) in ENTITIES {
        if text.contains(entity) {
            text = text.replace(entity, raw);
        }
    }
    Cow::Owned(text)
}

/// Length in characters of the text before escaping
pub fn visible_len(escaped: &str) -> usize {
    unescape_html(escaped).chars().count()
}
