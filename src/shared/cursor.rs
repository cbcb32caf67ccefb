//! Feed cursor
//!
//! A cursor is the client-held watermark of the feed: the id of the last
//! message it has delivered. `Cursor::ORIGIN` means nothing has been
//! delivered yet and selects the whole backlog.
//!
//! On the wire a cursor is a decimal string. Parsing is lenient: anything
//! that is not a valid id becomes `ORIGIN`, so a client with a corrupted
//! cursor heals itself by receiving the backlog again.

use crate::shared::error::SharedError;
use crate::shared::message::MessageId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Position in a conversation's arrival order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cursor(u64);

impl Cursor {
    /// Before the first message
    pub const ORIGIN: Cursor = Cursor(0);

    /// Cursor positioned on `id`
    pub fn at(id: MessageId) -> Self {
        Self(id.0)
    }

    /// Parse a client-supplied cursor, falling back to `ORIGIN`
    pub fn parse_lenient(raw: &str) -> Self {
        raw.parse().unwrap_or(Self::ORIGIN)
    }

    /// Whether this is the origin cursor
    pub fn is_origin(self) -> bool {
        self == Self::ORIGIN
    }

    /// Whether a message with `id` comes after this cursor
    pub fn admits(self, id: MessageId) -> bool {
        id.0 > self.0
    }

    /// Raw numeric value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Cursor {
    type Err = SharedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Cursor)
            .map_err(|e| SharedError::validation("cursor", format!("invalid cursor {s:?}: {e}")))
    }
}

impl Serialize for Cursor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cursor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(u64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(n) => Cursor(n),
            Raw::Text(s) => Cursor::parse_lenient(&s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Cursor::parse_lenient("42"), Cursor::at(MessageId(42)));
        assert_eq!(Cursor::parse_lenient(" 7 "), Cursor::at(MessageId(7)));
    }

    #[test]
    fn test_parse_malformed_is_origin() {
        assert_eq!(Cursor::parse_lenient(""), Cursor::ORIGIN);
        assert_eq!(Cursor::parse_lenient("abc"), Cursor::ORIGIN);
        assert_eq!(Cursor::parse_lenient("-3"), Cursor::ORIGIN);
        assert_eq!(Cursor::parse_lenient("5a0f9c2e"), Cursor::ORIGIN);
    }

    #[test]
    fn test_strict_parse_reports_field() {
        let err = "nope".parse::<Cursor>().unwrap_err();
        match err {
            SharedError::ValidationError { field, .. } => assert_eq!(field, "cursor"),
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_admits() {
        let cursor = Cursor::at(MessageId(5));
        assert!(!cursor.admits(MessageId(4)));
        assert!(!cursor.admits(MessageId(5)));
        assert!(cursor.admits(MessageId(6)));
        assert!(Cursor::ORIGIN.admits(MessageId(1)));
    }

    #[test]
    fn test_serde_accepts_string_and_number() {
        let from_text: Cursor = serde_json::from_str("\"12\"").unwrap();
        let from_number: Cursor = serde_json::from_str("12").unwrap();
        let from_garbage: Cursor = serde_json::from_str("\"zz\"").unwrap();
        assert_eq!(from_text, Cursor::at(MessageId(12)));
        assert_eq!(from_number, from_text);
        assert_eq!(from_garbage, Cursor::ORIGIN);
        assert_eq!(serde_json::to_string(&from_text).unwrap(), "\"12\"");
    }
}
