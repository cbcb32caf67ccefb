/**
 * Message Display
 *
 * The poller hands delivered messages to a [`MessageSink`]. The terminal
 * client prints one line per message:
 *
 * ```text
 * 14:03:27 alice: hello
 * ```
 *
 * Times are shown in the local time zone. The server stores text
 * HTML-escaped; it is unescaped here, so `fish &amp; chips` prints as
 * `fish & chips`.
 */

use crate::shared::text::unescape_html;
use crate::shared::Message;
use chrono::{Local, TimeZone};
use std::fmt::Display;
use std::io::Write;

/// Destination for delivered messages
pub trait MessageSink: Send {
    /// Show one message after everything shown so far
    fn append(&mut self, message: &Message);

    /// Bring the newest message into view
    fn scroll_to_latest(&mut self);
}

/// Render a message as `HH:MM:SS username: body` in the given zone
pub fn format_line<Tz>(message: &Message, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let time = zone
        .timestamp_opt(message.created_at, 0)
        .single()
        .map(|at| at.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string());
    format!(
        "{} {}: {}",
        time,
        unescape_html(&message.username),
        unescape_html(&message.body)
    )
}

/// Prints messages to a writer, usually stdout
#[derive(Debug)]
pub struct TerminalDisplay<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> TerminalDisplay<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> MessageSink for TerminalDisplay<W> {
    fn append(&mut self, message: &Message) {
        if let Err(e) = writeln!(self.out, "{}", format_line(message, &Local)) {
            tracing::warn!("[Display] Failed to write message {}: {}", message.id, e);
        }
    }

    fn scroll_to_latest(&mut self) {
        // A terminal scrolls by itself; make sure the lines are out.
        if let Err(e) = self.out.flush() {
            tracing::warn!("[Display] Failed to flush output: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::MessageId;
    use chrono::{FixedOffset, Utc};

    #[test]
    fn test_format_line_utc() {
        // 2023-11-14 22:13:20 UTC
        let message = Message::new(MessageId(1), "alice", "hello", 1_700_000_000);
        assert_eq!(format_line(&message, &Utc), "22:13:20 alice: hello");
    }

    #[test]
    fn test_format_line_offset() {
        let message = Message::new(MessageId(1), "bob", "hi", 1_700_000_000);
        let zone = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(format_line(&message, &zone), "00:13:20 bob: hi");
    }

    #[test]
    fn test_format_line_unescapes_text() {
        let message = Message::new(
            MessageId(1),
            "ben &amp; jerry",
            "fish &amp; chips &lt;3",
            1_700_000_000,
        );
        assert_eq!(
            format_line(&message, &Utc),
            "22:13:20 ben & jerry: fish & chips <3"
        );
    }

    #[test]
    fn test_terminal_display_writes_lines() {
        let mut display = TerminalDisplay::new(Vec::new());
        display.append(&Message::new(MessageId(1), "alice", "one", 0));
        display.append(&Message::new(MessageId(2), "bob", "two", 0));
        display.scroll_to_latest();

        let output = String::from_utf8(display.into_inner()).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("alice: one"));
        assert!(lines[1].ends_with("bob: two"));
    }
}
