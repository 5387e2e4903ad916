//! Splits reply bodies into prose and fenced code segments.

use crate::core::message::Segment;

const FENCE: &str = "```";

/// Split `text` into text and code segments.
///
/// Fences pair up left to right: each opening marker closes at the next
/// marker. A trailing marker without a partner stays in the surrounding
/// text. Input without any complete fence comes back as one text segment,
/// including the empty string.
pub fn format_message(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last_index = 0;

    while let Some(open) = text[last_index..].find(FENCE) {
        let open = last_index + open;
        let body_start = open + FENCE.len();
        let Some(close) = text[body_start..].find(FENCE) else {
            break;
        };
        let close = body_start + close;

        if open > last_index {
            segments.push(Segment::text(&text[last_index..open]));
        }
        segments.push(Segment::code(&text[body_start..close]));
        last_index = close + FENCE.len();
    }

    if last_index < text.len() {
        segments.push(Segment::text(&text[last_index..]));
    }

    if segments.is_empty() {
        segments.push(Segment::text(text));
    }

    segments
}
