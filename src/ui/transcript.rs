//! Turns the draft conversation into styled, pre-wrapped terminal lines.
//!
//! Rows are wrapped here rather than by the paragraph widget so the row
//! count used for bottom-anchored scrolling is exactly what gets drawn.

use ratatui::style::Style;
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthChar;

use crate::core::message::{Message, Segment};
use crate::ui::theme::Theme;

const USER_PREFIX: &str = "You: ";
const CODE_GUTTER: &str = "  ";

/// Builds transcript rows no wider than `width` columns.
pub fn build_transcript_lines(
    messages: &[Message],
    theme: &Theme,
    width: u16,
) -> Vec<Line<'static>> {
    let width = usize::from(width.max(1));
    let mut lines = Vec::new();

    for message in messages {
        if message.is_user() {
            push_user_message(&mut lines, &message.text, theme, width);
        } else if message.failed {
            push_plain(&mut lines, &message.text, theme.error_text_style, width);
        } else {
            for segment in message.segments_or_text() {
                match segment {
                    Segment::Text(content) => {
                        push_plain(&mut lines, &content, theme.assistant_text_style, width)
                    }
                    Segment::Code(content) => push_code(&mut lines, &content, theme, width),
                }
            }
        }
        lines.push(Line::from(""));
    }

    lines
}

fn push_user_message(lines: &mut Vec<Line<'static>>, text: &str, theme: &Theme, width: usize) {
    let body_width = width.saturating_sub(USER_PREFIX.len()).max(1);
    let indent = " ".repeat(USER_PREFIX.len());
    let mut first = true;
    for row in text.split('\n') {
        for piece in wrap_row(row, body_width) {
            let lead = if first {
                Span::styled(USER_PREFIX, theme.user_prefix_style)
            } else {
                Span::raw(indent.clone())
            };
            first = false;
            lines.push(Line::from(vec![
                lead,
                Span::styled(piece, theme.user_text_style),
            ]));
        }
    }
}

fn push_plain(lines: &mut Vec<Line<'static>>, text: &str, style: Style, width: usize) {
    // A trailing newline before a code block would otherwise add a blank row.
    let text = text.strip_suffix('\n').unwrap_or(text);
    for row in text.split('\n') {
        for piece in wrap_row(row, width) {
            lines.push(Line::from(Span::styled(piece, style)));
        }
    }
}

fn push_code(lines: &mut Vec<Line<'static>>, code: &str, theme: &Theme, width: usize) {
    let code = code.strip_suffix('\n').unwrap_or(code);
    let code_width = width.saturating_sub(CODE_GUTTER.len()).max(1);
    for row in code.split('\n') {
        for piece in wrap_row(row, code_width) {
            lines.push(Line::from(Span::styled(
                format!("{CODE_GUTTER}{piece}"),
                theme.code_block_style,
            )));
        }
    }
}

/// Wraps one newline-free row at word boundaries.
///
/// Whitespace at a break is dropped. Words wider than `width` are split
/// between characters. Always returns at least one row.
pub fn wrap_row(row: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut current = String::new();
    let mut current_width = 0;

    for token in split_words(row) {
        let token_width = display_width(token);
        if current_width + token_width <= width {
            current.push_str(token);
            current_width += token_width;
            continue;
        }

        if token.starts_with(char::is_whitespace) {
            if current_width > 0 {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            continue;
        }

        if current_width > 0 && token_width <= width {
            rows.push(std::mem::take(&mut current));
            current.push_str(token);
            current_width = token_width;
            continue;
        }

        for ch in token.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width > 0 && current_width + ch_width > width {
                rows.push(std::mem::take(&mut current));
                current_width = 0;
            }
            current.push(ch);
            current_width += ch_width;
        }
    }

    if !current.is_empty() || rows.is_empty() {
        rows.push(current);
    }
    rows
}

/// Splits `row` into alternating runs of whitespace and non-whitespace.
fn split_words(row: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space = None;
    for (idx, ch) in row.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|prev| prev != space) {
            tokens.push(&row[start..idx]);
            start = idx;
        }
        in_space = Some(space);
    }
    if start < row.len() {
        tokens.push(&row[start..]);
    }
    tokens
}

fn display_width(text: &str) -> usize {
    text.chars().map(|ch| ch.width().unwrap_or(0)).sum()
}
