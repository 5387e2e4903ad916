use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::message::Message;

/// Characters of the first message kept in a session title.
pub const TITLE_MAX_CHARS: usize = 30;

/// Appended to titles cut at [`TITLE_MAX_CHARS`].
pub const TITLE_ELLIPSIS: char = '…';

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub title: String,
    pub messages: Vec<Message>,
    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Number of user/ai pairs recorded in the session.
    pub fn exchange_count(&self) -> usize {
        self.messages.iter().filter(|m| m.is_user()).count()
    }
}

/// Title for a session started with `first_message`.
///
/// Counts `char`s, not graphemes or display width.
pub fn derive_title(first_message: &str) -> String {
    let mut chars = first_message.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}{TITLE_ELLIPSIS}")
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_titles_are_copied_exactly() {
        assert_eq!(derive_title("Hello"), "Hello");
        assert_eq!(derive_title(""), "");
    }

    #[test]
    fn exactly_thirty_chars_is_not_truncated() {
        let text = "a".repeat(30);
        assert_eq!(derive_title(&text), text);
    }

    #[test]
    fn long_titles_are_truncated_with_marker() {
        let text = "This question is definitely longer than thirty characters";
        let title = derive_title(text);
        assert_eq!(title.chars().count(), 31);
        assert!(title.ends_with(TITLE_ELLIPSIS));
        assert!(title.starts_with("This question is definitely lo"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "ü".repeat(40);
        let title = derive_title(&text);
        assert_eq!(title.chars().count(), 31);
    }

    #[test]
    fn session_serializes_created_at_in_camel_case() {
        let session = Session {
            id: "1".into(),
            title: "t".into(),
            messages: vec![Message::user("hi")],
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
