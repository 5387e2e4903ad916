use serde::{Deserialize, Serialize};

use crate::core::formatter::format_message;

/// Text shown in place of a reply when the endpoint call fails.
pub const FETCH_ERROR_TEXT: &str = "Error: Failed to fetch response";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Ai => "ai",
        }
    }

    pub fn is_user(self) -> bool {
        self == Sender::User
    }

    pub fn is_ai(self) -> bool {
        self == Sender::Ai
    }
}

impl AsRef<str> for Sender {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<&str> for Sender {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "user" => Ok(Sender::User),
            "ai" => Ok(Sender::Ai),
            _ => Err(format!("invalid message sender: {value}")),
        }
    }
}

impl TryFrom<String> for Sender {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl From<Sender> for String {
    fn from(value: Sender) -> Self {
        value.as_str().to_string()
    }
}

/// A typed chunk of a reply body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "lowercase")]
pub enum Segment {
    /// Prose, kept exactly as received.
    Text(String),

    /// Inner content of a fenced code block, delimiters stripped.
    Code(String),
}

impl Segment {
    pub fn text(content: impl Into<String>) -> Self {
        Segment::Text(content.into())
    }

    pub fn code(content: impl Into<String>) -> Self {
        Segment::Code(content.into())
    }

    pub fn content(&self) -> &str {
        match self {
            Segment::Text(content) | Segment::Code(content) => content,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Segment::Code(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<Segment>>,
    /// Set on the placeholder shown for a failed request. Never saved.
    #[serde(skip)]
    pub failed: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            segments: None,
            failed: false,
        }
    }

    /// Builds a reply message, segmenting the body up front.
    pub fn ai(text: impl Into<String>) -> Self {
        let text = text.into();
        let segments = format_message(&text);
        Self {
            sender: Sender::Ai,
            text,
            segments: Some(segments),
            failed: false,
        }
    }

    pub fn fetch_error() -> Self {
        Self {
            failed: true,
            ..Self::ai(FETCH_ERROR_TEXT)
        }
    }

    pub fn is_user(&self) -> bool {
        self.sender.is_user()
    }

    pub fn is_ai(&self) -> bool {
        self.sender.is_ai()
    }

    /// Segments to render. Messages stored without segments render as one
    /// text segment holding the raw text.
    pub fn segments_or_text(&self) -> Vec<Segment> {
        match &self.segments {
            Some(segments) => segments.clone(),
            None => vec![Segment::text(self.text.clone())],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_messages_serialize_without_segments() {
        let json = serde_json::to_string(&Message::user("Hello")).unwrap();
        assert_eq!(json, r#"{"sender":"user","text":"Hello"}"#);
    }

    #[test]
    fn ai_segments_use_kind_tags() {
        let message = Message::ai("a```b```");
        let json = serde_json::to_value(&message).unwrap();
        assert_eq!(json["sender"], "ai");
        assert_eq!(json["segments"][0]["kind"], "text");
        assert_eq!(json["segments"][0]["content"], "a");
        assert_eq!(json["segments"][1]["kind"], "code");
        assert_eq!(json["segments"][1]["content"], "b");
    }

    #[test]
    fn invalid_sender_strings_are_rejected() {
        assert!(Sender::try_from("assistant").is_err());
        let parsed: Result<Message, _> =
            serde_json::from_str(r#"{"sender":"bot","text":"x"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn fetch_error_is_a_single_text_segment() {
        let message = Message::fetch_error();
        assert!(message.is_ai());
        assert_eq!(
            message.segments,
            Some(vec![Segment::text(FETCH_ERROR_TEXT)])
        );
    }

    #[test]
    fn failure_flag_is_not_serialized() {
        let message = Message::fetch_error();
        assert!(message.failed);
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("failed"));

        let restored: Message = serde_json::from_str(&json).unwrap();
        assert!(!restored.failed);
        assert!(!Message::ai(FETCH_ERROR_TEXT).failed);
    }

    #[test]
    fn user_message_renders_as_plain_text() {
        let message = Message::user("```not code```");
        assert_eq!(
            message.segments_or_text(),
            vec![Segment::text("```not code```")]
        );
    }
}
