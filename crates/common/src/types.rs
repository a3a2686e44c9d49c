use serde::{Deserialize, Serialize};

/// An image attached to an inbound message.
///
/// The router only cares that images are present; handlers downstream read
/// the payload itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAttachment {
    pub media_type: String,
    /// Base64 payload or a channel-specific media URL.
    pub data: String,
}

/// Who authored an entry of the text-only conversation history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryRole {
    User,
    Assistant,
}

/// One text entry of the conversation so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: HistoryRole,
    pub content: String,
}

impl HistoryMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::Assistant,
            content: content.into(),
        }
    }
}

/// The message received this turn. Never mutated while a turn is routed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnInput {
    /// Free-text body, possibly empty for image-only messages.
    #[serde(default)]
    pub body: String,
    /// Quick-reply / button token, when the user pressed one.
    #[serde(default)]
    pub button: Option<String>,
    #[serde(default)]
    pub images: Vec<ImageAttachment>,
    /// Earlier text turns of the conversation, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryMessage>,
}

impl TurnInput {
    pub fn text(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            ..Self::default()
        }
    }

    pub fn button(token: impl Into<String>) -> Self {
        Self {
            button: Some(token.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_images(mut self, images: Vec<ImageAttachment>) -> Self {
        self.images = images;
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: Vec<HistoryMessage>) -> Self {
        self.history = history;
        self
    }

    pub fn has_images(&self) -> bool {
        !self.images.is_empty()
    }

    /// History plus this turn's body (when non-blank), as sent to the classifier.
    pub fn text_history(&self) -> Vec<HistoryMessage> {
        let mut history = self.history.clone();
        if !self.body.trim().is_empty() {
            history.push(HistoryMessage::user(self.body.clone()));
        }
        history
    }
}

/// A reply produced directly by routing, delivered by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplyPayload {
    Text { text: String },
}

impl ReplyPayload {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_serializes_with_type_tag() {
        let json = serde_json::to_value(ReplyPayload::text("hi")).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "text", "text": "hi" }));
    }

    #[test]
    fn text_history_appends_current_body() {
        let turn = TurnInput::text("what goes with olive chinos?")
            .with_history(vec![HistoryMessage::assistant("Hey! How can I help?")]);
        let history = turn.text_history();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1], HistoryMessage::user("what goes with olive chinos?"));
    }

    #[test]
    fn text_history_skips_blank_body() {
        let turn = TurnInput::text("   ");
        assert!(turn.text_history().is_empty());
    }
}
