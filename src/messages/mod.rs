mod conversations;
mod send;
pub mod store;
mod thread;

use axum::{Router, routing::{get, post}};
use serde::Serialize;
use serde_json::Value;

use crate::{AppState, Issue, db::{ChatMessage, Profile}, validate::{Fields, Validate}};

pub use conversations::{get_conversations, list_conversations};
pub use send::send_message;
pub use thread::{get_thread, read_thread};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/conversations", get(conversations::get_conversations))
        .route("/messages", post(send::send_message))
        .route("/messages/{partner_id}", get(thread::get_thread))
}

/// Someone the user has exchanged messages with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversation {
    pub partner: Profile,
    pub last_message: Option<ChatMessage>,
    /// Messages from `partner` the user has not opened yet.
    pub unread_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub receiver_id: String,
    pub message: String,
}

impl Validate for NewMessage {
    fn validate(body: &Value) -> Result<Self, Vec<Issue>> {
        let mut fields = Fields::new(body)?;

        let receiver_id = fields.required_str("receiver_id", "Receiver is required");
        let message = fields.required_str("message", "Message cannot be empty");

        fields.finish()?;
        Ok(NewMessage { receiver_id, message })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::NewMessage;
    use crate::validate::Validate;

    #[test]
    fn empty_message_is_rejected() {
        let issues = NewMessage::validate(&json!({ "receiver_id": "bob", "message": "" })).unwrap_err();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "too_small");
        assert_eq!(issues[0].message, "Message cannot be empty");
    }

    #[test]
    fn receiver_is_required() {
        let issues = NewMessage::validate(&json!({ "message": "hi" })).unwrap_err();
        assert_eq!(issues[0].path, ["receiver_id"]);

        let issues = NewMessage::validate(&json!({ "receiver_id": "", "message": "hi" })).unwrap_err();
        assert_eq!(issues[0].message, "Receiver is required");
    }
}
