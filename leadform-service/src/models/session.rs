//! Chat session model for conversation state persistence.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One end-user's ongoing chat with a form, keyed by a caller-supplied
/// session id. Created lazily on the first message, mutated on every turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSession {
    /// Unique record identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Form this session belongs to.
    pub form_id: String,

    /// Externally-supplied session identifier (unique).
    pub session_id: String,

    /// Messages in conversation order.
    pub messages: Vec<SessionMessage>,

    /// Accumulated extracted-field key/value pairs (e.g., email, phone).
    pub context_data: HashMap<String, String>,

    /// When the session was started.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub started_at: DateTime<Utc>,

    /// When the session last saw activity.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_activity: DateTime<Utc>,
}

/// A message in a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMessage {
    /// Role: "user" or "assistant".
    pub role: String,

    /// Message content.
    pub content: String,

    /// When the message was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl SessionMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

impl ChatSession {
    /// Create a new session for a form.
    pub fn new(form_id: String, session_id: String, context_data: HashMap<String, String>) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            form_id,
            session_id,
            messages: Vec::new(),
            context_data,
            started_at: now,
            last_activity: now,
        }
    }

    /// Append a message, preserving conversation order.
    pub fn add_message(&mut self, message: SessionMessage) {
        self.messages.push(message);
        self.last_activity = Utc::now();
    }

    /// Merge extracted fields into the accumulated context data.
    /// Last mention wins.
    pub fn merge_context(&mut self, extracted: &HashMap<String, String>) {
        for (key, value) in extracted {
            self.context_data.insert(key.clone(), value.clone());
        }
        if !extracted.is_empty() {
            self.last_activity = Utc::now();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_keep_conversation_order() {
        let mut session = ChatSession::new("f".into(), "s".into(), HashMap::new());
        session.add_message(SessionMessage::user("hello"));
        session.add_message(SessionMessage::assistant("hi there"));
        session.add_message(SessionMessage::user("pricing?"));

        let roles: Vec<&str> = session.messages.iter().map(|m| m.role.as_str()).collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
    }

    #[test]
    fn merge_context_overwrites_existing_keys() {
        let mut session = ChatSession::new("f".into(), "s".into(), HashMap::new());
        session.merge_context(&HashMap::from([("email".to_string(), "a@b.com".to_string())]));
        session.merge_context(&HashMap::from([("email".to_string(), "c@d.com".to_string())]));
        assert_eq!(session.context_data["email"], "c@d.com");
    }
}
