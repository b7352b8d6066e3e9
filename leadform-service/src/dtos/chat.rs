use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use validator::Validate;

/// Body of POST /chat/:form_id.
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(length(min = 1, message = "session_id is required"))]
    pub session_id: String,

    #[validate(length(min = 1, message = "message is required"))]
    pub message: String,

    /// Context data seeded by the widget (e.g., page URL).
    #[serde(default)]
    pub context: HashMap<String, String>,
}

/// Reply to a chat turn.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub show_form: bool,
    pub extracted_data: HashMap<String, String>,
}

/// Body of POST /chat/:form_id/submit.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmitRequest {
    #[validate(length(min = 1, message = "session_id is required"))]
    pub session_id: String,

    /// Raw submitted field values.
    #[serde(default)]
    pub data: Map<String, Value>,
}
