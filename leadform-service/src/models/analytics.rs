//! Analytics event model. Append-only; never updated or deleted by the core.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single tracked event against a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsEvent {
    /// Unique event identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Form the event belongs to.
    pub form_id: String,

    /// Free-form event tag: form_view, message_sent, form_completed, ...
    pub event_type: String,

    /// Opaque event payload.
    pub event_data: Map<String, Value>,

    /// Session the event occurred in, when applicable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// When the event occurred.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn new(
        form_id: String,
        event_type: String,
        event_data: Map<String, Value>,
        session_id: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            form_id,
            event_type,
            event_data,
            session_id,
            timestamp: Utc::now(),
        }
    }
}
