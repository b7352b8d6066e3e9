//! Lead model: the classified outcome of a completed conversation.

use crate::models::SessionMessage;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sales-readiness tier for a lead. Defaults to cold whenever
/// classification cannot be completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Qualification {
    Hot,
    Warm,
    #[default]
    Cold,
}

/// Contact details collected during the conversation, possibly partial.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// A captured lead. Created exactly once at submission time and immutable
/// thereafter; `conversation_history` is a snapshot, never a live reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    /// Unique lead identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Form the lead came from.
    pub form_id: String,

    /// Session the conversation ran under.
    pub session_id: String,

    /// Contact details, possibly partial.
    pub contact_info: ContactInfo,

    /// Raw submitted field values.
    pub responses: Map<String, Value>,

    /// Frozen copy of the transcript at submission time.
    pub conversation_history: Vec<SessionMessage>,

    /// Pain points identified by the classifier.
    pub pain_points: Vec<String>,

    /// Buying signals identified by the classifier.
    pub buying_signals: Vec<String>,

    /// Sales-readiness tier.
    pub qualification_level: Qualification,

    /// When the lead was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Lead {
    /// Build a lead from submitted fields, a transcript snapshot, and the
    /// classifier's insights.
    pub fn new(
        form_id: String,
        session_id: String,
        responses: Map<String, Value>,
        conversation_history: Vec<SessionMessage>,
        pain_points: Vec<String>,
        buying_signals: Vec<String>,
        qualification_level: Qualification,
    ) -> Self {
        let contact_info = ContactInfo {
            name: string_field(&responses, "name"),
            email: string_field(&responses, "email"),
            phone: string_field(&responses, "phone"),
        };

        Self {
            id: uuid::Uuid::new_v4().to_string(),
            form_id,
            session_id,
            contact_info,
            responses,
            conversation_history,
            pain_points,
            buying_signals,
            qualification_level,
            created_at: Utc::now(),
        }
    }
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(|v| v.as_str()).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn contact_info_pulled_from_responses() {
        let mut responses = Map::new();
        responses.insert("name".to_string(), json!("Ada"));
        responses.insert("email".to_string(), json!("ada@example.com"));
        responses.insert("company".to_string(), json!("Analytical Engines"));

        let lead = Lead::new(
            "form-1".to_string(),
            "sess-1".to_string(),
            responses,
            vec![],
            vec![],
            vec![],
            Qualification::Cold,
        );

        assert_eq!(lead.contact_info.name.as_deref(), Some("Ada"));
        assert_eq!(lead.contact_info.email.as_deref(), Some("ada@example.com"));
        assert!(lead.contact_info.phone.is_none());
    }

    #[test]
    fn qualification_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Qualification::Hot).unwrap(),
            "\"hot\""
        );
        let parsed: Qualification = serde_json::from_str("\"warm\"").unwrap();
        assert_eq!(parsed, Qualification::Warm);
        assert!(serde_json::from_str::<Qualification>("\"lukewarm\"").is_err());
    }
}
