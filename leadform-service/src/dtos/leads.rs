use crate::models::{ContactInfo, Lead, Qualification, SessionMessage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Manual lead creation (bypasses the conversational pipeline).
#[derive(Debug, Deserialize)]
pub struct CreateLeadRequest {
    pub form_id: String,
    pub session_id: String,

    #[serde(default)]
    pub responses: Map<String, Value>,

    #[serde(default)]
    pub conversation_history: Vec<SessionMessage>,

    #[serde(default)]
    pub pain_points: Vec<String>,

    #[serde(default)]
    pub buying_signals: Vec<String>,

    #[serde(default)]
    pub qualification_level: Qualification,
}

#[derive(Debug, Serialize)]
pub struct LeadResponse {
    pub id: String,
    pub form_id: String,
    pub session_id: String,
    pub contact_info: ContactInfo,
    pub responses: Map<String, Value>,
    pub conversation_history: Vec<SessionMessage>,
    pub pain_points: Vec<String>,
    pub buying_signals: Vec<String>,
    pub qualification_level: Qualification,
    pub created_at: DateTime<Utc>,
}

impl From<Lead> for LeadResponse {
    fn from(lead: Lead) -> Self {
        Self {
            id: lead.id,
            form_id: lead.form_id,
            session_id: lead.session_id,
            contact_info: lead.contact_info,
            responses: lead.responses,
            conversation_history: lead.conversation_history,
            pain_points: lead.pain_points,
            buying_signals: lead.buying_signals,
            qualification_level: lead.qualification_level,
            created_at: lead.created_at,
        }
    }
}
