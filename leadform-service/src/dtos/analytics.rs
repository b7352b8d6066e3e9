use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Body of POST /analytics/track.
#[derive(Debug, Deserialize)]
pub struct TrackEventRequest {
    pub form_id: String,
    pub event_type: String,

    #[serde(default)]
    pub event_data: Map<String, Value>,

    pub session_id: Option<String>,
}

/// Per-form analytics over a time window.
#[derive(Debug, Serialize)]
pub struct FormAnalyticsResponse {
    pub form_id: String,
    pub total_views: u64,
    pub total_completions: u64,
    pub completion_rate: f64,
    pub drop_off_rate: f64,
    pub avg_completion_time: u64,
    pub top_questions: Vec<QuestionCount>,
    pub common_objections: Vec<ObjectionCount>,
}

#[derive(Debug, Serialize)]
pub struct QuestionCount {
    pub question: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct ObjectionCount {
    pub objection: String,
    pub count: u64,
}

/// Aggregate stats across all of a user's forms.
#[derive(Debug, Serialize)]
pub struct DashboardStatsResponse {
    pub total_views: u64,
    pub total_completions: u64,
    pub completion_rate: f64,
    pub avg_completion_time: u64,
    pub total_forms: u64,
    pub total_leads: u64,
}
