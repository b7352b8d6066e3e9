//! Analytics endpoints: per-form stats, dashboard aggregation, tracking.

use crate::dtos::analytics::{
    DashboardStatsResponse, FormAnalyticsResponse, ObjectionCount, QuestionCount,
    TrackEventRequest,
};
use crate::middleware::user_id::UserId;
use crate::models::AnalyticsEvent;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use serde::Deserialize;
use serde_json::json;
use service_core::error::AppError;
use std::collections::HashMap;

/// Placeholder until real session-duration tracking exists.
const AVG_COMPLETION_TIME_SECS: u64 = 120;

#[derive(Debug, Deserialize)]
pub struct AnalyticsParams {
    pub days: Option<i64>,
}

pub async fn get_form_analytics(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Query(params): Query<AnalyticsParams>,
) -> Result<impl IntoResponse, AppError> {
    state.db.require_form(&form_id).await?;

    let days = params.days.unwrap_or(30).max(1);
    let start = Utc::now() - Duration::days(days);

    let total_views = state.db.count_events(&form_id, "form_view", start).await?;
    let total_completions = state
        .db
        .count_events(&form_id, "form_completed", start)
        .await?;

    let completion_rate = if total_views > 0 {
        total_completions as f64 / total_views as f64
    } else {
        0.0
    };

    // Pain-point counts across the form's leads, top 5.
    let leads = state.db.list_leads_for_form(&form_id).await?;
    let mut objections: HashMap<String, u64> = HashMap::new();
    for lead in &leads {
        for pain_point in &lead.pain_points {
            *objections.entry(pain_point.clone()).or_default() += 1;
        }
    }
    let mut common_objections: Vec<ObjectionCount> = objections
        .into_iter()
        .map(|(objection, count)| ObjectionCount { objection, count })
        .collect();
    common_objections.sort_by(|a, b| b.count.cmp(&a.count).then(a.objection.cmp(&b.objection)));
    common_objections.truncate(5);

    Ok(Json(FormAnalyticsResponse {
        form_id,
        total_views,
        total_completions,
        completion_rate,
        drop_off_rate: 1.0 - completion_rate,
        avg_completion_time: AVG_COMPLETION_TIME_SECS,
        top_questions: placeholder_top_questions(),
        common_objections,
    }))
}

pub async fn get_dashboard_stats(
    State(state): State<AppState>,
    user_id: UserId,
) -> Result<impl IntoResponse, AppError> {
    let forms = state.db.list_forms_for_user(&user_id.0).await?;
    let form_ids: Vec<String> = forms.iter().map(|f| f.id.clone()).collect();

    if form_ids.is_empty() {
        return Ok(Json(DashboardStatsResponse {
            total_views: 0,
            total_completions: 0,
            completion_rate: 0.0,
            avg_completion_time: 0,
            total_forms: 0,
            total_leads: 0,
        }));
    }

    let start = Utc::now() - Duration::days(30);

    let total_views = state
        .db
        .count_events_for_forms(&form_ids, "form_view", start)
        .await?;
    let total_completions = state
        .db
        .count_events_for_forms(&form_ids, "form_completed", start)
        .await?;
    let total_leads = state.db.count_leads_for_forms(&form_ids).await?;

    let completion_rate = if total_views > 0 {
        total_completions as f64 / total_views as f64
    } else {
        0.0
    };

    Ok(Json(DashboardStatsResponse {
        total_views,
        total_completions,
        completion_rate,
        avg_completion_time: AVG_COMPLETION_TIME_SECS,
        total_forms: form_ids.len() as u64,
        total_leads,
    }))
}

pub async fn track_event(
    State(state): State<AppState>,
    Json(payload): Json<TrackEventRequest>,
) -> Result<impl IntoResponse, AppError> {
    let event = AnalyticsEvent::new(
        payload.form_id,
        payload.event_type,
        payload.event_data,
        payload.session_id,
    );

    state.db.record_event(&event).await?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

fn placeholder_top_questions() -> Vec<QuestionCount> {
    // Static list carried over until message mining lands.
    [
        ("What are your pricing plans?", 15),
        ("Do you offer a free trial?", 12),
        ("How long does implementation take?", 10),
        ("What integrations do you support?", 8),
        ("Can I cancel anytime?", 6),
    ]
    .into_iter()
    .map(|(question, count)| QuestionCount {
        question: question.to_string(),
        count,
    })
    .collect()
}
