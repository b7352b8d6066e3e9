//! Chat endpoints: the HTTP boundary of the conversation-to-lead pipeline.

use crate::dtos::{ChatRequest, ChatResponse, LeadResponse, SubmitRequest};
use crate::models::{AnalyticsEvent, ChatSession, Lead, SessionMessage};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{json, Map};
use service_core::error::AppError;
use validator::Validate;

/// POST /chat/:form_id — advance a conversation by one user turn.
///
/// Creates the session lazily on the first message. The per-session lock is
/// held across the whole read-modify-write so concurrent turns on one
/// session id cannot drop messages.
pub async fn send_message(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(payload): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let form = state.db.require_form(&form_id).await?;

    let lock = state.session_locks.for_session(&payload.session_id);
    let _guard = lock.lock().await;

    let session = match state.db.find_session(&payload.session_id).await? {
        Some(session) => session,
        None => {
            let session = ChatSession::new(
                form_id.clone(),
                payload.session_id.clone(),
                payload.context.clone(),
            );
            state.db.insert_session(&session).await?;
            tracing::info!(
                session_id = %session.session_id,
                form_id = %form_id,
                "Chat session started"
            );
            session
        }
    };

    let turn = state
        .engine
        .advance(&form, &session, &payload.message)
        .await;

    let new_messages = [
        SessionMessage::user(&payload.message),
        SessionMessage::assistant(&turn.message),
    ];
    state
        .db
        .append_session_turn(&payload.session_id, &new_messages, &turn.extracted_data)
        .await?;

    let mut event_data = Map::new();
    event_data.insert("message_length".to_string(), json!(payload.message.len()));
    state
        .db
        .record_event(&AnalyticsEvent::new(
            form_id,
            "message_sent".to_string(),
            event_data,
            Some(payload.session_id),
        ))
        .await?;

    Ok(Json(ChatResponse {
        message: turn.message,
        show_form: turn.show_form,
        extracted_data: turn.extracted_data,
    }))
}

/// POST /chat/:form_id/submit — classify the conversation and capture a lead.
///
/// Submission without a prior conversation is legal: the transcript is then
/// empty. The lead freezes a value copy of the transcript; later session
/// activity never touches it.
pub async fn submit_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(payload): Json<SubmitRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    state.db.require_form(&form_id).await?;

    let lock = state.session_locks.for_session(&payload.session_id);
    let _guard = lock.lock().await;

    let transcript = state
        .db
        .find_session(&payload.session_id)
        .await?
        .map(|session| session.messages)
        .unwrap_or_default();

    let insights = state.classifier.classify(&transcript, &payload.data).await;

    let lead = Lead::new(
        form_id.clone(),
        payload.session_id.clone(),
        payload.data.clone(),
        transcript,
        insights.pain_points,
        insights.buying_signals,
        insights.qualification_level,
    );

    state.db.insert_lead(&lead).await?;

    tracing::info!(
        lead_id = %lead.id,
        form_id = %form_id,
        qualification = ?lead.qualification_level,
        "Lead captured"
    );

    let mut event_data = Map::new();
    event_data.insert("fields_count".to_string(), json!(payload.data.len()));
    state
        .db
        .record_event(&AnalyticsEvent::new(
            form_id,
            "form_completed".to_string(),
            event_data,
            Some(payload.session_id),
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(LeadResponse::from(lead))))
}
