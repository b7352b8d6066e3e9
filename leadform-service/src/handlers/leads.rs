//! Lead endpoints: listing, detail, manual creation and CSV export.

use crate::dtos::{CreateLeadRequest, LeadResponse};
use crate::middleware::user_id::UserId;
use crate::models::{Lead, Qualification};
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use service_core::error::AppError;

#[derive(Debug, Deserialize)]
pub struct LeadListParams {
    pub form_id: Option<String>,
}

pub async fn list_leads(
    State(state): State<AppState>,
    user_id: UserId,
    Query(params): Query<LeadListParams>,
) -> Result<impl IntoResponse, AppError> {
    let leads = match params.form_id {
        Some(form_id) => state.db.list_leads_for_form(&form_id).await?,
        None => {
            let forms = state.db.list_forms_for_user(&user_id.0).await?;
            let form_ids: Vec<String> = forms.into_iter().map(|f| f.id).collect();
            state.db.list_leads_for_forms(&form_ids).await?
        }
    };

    let responses: Vec<LeadResponse> = leads.into_iter().map(LeadResponse::from).collect();
    Ok(Json(responses))
}

pub async fn get_lead(
    State(state): State<AppState>,
    Path(lead_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let lead = state
        .db
        .find_lead(&lead_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Lead not found")))?;
    Ok(Json(LeadResponse::from(lead)))
}

pub async fn create_lead(
    State(state): State<AppState>,
    Json(payload): Json<CreateLeadRequest>,
) -> Result<impl IntoResponse, AppError> {
    let lead = Lead::new(
        payload.form_id,
        payload.session_id,
        payload.responses,
        payload.conversation_history,
        payload.pain_points,
        payload.buying_signals,
        payload.qualification_level,
    );

    state.db.insert_lead(&lead).await?;

    Ok((StatusCode::CREATED, Json(LeadResponse::from(lead))))
}

/// GET /leads/export/:form_id — all of a form's leads as CSV, newest first.
pub async fn export_leads_csv(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.db.require_form(&form_id).await?;
    let leads = state.db.list_leads_for_form(&form_id).await?;

    let csv = render_leads_csv(&leads);
    let filename = format!(
        "leads_{}_{}.csv",
        form_id,
        chrono::Utc::now().format("%Y%m%d")
    );

    tracing::info!(form_id = %form_id, lead_count = leads.len(), "Leads exported");

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        csv,
    ))
}

fn render_leads_csv(leads: &[Lead]) -> String {
    let mut out = String::new();
    write_csv_row(
        &mut out,
        &[
            "ID",
            "Name",
            "Email",
            "Phone",
            "Qualification Level",
            "Pain Points",
            "Buying Signals",
            "Created At",
        ],
    );

    for lead in leads {
        let qualification = match lead.qualification_level {
            Qualification::Hot => "hot",
            Qualification::Warm => "warm",
            Qualification::Cold => "cold",
        };
        write_csv_row(
            &mut out,
            &[
                &lead.id,
                lead.contact_info.name.as_deref().unwrap_or(""),
                lead.contact_info.email.as_deref().unwrap_or(""),
                lead.contact_info.phone.as_deref().unwrap_or(""),
                qualification,
                &lead.pain_points.join("; "),
                &lead.buying_signals.join("; "),
                &lead.created_at.to_rfc3339(),
            ],
        );
    }

    out
}

fn write_csv_row(out: &mut String, fields: &[&str]) {
    for (i, field) in fields.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&csv_escape(field));
    }
    out.push_str("\r\n");
}

/// RFC 4180 quoting: quote fields containing commas, quotes or newlines.
fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn escapes_only_when_needed() {
        assert_eq!(csv_escape("plain"), "plain");
        assert_eq!(csv_escape("a,b"), "\"a,b\"");
        assert_eq!(csv_escape("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(csv_escape("line\nbreak"), "\"line\nbreak\"");
    }

    #[test]
    fn renders_header_and_joined_lists() {
        let mut responses = Map::new();
        responses.insert("name".to_string(), serde_json::json!("Ada, Countess"));

        let lead = Lead::new(
            "form-1".to_string(),
            "sess-1".to_string(),
            responses,
            vec![],
            vec!["cost".to_string(), "onboarding time".to_string()],
            vec!["budget approved".to_string()],
            Qualification::Warm,
        );

        let csv = render_leads_csv(&[lead]);
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "ID,Name,Email,Phone,Qualification Level,Pain Points,Buying Signals,Created At"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("\"Ada, Countess\""));
        assert!(row.contains("cost; onboarding time"));
        assert!(row.contains("warm"));
    }
}
