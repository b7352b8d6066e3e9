//! Form CRUD endpoints (owner-facing).

use crate::dtos::{CreateFormRequest, FormResponse, UpdateFormRequest};
use crate::middleware::user_id::UserId;
use crate::models::Form;
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use validator::Validate;

pub async fn list_forms(
    State(state): State<AppState>,
    user_id: UserId,
) -> Result<impl IntoResponse, AppError> {
    let forms = state.db.list_forms_for_user(&user_id.0).await?;
    let responses: Vec<FormResponse> = forms.into_iter().map(FormResponse::from).collect();
    Ok(Json(responses))
}

pub async fn get_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let form = state.db.require_form(&form_id).await?;
    Ok(Json(FormResponse::from(form)))
}

pub async fn create_form(
    State(state): State<AppState>,
    user_id: UserId,
    Json(payload): Json<CreateFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let form = Form::new(
        user_id.0,
        payload.title,
        payload.description,
        payload.cta_type,
        payload.fields,
        payload.context,
        payload.template_type,
        payload.embed_settings,
    );

    state.db.insert_form(&form).await?;

    tracing::info!(form_id = %form.id, title = %form.title, "Form created");

    Ok((StatusCode::CREATED, Json(FormResponse::from(form))))
}

pub async fn update_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(payload): Json<UpdateFormRequest>,
) -> Result<impl IntoResponse, AppError> {
    let mut form = state.db.require_form(&form_id).await?;

    if let Some(title) = payload.title {
        form.title = title;
    }
    if let Some(description) = payload.description {
        form.description = Some(description);
    }
    if let Some(cta_type) = payload.cta_type {
        form.cta_type = cta_type;
    }
    if let Some(fields) = payload.fields {
        form.fields = fields;
    }
    if let Some(context) = payload.context {
        form.context = context;
    }
    if let Some(context_documents) = payload.context_documents {
        form.context_documents = context_documents;
    }
    if let Some(embed_settings) = payload.embed_settings {
        form.embed_settings = embed_settings;
    }
    form.updated_at = Utc::now();

    state.db.replace_form(&form).await?;

    Ok(Json(FormResponse::from(form)))
}

pub async fn delete_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    state.db.require_form(&form_id).await?;

    // Remove stored files before dropping the document records.
    let cursor = state
        .db
        .documents()
        .find(mongodb::bson::doc! { "form_id": &form_id }, None)
        .await
        .map_err(AppError::from)?;
    let documents: Vec<crate::models::Document> = futures::TryStreamExt::try_collect(cursor)
        .await
        .map_err(AppError::from)?;
    for document in &documents {
        state.storage.delete(&document.storage_key).await?;
    }

    if !state.db.delete_form_cascade(&form_id).await? {
        return Err(AppError::NotFound(anyhow::anyhow!("Form not found")));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn duplicate_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let original = state.db.require_form(&form_id).await?;
    let copy = original.duplicate();

    state.db.insert_form(&copy).await?;

    tracing::info!(form_id = %copy.id, source = %form_id, "Form duplicated");

    Ok((StatusCode::CREATED, Json(FormResponse::from(copy))))
}
