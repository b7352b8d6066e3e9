//! Document endpoints: upload, detail, delete, re-parse.
//!
//! Uploads feed the form's grounding context: extracted text is appended to
//! `form.context` (which only ever grows) and the document id joins
//! `form.context_documents`.

use crate::dtos::DocumentResponse;
use crate::models::Document;
use crate::services::ExtractError;
use crate::startup::AppState;
use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;
use uuid::Uuid;

const ALLOWED_EXTENSIONS: &[&str] = &["pdf", "docx", "txt"];

/// 20MB upload cap.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub async fn upload_document(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let mut file_name: Option<String> = None;
    let mut file_data: Option<Vec<u8>> = None;
    let mut form_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        match field.name() {
            Some("file") => {
                file_name = Some(field.file_name().unwrap_or("unnamed").to_string());
                let data = field.bytes().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                })?;
                file_data = Some(data.to_vec());
            }
            Some("form_id") => {
                form_id = Some(field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read form_id: {}", e))
                })?);
            }
            _ => {}
        }
    }

    let filename =
        file_name.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file provided")))?;
    let data =
        file_data.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No file provided")))?;
    let form_id =
        form_id.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("form_id is required")))?;

    if data.len() > MAX_UPLOAD_BYTES {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "File too large (max 20MB)"
        )));
    }

    let file_type = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("File type not allowed")))?;
    if !ALLOWED_EXTENSIONS.contains(&file_type.as_str()) {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "File type not allowed"
        )));
    }

    let mut form = state.db.require_form(&form_id).await?;

    let storage_key = format!("{}.{}", Uuid::new_v4(), file_type);
    state.storage.upload(&storage_key, data.clone()).await?;

    // Parse failure removes the stored file and surfaces as a client error.
    let parsed_content = match state.extractor.extract(&data, &file_type) {
        Ok(text) => text,
        Err(e) => {
            state.storage.delete(&storage_key).await?;
            return Err(extract_error_to_app(e));
        }
    };

    let document = Document::new(
        form_id.clone(),
        filename.clone(),
        file_type,
        storage_key,
        Some(parsed_content.clone()),
    );

    state.db.insert_document(&document).await?;

    form.attach_document(&document.id, &filename, &parsed_content);
    state.db.replace_form(&form).await?;

    tracing::info!(
        document_id = %document.id,
        form_id = %form_id,
        filename = %document.filename,
        "Document uploaded and attached to form context"
    );

    Ok((StatusCode::CREATED, Json(DocumentResponse::from(document))))
}

pub async fn get_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = state
        .db
        .find_document(&document_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document not found")))?;
    Ok(Json(DocumentResponse::from(document)))
}

pub async fn delete_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let document = state
        .db
        .find_document(&document_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document not found")))?;

    state.storage.delete(&document.storage_key).await?;

    // Detach from the form's context document list; the appended context
    // text itself stays (append-only invariant).
    if let Some(mut form) = state.db.find_form(&document.form_id).await? {
        form.context_documents.retain(|id| id != &document.id);
        state.db.replace_form(&form).await?;
    }

    state.db.delete_document(&document_id).await?;

    tracing::info!(document_id = %document_id, "Document deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /documents/:id/parse — re-run text extraction over the stored bytes.
pub async fn reparse_document(
    State(state): State<AppState>,
    Path(document_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut document = state
        .db
        .find_document(&document_id)
        .await?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Document not found")))?;

    let data = state.storage.download(&document.storage_key).await?;

    let parsed_content = state
        .extractor
        .extract(&data, &document.file_type)
        .map_err(extract_error_to_app)?;

    state
        .db
        .update_document_content(&document_id, &parsed_content)
        .await?;
    document.parsed_content = Some(parsed_content);

    Ok(Json(DocumentResponse::from(document)))
}

fn extract_error_to_app(error: ExtractError) -> AppError {
    AppError::BadRequest(anyhow::anyhow!("Failed to parse document: {}", error))
}
