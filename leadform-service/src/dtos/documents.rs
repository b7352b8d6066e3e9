use crate::models::Document;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Document metadata; parsed text stays server-side.
#[derive(Debug, Serialize)]
pub struct DocumentResponse {
    pub id: String,
    pub form_id: String,
    pub filename: String,
    pub file_type: String,
    pub created_at: DateTime<Utc>,
}

impl From<Document> for DocumentResponse {
    fn from(document: Document) -> Self {
        Self {
            id: document.id,
            form_id: document.form_id,
            filename: document.filename,
            file_type: document.file_type,
            created_at: document.created_at,
        }
    }
}
