//! Document model: a context file attached to a form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An uploaded context document whose extracted text grounds the form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// Form this document is attached to.
    pub form_id: String,

    /// Original filename.
    pub filename: String,

    /// File type tag (pdf, docx, txt).
    pub file_type: String,

    /// Storage locator for the raw bytes.
    pub storage_key: String,

    /// Extracted plain text, when parsing succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parsed_content: Option<String>,

    /// When the document was uploaded.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

impl Document {
    pub fn new(
        form_id: String,
        filename: String,
        file_type: String,
        storage_key: String,
        parsed_content: Option<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            form_id,
            filename,
            file_type,
            storage_key,
            parsed_content,
            created_at: Utc::now(),
        }
    }
}
