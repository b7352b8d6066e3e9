use crate::models::{EmbedSettings, Form, FormField};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateFormRequest {
    #[validate(length(min = 1, max = 200, message = "title is required"))]
    pub title: String,

    pub description: Option<String>,

    #[serde(default = "default_cta")]
    pub cta_type: String,

    #[serde(default)]
    pub fields: Vec<FormField>,

    #[serde(default)]
    pub context: String,

    pub template_type: Option<String>,

    #[serde(default)]
    pub embed_settings: EmbedSettings,
}

fn default_cta() -> String {
    "Submit".to_string()
}

/// Partial form update; absent fields are left untouched.
#[derive(Debug, Deserialize)]
pub struct UpdateFormRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub cta_type: Option<String>,
    pub fields: Option<Vec<FormField>>,
    pub context: Option<String>,
    pub context_documents: Option<Vec<String>>,
    pub embed_settings: Option<EmbedSettings>,
}

#[derive(Debug, Serialize)]
pub struct FormResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub cta_type: String,
    pub fields: Vec<FormField>,
    pub context: String,
    pub context_documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,
    pub embed_settings: EmbedSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Form> for FormResponse {
    fn from(form: Form) -> Self {
        Self {
            id: form.id,
            user_id: form.user_id,
            title: form.title,
            description: form.description,
            cta_type: form.cta_type,
            fields: form.fields,
            context: form.context,
            context_documents: form.context_documents,
            template_type: form.template_type,
            embed_settings: form.embed_settings,
            created_at: form.created_at,
            updated_at: form.updated_at,
        }
    }
}
