//! Form model: a chat-driven form definition owned by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A conversational form definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    /// Unique form identifier.
    #[serde(rename = "_id")]
    pub id: String,

    /// User who owns this form.
    pub user_id: String,

    /// Form title, shown to end users and woven into the system prompt.
    pub title: String,

    /// Optional description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Call-to-action label (e.g., "Book a demo").
    pub cta_type: String,

    /// Ordered field descriptors the conversation steers toward.
    pub fields: Vec<FormField>,

    /// Freeform grounding context for the assistant. Append-only as
    /// documents are attached; never shrinks automatically.
    pub context: String,

    /// Ids of documents whose extracted text was appended to the context.
    pub context_documents: Vec<String>,

    /// Template tag the form was created from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_type: Option<String>,

    /// Embed widget configuration (opaque to the core).
    pub embed_settings: EmbedSettings,

    /// When the form was created.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    /// When the form was last updated.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub updated_at: DateTime<Utc>,
}

/// A single field the form collects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormField {
    /// Human-readable label (e.g., "Work email").
    pub label: String,

    /// Field type tag (e.g., "text", "email", "phone").
    #[serde(rename = "type")]
    pub field_type: String,

    /// Whether the field must be filled before submission.
    #[serde(default)]
    pub required: bool,
}

/// Embed widget configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedSettings {
    pub primary_color: String,
    pub button_text: String,
    pub position: String,
    pub width: String,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            primary_color: "#0ea5e9".to_string(),
            button_text: "Start Chat".to_string(),
            position: "inline".to_string(),
            width: "100%".to_string(),
        }
    }
}

impl Form {
    /// Create a new form for a user.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: String,
        title: String,
        description: Option<String>,
        cta_type: String,
        fields: Vec<FormField>,
        context: String,
        template_type: Option<String>,
        embed_settings: EmbedSettings,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id,
            title,
            description,
            cta_type,
            fields,
            context,
            context_documents: Vec::new(),
            template_type,
            embed_settings,
            created_at: now,
            updated_at: now,
        }
    }

    /// Append extracted document text to the grounding context and attach
    /// the document id. The context only ever grows.
    pub fn attach_document(&mut self, document_id: &str, filename: &str, text: &str) {
        let block = format!("--- Content from {} ---\n{}", filename, text);
        if self.context.is_empty() {
            self.context = block;
        } else {
            self.context.push_str("\n\n");
            self.context.push_str(&block);
        }
        self.context_documents.push(document_id.to_string());
        self.updated_at = Utc::now();
    }

    /// Duplicate this form under the same owner with a "(Copy)" title.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: self.user_id.clone(),
            title: format!("{} (Copy)", self.title),
            description: self.description.clone(),
            cta_type: self.cta_type.clone(),
            fields: self.fields.clone(),
            context: self.context.clone(),
            context_documents: self.context_documents.clone(),
            template_type: self.template_type.clone(),
            embed_settings: self.embed_settings.clone(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_form() -> Form {
        Form::new(
            "user-1".to_string(),
            "Demo Request".to_string(),
            None,
            "Book a demo".to_string(),
            vec![],
            String::new(),
            None,
            EmbedSettings::default(),
        )
    }

    #[test]
    fn attach_document_appends_and_never_shrinks() {
        let mut form = sample_form();
        form.attach_document("doc-1", "pricing.txt", "Plans start at $10");
        let first_len = form.context.len();
        assert!(form.context.starts_with("--- Content from pricing.txt ---"));

        form.attach_document("doc-2", "faq.txt", "Yes, you can cancel anytime");
        assert!(form.context.len() > first_len);
        assert!(form.context.contains("Plans start at $10"));
        assert_eq!(form.context_documents, vec!["doc-1", "doc-2"]);
    }

    #[test]
    fn duplicate_gets_fresh_id_and_copy_title() {
        let form = sample_form();
        let copy = form.duplicate();
        assert_ne!(copy.id, form.id);
        assert_eq!(copy.title, "Demo Request (Copy)");
        assert_eq!(copy.user_id, form.user_id);
    }
}
