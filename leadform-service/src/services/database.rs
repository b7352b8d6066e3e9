//! Database operations for the leadform service.
//!
//! Handles forms, chat sessions, leads, analytics events and documents via
//! MongoDB.

use crate::models::{AnalyticsEvent, ChatSession, Document, Form, Lead, SessionMessage};
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, Document as BsonDocument},
    options::{FindOptions, IndexOptions},
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;
use std::collections::HashMap;

#[derive(Clone)]
pub struct LeadformDb {
    client: MongoClient,
    db: Database,
}

impl LeadformDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(uri = %uri, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB at {}: {}", uri, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for leadform-service");

        self.create_index(self.forms(), doc! { "user_id": 1, "created_at": -1 }, "user_created_idx", false)
            .await?;
        self.create_index(self.sessions(), doc! { "session_id": 1 }, "session_id_idx", true)
            .await?;
        self.create_index(self.sessions(), doc! { "form_id": 1 }, "session_form_idx", false)
            .await?;
        self.create_index(self.leads(), doc! { "form_id": 1, "created_at": -1 }, "lead_form_created_idx", false)
            .await?;
        self.create_index(
            self.analytics(),
            doc! { "form_id": 1, "event_type": 1, "timestamp": -1 },
            "event_form_type_time_idx",
            false,
        )
        .await?;
        self.create_index(self.documents(), doc! { "form_id": 1 }, "document_form_idx", false)
            .await?;

        tracing::info!("Successfully created all MongoDB indexes");
        Ok(())
    }

    async fn create_index<T>(
        &self,
        collection: Collection<T>,
        keys: BsonDocument,
        name: &str,
        unique: bool,
    ) -> Result<(), AppError> {
        let index = IndexModel::builder()
            .keys(keys)
            .options(
                IndexOptions::builder()
                    .name(name.to_string())
                    .unique(unique)
                    .build(),
            )
            .build();

        collection.create_index(index, None).await.map_err(|e| {
            tracing::error!("Failed to create index {}: {}", name, e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    // Collection accessors

    pub fn forms(&self) -> Collection<Form> {
        self.db.collection("forms")
    }

    pub fn sessions(&self) -> Collection<ChatSession> {
        self.db.collection("chat_sessions")
    }

    pub fn leads(&self) -> Collection<Lead> {
        self.db.collection("leads")
    }

    pub fn analytics(&self) -> Collection<AnalyticsEvent> {
        self.db.collection("analytics")
    }

    pub fn documents(&self) -> Collection<Document> {
        self.db.collection("documents")
    }

    // Form operations

    pub async fn insert_form(&self, form: &Form) -> Result<(), AppError> {
        self.forms().insert_one(form, None).await.map_err(|e| {
            tracing::error!("Failed to insert form: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        Ok(())
    }

    pub async fn find_form(&self, form_id: &str) -> Result<Option<Form>, AppError> {
        self.forms()
            .find_one(doc! { "_id": form_id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find form: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }

    /// Fetch a form or fail with NotFound.
    pub async fn require_form(&self, form_id: &str) -> Result<Form, AppError> {
        self.find_form(form_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Form not found")))
    }

    pub async fn list_forms_for_user(&self, user_id: &str) -> Result<Vec<Form>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .forms()
            .find(doc! { "user_id": user_id }, options)
            .await
            .map_err(AppError::from)?;
        cursor.try_collect().await.map_err(AppError::from)
    }

    pub async fn replace_form(&self, form: &Form) -> Result<(), AppError> {
        self.forms()
            .replace_one(doc! { "_id": &form.id }, form, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to replace form {}: {}", form.id, e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    /// Delete a form and everything hanging off it: leads, analytics
    /// events, documents and chat sessions.
    pub async fn delete_form_cascade(&self, form_id: &str) -> Result<bool, AppError> {
        let result = self
            .forms()
            .delete_one(doc! { "_id": form_id }, None)
            .await
            .map_err(AppError::from)?;

        if result.deleted_count == 0 {
            return Ok(false);
        }

        let filter = doc! { "form_id": form_id };
        self.leads()
            .delete_many(filter.clone(), None)
            .await
            .map_err(AppError::from)?;
        self.analytics()
            .delete_many(filter.clone(), None)
            .await
            .map_err(AppError::from)?;
        self.documents()
            .delete_many(filter.clone(), None)
            .await
            .map_err(AppError::from)?;
        self.sessions()
            .delete_many(filter, None)
            .await
            .map_err(AppError::from)?;

        tracing::info!(form_id = %form_id, "Form deleted with cascade");
        Ok(true)
    }

    // Session operations

    pub async fn insert_session(&self, session: &ChatSession) -> Result<(), AppError> {
        self.sessions()
            .insert_one(session, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert session: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    pub async fn find_session(&self, session_id: &str) -> Result<Option<ChatSession>, AppError> {
        self.sessions()
            .find_one(doc! { "session_id": session_id }, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find session: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })
    }

    /// Append a turn's messages and merge extracted context data into an
    /// existing session.
    pub async fn append_session_turn(
        &self,
        session_id: &str,
        messages: &[SessionMessage],
        extracted: &HashMap<String, String>,
    ) -> Result<(), AppError> {
        let message_docs: Vec<BsonDocument> = messages
            .iter()
            .map(|m| {
                mongodb::bson::to_document(m).map_err(|e| {
                    tracing::error!("Failed to serialize message: {}", e);
                    AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
                })
            })
            .collect::<Result<_, _>>()?;

        // Timestamps are stored as epoch millis (ts_milliseconds serde).
        let mut set_doc = doc! { "last_activity": Utc::now().timestamp_millis() };
        for (key, value) in extracted {
            set_doc.insert(format!("context_data.{}", key), Bson::String(value.clone()));
        }

        self.sessions()
            .update_one(
                doc! { "session_id": session_id },
                doc! {
                    "$push": { "messages": { "$each": message_docs } },
                    "$set": set_doc,
                },
                None,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to append turn to session: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;

        Ok(())
    }

    // Lead operations

    pub async fn insert_lead(&self, lead: &Lead) -> Result<(), AppError> {
        self.leads().insert_one(lead, None).await.map_err(|e| {
            tracing::error!("Failed to insert lead: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        Ok(())
    }

    pub async fn find_lead(&self, lead_id: &str) -> Result<Option<Lead>, AppError> {
        self.leads()
            .find_one(doc! { "_id": lead_id }, None)
            .await
            .map_err(AppError::from)
    }

    pub async fn list_leads_for_form(&self, form_id: &str) -> Result<Vec<Lead>, AppError> {
        self.list_leads(doc! { "form_id": form_id }).await
    }

    pub async fn list_leads_for_forms(&self, form_ids: &[String]) -> Result<Vec<Lead>, AppError> {
        self.list_leads(doc! { "form_id": { "$in": form_ids } })
            .await
    }

    async fn list_leads(&self, filter: BsonDocument) -> Result<Vec<Lead>, AppError> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();
        let cursor = self
            .leads()
            .find(filter, options)
            .await
            .map_err(AppError::from)?;
        cursor.try_collect().await.map_err(AppError::from)
    }

    pub async fn count_leads_for_forms(&self, form_ids: &[String]) -> Result<u64, AppError> {
        self.leads()
            .count_documents(doc! { "form_id": { "$in": form_ids } }, None)
            .await
            .map_err(AppError::from)
    }

    // Analytics operations

    pub async fn record_event(&self, event: &AnalyticsEvent) -> Result<(), AppError> {
        self.analytics().insert_one(event, None).await.map_err(|e| {
            tracing::error!("Failed to record analytics event: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        Ok(())
    }

    /// Count events of one type for a single form since `start`.
    pub async fn count_events(
        &self,
        form_id: &str,
        event_type: &str,
        start: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        self.analytics()
            .count_documents(
                doc! {
                    "form_id": form_id,
                    "event_type": event_type,
                    "timestamp": { "$gte": start.timestamp_millis() }
                },
                None,
            )
            .await
            .map_err(AppError::from)
    }

    /// Count events of one type across several forms since `start`.
    pub async fn count_events_for_forms(
        &self,
        form_ids: &[String],
        event_type: &str,
        start: DateTime<Utc>,
    ) -> Result<u64, AppError> {
        self.analytics()
            .count_documents(
                doc! {
                    "form_id": { "$in": form_ids },
                    "event_type": event_type,
                    "timestamp": { "$gte": start.timestamp_millis() }
                },
                None,
            )
            .await
            .map_err(AppError::from)
    }

    // Document operations

    pub async fn insert_document(&self, document: &Document) -> Result<(), AppError> {
        self.documents()
            .insert_one(document, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to insert document: {}", e);
                AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
            })?;
        Ok(())
    }

    pub async fn find_document(&self, document_id: &str) -> Result<Option<Document>, AppError> {
        self.documents()
            .find_one(doc! { "_id": document_id }, None)
            .await
            .map_err(AppError::from)
    }

    pub async fn update_document_content(
        &self,
        document_id: &str,
        parsed_content: &str,
    ) -> Result<(), AppError> {
        self.documents()
            .update_one(
                doc! { "_id": document_id },
                doc! { "$set": { "parsed_content": parsed_content } },
                None,
            )
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<bool, AppError> {
        let result = self
            .documents()
            .delete_one(doc! { "_id": document_id }, None)
            .await
            .map_err(AppError::from)?;
        Ok(result.deleted_count > 0)
    }
}
