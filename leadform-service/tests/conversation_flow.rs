//! End-to-end conversation-to-lead flow against a scripted provider.
//!
//! Exercises the same orchestration the chat handlers perform: advance the
//! session turn by turn, merge extracted data, then classify at submission
//! and freeze the transcript into a lead.

use leadform_service::models::{
    ChatSession, EmbedSettings, Form, FormField, Lead, Qualification, SessionMessage,
};
use leadform_service::services::providers::mock::MockChatProvider;
use leadform_service::services::providers::GenerationParams;
use leadform_service::services::{ConversationEngine, LeadClassifier};
use serde_json::{json, Map};
use std::collections::HashMap;
use std::sync::Arc;

fn demo_form() -> Form {
    Form::new(
        "owner-1".to_string(),
        "Consulting Intake".to_string(),
        Some("Qualify consulting prospects".to_string()),
        "Request a consultation".to_string(),
        vec![
            FormField {
                label: "Name".to_string(),
                field_type: "text".to_string(),
                required: true,
            },
            FormField {
                label: "Email".to_string(),
                field_type: "email".to_string(),
                required: true,
            },
        ],
        "We offer data engineering consulting.".to_string(),
        None,
        EmbedSettings::default(),
    )
}

fn chat_params() -> GenerationParams {
    GenerationParams {
        temperature: 0.7,
        max_tokens: 200,
    }
}

fn analysis_params() -> GenerationParams {
    GenerationParams {
        temperature: 0.3,
        max_tokens: 500,
    }
}

#[tokio::test]
async fn conversation_accumulates_and_submission_freezes_a_lead() {
    let chat_provider = Arc::new(MockChatProvider::with_reply(
        "Happy to help with your data platform.",
    ));
    let engine = ConversationEngine::new(chat_provider, chat_params());

    let form = demo_form();
    let mut session = ChatSession::new(
        form.id.clone(),
        "widget-sess-42".to_string(),
        HashMap::new(),
    );

    // Turn 1: plain question, nothing extracted, form stays hidden.
    let turn = engine
        .advance(&form, &session, "Do you work with Postgres?")
        .await;
    assert!(!turn.show_form);
    assert!(turn.extracted_data.is_empty());
    session.add_message(SessionMessage::user("Do you work with Postgres?"));
    session.add_message(SessionMessage::assistant(&turn.message));
    session.merge_context(&turn.extracted_data);

    // Turn 2: readiness keyword plus contact details.
    let turn = engine
        .advance(
            &form,
            &session,
            "I'm interested - reach me at ada@example.com or 555-123-4567",
        )
        .await;
    assert!(turn.show_form);
    assert_eq!(turn.extracted_data["email"], "ada@example.com");
    assert_eq!(turn.extracted_data["phone"], "555-123-4567");
    session.add_message(SessionMessage::user(
        "I'm interested - reach me at ada@example.com or 555-123-4567",
    ));
    session.add_message(SessionMessage::assistant(&turn.message));
    session.merge_context(&turn.extracted_data);

    assert_eq!(session.context_data["email"], "ada@example.com");
    assert_eq!(session.messages.len(), 4);

    // Submission: classify and freeze the transcript.
    let classifier = LeadClassifier::new(
        Arc::new(MockChatProvider::with_reply(
            r#"{"pain_points":["legacy ETL"],"buying_signals":["asked for pricing"],"qualification_level":"hot","summary":"Ready to buy"}"#,
        )),
        analysis_params(),
    );

    let mut submitted = Map::new();
    submitted.insert("name".to_string(), json!("Ada"));
    submitted.insert("email".to_string(), json!("ada@example.com"));

    let insights = classifier.classify(&session.messages, &submitted).await;
    assert_eq!(insights.qualification_level, Qualification::Hot);

    let lead = Lead::new(
        form.id.clone(),
        session.session_id.clone(),
        submitted,
        session.messages.clone(),
        insights.pain_points,
        insights.buying_signals,
        insights.qualification_level,
    );

    assert_eq!(lead.contact_info.name.as_deref(), Some("Ada"));
    assert_eq!(lead.pain_points, vec!["legacy ETL"]);
    assert_eq!(lead.conversation_history.len(), 4);

    // Snapshot semantics: later session activity never touches the lead.
    session.add_message(SessionMessage::user("one more thing..."));
    assert_eq!(session.messages.len(), 5);
    assert_eq!(lead.conversation_history.len(), 4);
    assert_eq!(
        lead.conversation_history[0].content,
        "Do you work with Postgres?"
    );
}

#[tokio::test]
async fn submission_without_conversation_defaults_cold() {
    // No session ever existed: empty transcript plus a failing analysis
    // provider still produces a valid lead.
    let classifier = LeadClassifier::new(Arc::new(MockChatProvider::failing()), analysis_params());

    let mut submitted = Map::new();
    submitted.insert("email".to_string(), json!("walkup@example.com"));

    let insights = classifier.classify(&[], &submitted).await;
    assert_eq!(insights.qualification_level, Qualification::Cold);
    assert_eq!(insights.summary, "Lead submitted form");

    let lead = Lead::new(
        "form-1".to_string(),
        "sess-walkup".to_string(),
        submitted,
        Vec::new(),
        insights.pain_points,
        insights.buying_signals,
        insights.qualification_level,
    );

    assert!(lead.conversation_history.is_empty());
    assert_eq!(lead.qualification_level, Qualification::Cold);
    assert_eq!(lead.contact_info.email.as_deref(), Some("walkup@example.com"));
}
