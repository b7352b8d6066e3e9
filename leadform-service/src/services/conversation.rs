//! Conversation engine: drives a chat session toward form submission.
//!
//! Pure decision logic over the given form and session state plus an
//! injected chat provider. Persistence belongs to the caller.

use crate::models::{ChatSession, Form};
use crate::services::extract::extract_contact_fields;
use crate::services::providers::{ChatMessage, ChatProvider, GenerationParams, ProviderError};
use std::collections::HashMap;
use std::sync::Arc;

/// Number of recent session messages supplied to the provider. Older
/// history is silently truncated from the front, no summarization.
const CONTEXT_WINDOW: usize = 10;

/// Prior-message count at which the form is surfaced regardless of content.
const SHOW_FORM_MESSAGE_THRESHOLD: usize = 8;

/// Lexical triggers that surface the form early.
const READY_KEYWORDS: &[&str] = &[
    "ready",
    "sign up",
    "register",
    "book",
    "schedule",
    "interested",
    "get started",
];

/// Reply returned whenever the provider fails; conversation continuity over
/// correctness.
const FALLBACK_REPLY: &str =
    "I'd be happy to help! Could you tell me more about what you're looking for?";

/// Outcome of one conversational turn.
#[derive(Debug, Clone)]
pub struct ConversationTurn {
    /// Assistant reply to show the user.
    pub message: String,

    /// Whether to surface the submission form this turn.
    pub show_form: bool,

    /// Contact fields found in the user's message this turn.
    pub extracted_data: HashMap<String, String>,
}

/// The conversation engine. One instance is shared across sessions; each
/// turn is a stateless unit of work.
pub struct ConversationEngine {
    provider: Arc<dyn ChatProvider>,
    params: GenerationParams,
}

impl ConversationEngine {
    pub fn new(provider: Arc<dyn ChatProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// Advance the conversation by one user turn.
    ///
    /// Provider failures never surface as errors: the turn degrades to a
    /// fixed fallback reply with `show_form = false` and no extracted data.
    pub async fn advance(
        &self,
        form: &Form,
        session: &ChatSession,
        user_message: &str,
    ) -> ConversationTurn {
        let mut messages = vec![ChatMessage::system(build_system_prompt(form))];

        // Last CONTEXT_WINDOW prior messages, original order.
        let history = &session.messages;
        let window_start = history.len().saturating_sub(CONTEXT_WINDOW);
        for msg in &history[window_start..] {
            messages.push(ChatMessage {
                role: msg.role.clone(),
                content: msg.content.clone(),
            });
        }

        messages.push(ChatMessage::user(user_message));

        let reply = match self.provider.complete(&messages, &self.params).await {
            Ok(text) => text,
            Err(e) => {
                log_provider_failure(&e);
                return ConversationTurn {
                    message: FALLBACK_REPLY.to_string(),
                    show_form: false,
                    extracted_data: HashMap::new(),
                };
            }
        };

        ConversationTurn {
            message: reply,
            show_form: should_show_form(history.len(), user_message),
            extracted_data: extract_contact_fields(user_message),
        }
    }
}

fn log_provider_failure(error: &ProviderError) {
    tracing::warn!(
        error = %error,
        "Chat provider failed; returning fallback reply"
    );
}

/// Decide whether to surface the submission form, from conversation length
/// and lexical triggers alone. Independent of what the provider said.
fn should_show_form(prior_message_count: usize, user_message: &str) -> bool {
    if prior_message_count >= SHOW_FORM_MESSAGE_THRESHOLD {
        return true;
    }

    let lowered = user_message.to_lowercase();
    READY_KEYWORDS.iter().any(|kw| lowered.contains(kw))
}

/// Compose the grounding instruction for every turn of a form's sessions.
fn build_system_prompt(form: &Form) -> String {
    format!(
        "You are a helpful AI assistant for a conversational form.\n\n\
         Form Title: {}\n\
         CTA: {}\n\n\
         Context and Instructions:\n{}\n\n\
         Your job is to:\n\
         1. Answer user questions naturally and helpfully\n\
         2. Guide the conversation towards collecting the required information\n\
         3. Identify pain points, buying signals, and qualification indicators\n\
         4. When you've gathered enough information, suggest moving to the form submission\n\n\
         Available form fields:\n{}\n\n\
         Keep responses concise (2-3 sentences max). Be conversational and friendly.",
        form.title,
        form.cta_type,
        form.context,
        format_fields(form),
    )
}

/// Render form fields for the prompt, one per line.
fn format_fields(form: &Form) -> String {
    form.fields
        .iter()
        .map(|f| {
            let required = if f.required { "required" } else { "optional" };
            format!("- {} ({}, {})", f.label, f.field_type, required)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmbedSettings, FormField, SessionMessage};
    use crate::services::providers::mock::MockChatProvider;

    fn sample_form() -> Form {
        Form::new(
            "user-1".to_string(),
            "Demo Request".to_string(),
            None,
            "Book a demo".to_string(),
            vec![
                FormField {
                    label: "Name".to_string(),
                    field_type: "text".to_string(),
                    required: true,
                },
                FormField {
                    label: "Company".to_string(),
                    field_type: "text".to_string(),
                    required: false,
                },
            ],
            "We sell analytics software.".to_string(),
            None,
            EmbedSettings::default(),
        )
    }

    fn session_with_messages(count: usize) -> ChatSession {
        let mut session =
            ChatSession::new("form-1".to_string(), "sess-1".to_string(), HashMap::new());
        for i in 0..count {
            if i % 2 == 0 {
                session.add_message(SessionMessage::user(format!("user msg {}", i)));
            } else {
                session.add_message(SessionMessage::assistant(format!("assistant msg {}", i)));
            }
        }
        session
    }

    fn params() -> GenerationParams {
        GenerationParams {
            temperature: 0.7,
            max_tokens: 200,
        }
    }

    #[test]
    fn show_form_at_eight_prior_messages_regardless_of_content() {
        assert!(should_show_form(8, "just browsing"));
        assert!(should_show_form(9, "tell me more"));
        assert!(!should_show_form(7, "just browsing"));
    }

    #[test]
    fn show_form_on_ready_keywords_any_case_any_position() {
        assert!(should_show_form(0, "I think I'm READY now"));
        assert!(should_show_form(2, "can I Sign Up today?"));
        assert!(should_show_form(0, "let's schedule something"));
        assert!(!should_show_form(0, "what do you sell?"));
    }

    #[test]
    fn system_prompt_renders_fields_with_required_flag() {
        let prompt = build_system_prompt(&sample_form());
        assert!(prompt.contains("Form Title: Demo Request"));
        assert!(prompt.contains("CTA: Book a demo"));
        assert!(prompt.contains("- Name (text, required)"));
        assert!(prompt.contains("- Company (text, optional)"));
        assert!(prompt.contains("We sell analytics software."));
    }

    #[tokio::test]
    async fn window_is_exactly_last_ten_in_original_order() {
        let provider = Arc::new(MockChatProvider::with_reply("ok"));
        let engine = ConversationEngine::new(provider.clone(), params());
        let session = session_with_messages(12);

        engine.advance(&sample_form(), &session, "hello").await;

        let requests = provider.requests();
        assert_eq!(requests.len(), 1);
        let sent = &requests[0];
        // system + 10 windowed + the new user turn
        assert_eq!(sent.len(), 12);
        assert_eq!(sent[0].role, "system");
        assert_eq!(sent[1].content, "user msg 2");
        assert_eq!(sent[10].content, "assistant msg 11");
        assert_eq!(sent[11].role, "user");
        assert_eq!(sent[11].content, "hello");
    }

    #[tokio::test]
    async fn short_history_is_sent_whole() {
        let provider = Arc::new(MockChatProvider::with_reply("ok"));
        let engine = ConversationEngine::new(provider.clone(), params());
        let session = session_with_messages(3);

        engine.advance(&sample_form(), &session, "hi").await;

        let sent = &provider.requests()[0];
        assert_eq!(sent.len(), 5);
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_fallback() {
        let provider = Arc::new(MockChatProvider::failing());
        let engine = ConversationEngine::new(provider, params());
        let session = session_with_messages(4);

        let turn = engine
            .advance(&sample_form(), &session, "I'm ready to sign up, a@b.com")
            .await;

        assert_eq!(turn.message, FALLBACK_REPLY);
        assert!(!turn.show_form);
        assert!(turn.extracted_data.is_empty());
    }

    #[tokio::test]
    async fn successful_turn_carries_extraction_and_heuristic() {
        let provider = Arc::new(MockChatProvider::with_reply("Great, let's continue."));
        let engine = ConversationEngine::new(provider, params());
        let session = session_with_messages(2);

        let turn = engine
            .advance(
                &sample_form(),
                &session,
                "I'm interested. Reach me at a@b.com or 555-123-4567",
            )
            .await;

        assert_eq!(turn.message, "Great, let's continue.");
        assert!(turn.show_form);
        assert_eq!(turn.extracted_data["email"], "a@b.com");
        assert_eq!(turn.extracted_data["phone"], "555-123-4567");
    }
}
