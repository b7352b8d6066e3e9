//! Lead classifier: post-conversation analysis of a submitted lead.
//!
//! Renders the full transcript plus submitted fields into an analysis
//! prompt and parses the provider's JSON verdict. A failed or unparseable
//! response is final for that submission; lead capture never blocks on AI
//! flakiness.

use crate::models::{Qualification, SessionMessage};
use crate::services::providers::{ChatMessage, ChatProvider, GenerationParams};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Structured assessment of a lead.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct LeadInsights {
    #[serde(default)]
    pub pain_points: Vec<String>,

    #[serde(default)]
    pub buying_signals: Vec<String>,

    pub qualification_level: Qualification,

    pub summary: String,
}

impl Default for LeadInsights {
    /// The terminal classification used whenever analysis cannot complete.
    fn default() -> Self {
        Self {
            pain_points: Vec::new(),
            buying_signals: Vec::new(),
            qualification_level: Qualification::Cold,
            summary: "Lead submitted form".to_string(),
        }
    }
}

/// The lead classifier. Uses a lower temperature and larger output budget
/// than the conversation engine.
pub struct LeadClassifier {
    provider: Arc<dyn ChatProvider>,
    params: GenerationParams,
}

impl LeadClassifier {
    pub fn new(provider: Arc<dyn ChatProvider>, params: GenerationParams) -> Self {
        Self { provider, params }
    }

    /// Classify a conversation plus the submitted field values.
    ///
    /// Always returns a valid classification; the default (cold, empty
    /// lists) stands in when the provider fails or its output cannot be
    /// parsed. No retry.
    pub async fn classify(
        &self,
        transcript: &[SessionMessage],
        submitted: &Map<String, Value>,
    ) -> LeadInsights {
        let messages = vec![
            ChatMessage::system("You are a sales analyst extracting insights from conversations."),
            ChatMessage::user(build_analysis_prompt(transcript, submitted)),
        ];

        let raw = match self.provider.complete(&messages, &self.params).await {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Lead analysis failed; using default classification");
                return LeadInsights::default();
            }
        };

        parse_insights(&raw).unwrap_or_else(|| {
            tracing::warn!(
                raw_len = raw.len(),
                "Could not parse lead analysis output; using default classification"
            );
            LeadInsights::default()
        })
    }
}

/// Render the analysis prompt: every message (not windowed) as
/// "role: content" lines plus the submitted fields as a JSON block.
fn build_analysis_prompt(transcript: &[SessionMessage], submitted: &Map<String, Value>) -> String {
    let conversation_text = transcript
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n");

    let form_data = serde_json::to_string_pretty(submitted).unwrap_or_else(|_| "{}".to_string());

    format!(
        "Analyze this conversation and form submission to identify:\n\n\
         1. Pain points mentioned by the user\n\
         2. Buying signals (urgency, budget mentions, decision authority, etc.)\n\
         3. Qualification level (hot/warm/cold)\n\n\
         Conversation:\n{}\n\n\
         Form Data:\n{}\n\n\
         Respond in JSON format:\n\
         {{\n\
         \x20 \"pain_points\": [\"list\", \"of\", \"pain\", \"points\"],\n\
         \x20 \"buying_signals\": [\"list\", \"of\", \"buying\", \"signals\"],\n\
         \x20 \"qualification_level\": \"hot|warm|cold\",\n\
         \x20 \"summary\": \"Brief summary of the lead\"\n\
         }}",
        conversation_text, form_data
    )
}

/// Parse the provider's raw output into insights, tolerating surrounding
/// prose and code fences.
fn parse_insights(raw: &str) -> Option<LeadInsights> {
    let span = first_json_object(raw)?;
    serde_json::from_str(span).ok()
}

/// Locate the first balanced `{...}` span in the text.
///
/// Provider output is not contractually structured, so this is an explicit
/// scan rather than a greedy regex: brace depth is tracked outside JSON
/// strings, honoring escapes.
fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let bytes = text.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, &b) in bytes[start..].iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::providers::mock::MockChatProvider;
    use crate::services::providers::ProviderError;
    use serde_json::json;

    fn params() -> GenerationParams {
        GenerationParams {
            temperature: 0.3,
            max_tokens: 500,
        }
    }

    fn transcript() -> Vec<SessionMessage> {
        vec![
            SessionMessage::user("Our onboarding costs too much"),
            SessionMessage::assistant("We can help with that"),
        ]
    }

    #[test]
    fn finds_first_balanced_object() {
        assert_eq!(first_json_object(r#"noise {"a": 1} trailing"#), Some(r#"{"a": 1}"#));
        assert_eq!(
            first_json_object(r#"{"outer": {"inner": 2}} {"second": 3}"#),
            Some(r#"{"outer": {"inner": 2}}"#)
        );
    }

    #[test]
    fn braces_inside_strings_do_not_confuse_the_scan() {
        let raw = r#"{"summary": "uses {braces} and \"quotes\""}"#;
        assert_eq!(first_json_object(raw), Some(raw));
    }

    #[test]
    fn no_object_span_found() {
        assert_eq!(first_json_object("no json here"), None);
        assert_eq!(first_json_object("unbalanced { forever"), None);
    }

    #[test]
    fn code_fenced_output_parses_exactly() {
        let raw = "Sure! ```json\n{\"pain_points\":[\"cost\"],\"buying_signals\":[],\"qualification_level\":\"warm\",\"summary\":\"ok\"}\n```";
        let insights = parse_insights(raw).unwrap();
        assert_eq!(insights.pain_points, vec!["cost"]);
        assert!(insights.buying_signals.is_empty());
        assert_eq!(insights.qualification_level, Qualification::Warm);
        assert_eq!(insights.summary, "ok");
    }

    #[test]
    fn unknown_qualification_fails_parsing() {
        let raw = r#"{"pain_points":[],"buying_signals":[],"qualification_level":"scorching","summary":"x"}"#;
        assert!(parse_insights(raw).is_none());
    }

    #[tokio::test]
    async fn provider_failure_yields_default() {
        let classifier = LeadClassifier::new(Arc::new(MockChatProvider::failing()), params());
        let insights = classifier.classify(&transcript(), &Map::new()).await;
        assert_eq!(insights, LeadInsights::default());
        assert_eq!(insights.qualification_level, Qualification::Cold);
        assert_eq!(insights.summary, "Lead submitted form");
    }

    #[tokio::test]
    async fn unparseable_output_yields_default() {
        let classifier = LeadClassifier::new(
            Arc::new(MockChatProvider::with_reply("The lead looks promising!")),
            params(),
        );
        let insights = classifier.classify(&transcript(), &Map::new()).await;
        assert_eq!(insights, LeadInsights::default());
    }

    #[tokio::test]
    async fn rate_limit_is_not_retried() {
        let provider = Arc::new(MockChatProvider::scripted(vec![Err(
            ProviderError::RateLimited,
        )]));
        let classifier = LeadClassifier::new(provider.clone(), params());
        let insights = classifier.classify(&transcript(), &Map::new()).await;
        assert_eq!(insights, LeadInsights::default());
        assert_eq!(provider.requests().len(), 1);
    }

    #[tokio::test]
    async fn prompt_carries_full_transcript_and_form_data() {
        let provider = Arc::new(MockChatProvider::with_reply(
            r#"{"pain_points":[],"buying_signals":["budget approved"],"qualification_level":"hot","summary":"buyer"}"#,
        ));
        let classifier = LeadClassifier::new(provider.clone(), params());

        let mut submitted = Map::new();
        submitted.insert("email".to_string(), json!("ada@example.com"));

        let insights = classifier.classify(&transcript(), &submitted).await;
        assert_eq!(insights.qualification_level, Qualification::Hot);

        let sent = &provider.requests()[0];
        assert_eq!(sent[0].role, "system");
        let prompt = &sent[1].content;
        assert!(prompt.contains("user: Our onboarding costs too much"));
        assert!(prompt.contains("assistant: We can help with that"));
        assert!(prompt.contains("ada@example.com"));
    }
}
