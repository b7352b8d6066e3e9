//! Opportunistic contact-field extraction from free-form user messages.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b")
        .expect("invalid email regex")
});

// 3-3-4 digit grouping with optional -/. separators.
static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{3}[-.]?\d{3}[-.]?\d{4}\b").expect("invalid phone regex"));

/// Scan a user message for an email address and a phone number.
///
/// At most one match per pattern; the first match wins. Returns only what
/// this message contained; merging into session state is the caller's call.
pub fn extract_contact_fields(message: &str) -> HashMap<String, String> {
    let mut extracted = HashMap::new();

    if let Some(m) = EMAIL_RE.find(message) {
        extracted.insert("email".to_string(), m.as_str().to_string());
    }

    if let Some(m) = PHONE_RE.find(message) {
        extracted.insert("phone".to_string(), m.as_str().to_string());
    }

    extracted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_email_and_phone_together() {
        let extracted = extract_contact_fields("Reach me at a@b.com or 555-123-4567");
        assert_eq!(extracted.len(), 2);
        assert_eq!(extracted["email"], "a@b.com");
        assert_eq!(extracted["phone"], "555-123-4567");
    }

    #[test]
    fn first_match_wins_per_pattern() {
        let extracted =
            extract_contact_fields("first@one.com then second@two.com, 111.222.3333 or 4445556666");
        assert_eq!(extracted["email"], "first@one.com");
        assert_eq!(extracted["phone"], "111.222.3333");
    }

    #[test]
    fn plain_chatter_yields_nothing() {
        assert!(extract_contact_fields("what are your pricing plans?").is_empty());
    }

    #[test]
    fn phone_allows_mixed_separators() {
        let extracted = extract_contact_fields("call 555-123.4567 today");
        assert_eq!(extracted["phone"], "555-123.4567");
    }
}
