//! Log Redaction Layer
//!
//! Scrubs card numbers, phone numbers and bearer tokens from strings prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static CARD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{13,19}").expect("static regex"));
static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").expect("static regex")
});
static TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Bearer\s+[a-zA-Z0-9\-\._~+/]+=*").expect("static regex"));

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let redacted = CARD_RE.replace_all(input, "[REDACTED_CARD]");
    let redacted = TELEPHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]");
    TOKEN_RE.replace_all(&redacted, "[REDACTED_TOKEN]").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_element_phone_is_hidden() {
        let clean = redact_sensitive_data("AP DEL 9876543210");
        assert_eq!(clean, "AP DEL [REDACTED_PHONE]");
    }

    #[test]
    fn card_numbers_and_tokens_are_hidden() {
        let clean = redact_sensitive_data("FPCCVI4111111111111111/1228 Bearer eyJhbGciOiJIUzI1NiJ9");
        assert!(!clean.contains("4111111111111111"));
        assert!(clean.contains("[REDACTED_CARD]"));
        assert!(clean.contains("[REDACTED_TOKEN]"));
    }

    #[test]
    fn cryptic_entries_pass_through() {
        for entry in ["AN12JANDELDOH", "SS1Y1", "NM1KUMAR/RAHUL MR", "RT ABC234"] {
            assert_eq!(redact_sensitive_data(entry), entry);
        }
    }
}
