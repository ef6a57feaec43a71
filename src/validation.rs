use regex::Regex;
use std::sync::OnceLock;

/// Validate email address for the lead creation form.
///
/// Checks for:
/// - Basic email format (contains @ and .)
/// - Minimum length
/// - Valid local/domain structure
///
/// The backend performs its own validation; this is only the client-side
/// gate so the form can refuse an obviously malformed address before any
/// network call happens.
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 5 || !email.contains('@') || !email.contains('.') {
        return false;
    }

    // RFC 5322 simplified email regex, matching local@domain.tld
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let email_regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
        )
        .expect("email regex is valid")
    });

    if !email_regex.is_match(email) {
        tracing::debug!("Invalid email format: {}", email);
        return false;
    }

    true
}
