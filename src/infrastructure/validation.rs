use crate::domain::error::DomainError;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-z0-9-]+(?:\.[a-z0-9-]+)+$")
        .expect("compile email regex")
});

const EMAIL_MAX: usize = 254;

/// Validates and canonicalizes an email address. The normalized form
/// (trimmed, lowercased) is the unique key for both the registry and the
/// scheduler. The error text is surfaced verbatim to the HTTP caller.
pub fn validate_email(raw: &str) -> Result<String, DomainError> {
    let email = raw.trim().to_lowercase();
    if email.is_empty() {
        return Err(DomainError::InvalidEmail(
            "Email address must not be empty.".to_string(),
        ));
    }
    if email.len() > EMAIL_MAX || !EMAIL_REGEX.is_match(&email) {
        return Err(DomainError::InvalidEmail(format!(
            "The email address is not valid: {}",
            raw.trim()
        )));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::validate_email;

    #[test]
    fn test_accepts_plain_address() {
        assert_eq!(
            validate_email("gush@gmail.com").unwrap(),
            "gush@gmail.com"
        );
    }

    #[test]
    fn test_normalizes_case_and_whitespace() {
        assert_eq!(
            validate_email("User@Example.com ").unwrap(),
            "user@example.com"
        );
    }

    #[test]
    fn test_rejects_missing_at_sign() {
        assert!(validate_email("not-an-email").is_err());
    }

    #[test]
    fn test_rejects_missing_domain_dot() {
        assert!(validate_email("user@localhost").is_err());
    }

    #[test]
    fn test_rejects_empty() {
        assert!(validate_email("   ").is_err());
    }

    #[test]
    fn test_rejects_overlong_address() {
        let local = "a".repeat(250);
        assert!(validate_email(&format!("{}@x.com", local)).is_err());
    }
}
