use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Same shape the web forms enforced: something@something.something,
    // no whitespace anywhere.
    static ref EMAIL_RE: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

/// Check that a string looks like an email address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// The part before the `@`, which the API uses as the account username.
pub fn username_from_email(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        // Valid emails
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("user.name@example.co.uk"));
        assert!(is_valid_email("user+tag@example.com"));

        // Invalid emails
        assert!(!is_valid_email("user@example")); // Missing TLD
        assert!(!is_valid_email("user example.com")); // Contains space
        assert!(!is_valid_email("user")); // No @ symbol
        assert!(!is_valid_email("")); // Empty string
        assert!(!is_valid_email("user@@example.com")); // Multiple @ symbols
        assert!(!is_valid_email("bad-email")); // No domain at all
    }

    #[test]
    fn test_username_from_email() {
        assert_eq!(username_from_email("user@x.com"), "user");
        assert_eq!(username_from_email("no-at-sign"), "no-at-sign");
    }
}
