use validator::ValidateEmail;

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 120;
pub const MAX_EMAIL_LEN: usize = 254;

/// Validates that the input looks like a deliverable email address.
/// On top of the `validator` check, the domain part must contain a dot
/// so that `user@localhost` style addresses are rejected.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LEN {
        return false;
    }
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || !has_dotted_domain(domain) {
        return false;
    }

    email.validate_email()
}

fn has_dotted_domain(domain: &str) -> bool {
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Trims the name and enforces length bounds (counted in characters).
pub fn sanitize_name(name: &str) -> Option<String> {
    let cleaned = name.trim();
    let len = cleaned.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return None;
    }
    Some(cleaned.to_string())
}

/// Trims and lowercases the email, returning it only if it is valid.
pub fn sanitize_email(email: &str) -> Option<String> {
    let candidate = email.trim().to_lowercase();
    is_valid_email(&candidate).then_some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("test@example.com"));
        assert!(is_valid_email("user.name@domain.co.uk"));
        assert!(is_valid_email("user+tag@example.org"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("   "));
        assert!(!is_valid_email("notanemail"));
        assert!(!is_valid_email("@nodomain.com"));
        assert!(!is_valid_email("spaces in@email.com"));
        assert!(!is_valid_email("user@localhost"));
        assert!(!is_valid_email("user@domain."));
        assert!(!is_valid_email("user@.com"));
    }

    #[test]
    fn test_email_too_long() {
        let email = format!("{}@example.com", "a".repeat(MAX_EMAIL_LEN));
        assert!(!is_valid_email(&email));
    }

    #[test]
    fn test_sanitize_email_normalizes_case_and_whitespace() {
        assert_eq!(
            sanitize_email("  Ada.Lovelace@Example.COM \n"),
            Some("ada.lovelace@example.com".to_string())
        );
        assert_eq!(sanitize_email("not an email"), None);
    }

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  Ada  "), Some("Ada".to_string()));
        assert_eq!(sanitize_name("Jo"), Some("Jo".to_string()));
        assert_eq!(sanitize_name(""), None);
        assert_eq!(sanitize_name("   "), None);
        assert_eq!(sanitize_name(" A "), None);
        assert_eq!(sanitize_name(&"a".repeat(MAX_NAME_LEN + 1)), None);
    }

    #[test]
    fn test_sanitize_name_counts_characters_not_bytes() {
        // Two characters, six bytes
        assert_eq!(sanitize_name("李雷"), Some("李雷".to_string()));
    }
}
