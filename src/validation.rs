//! Client-side form checks. A failed check never reaches the network.

use crate::errors::{Field, ValidationErrors};
use crate::models::{Credentials, NoteForm, RegisterForm};

pub const MAX_TITLE_CHARS: usize = 100;
pub const MIN_PASSWORD_CHARS: usize = 6;
pub const MIN_USERNAME_CHARS: usize = 3;

// ============================================================================
// Notes
// ============================================================================

pub fn validate_note_form(form: &NoteForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if form.title.trim().is_empty() {
        errors.push(Field::Title, "Title is required");
    } else if form.title.chars().count() > MAX_TITLE_CHARS {
        errors.push(Field::Title, "Title must be less than 100 characters");
    }

    if form.content.trim().is_empty() {
        errors.push(Field::Content, "Content is required");
    }

    errors.into_result()
}

/// Split comma-separated tag input. Order and duplicates are kept.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Auth Forms
// ============================================================================

pub fn validate_login(credentials: &Credentials) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if credentials.username.trim().is_empty() {
        errors.push(Field::Username, "Username is required");
    }
    check_password(&credentials.password, &mut errors);

    errors.into_result()
}

pub fn validate_register(form: &RegisterForm) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if form.username.trim().is_empty() {
        errors.push(Field::Username, "Username is required");
    } else if form.username.chars().count() < MIN_USERNAME_CHARS {
        errors.push(Field::Username, "Username must be at least 3 characters");
    }

    check_password(&form.password, &mut errors);

    if form.confirm_password.is_empty() {
        errors.push(Field::ConfirmPassword, "Please confirm your password");
    } else if form.password != form.confirm_password {
        errors.push(Field::ConfirmPassword, "Passwords do not match");
    }

    errors.into_result()
}

fn check_password(password: &str, errors: &mut ValidationErrors) {
    if password.is_empty() {
        errors.push(Field::Password, "Password is required");
    } else if password.chars().count() < MIN_PASSWORD_CHARS {
        errors.push(Field::Password, "Password must be at least 6 characters");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: &str, content: &str) -> NoteForm {
        NoteForm {
            title: title.to_string(),
            content: content.to_string(),
            tags: String::new(),
        }
    }

    #[test]
    fn test_valid_note_form() {
        assert!(validate_note_form(&form("Groceries", "milk")).is_ok());
        assert!(validate_note_form(&form(&"t".repeat(100), "x")).is_ok());
    }

    #[test]
    fn test_blank_fields_rejected() {
        let errors = validate_note_form(&form("   ", "\n")).unwrap_err();
        assert_eq!(errors.get(Field::Title), Some("Title is required"));
        assert_eq!(errors.get(Field::Content), Some("Content is required"));
    }

    #[test]
    fn test_long_title_rejected() {
        let errors = validate_note_form(&form(&"t".repeat(101), "x")).unwrap_err();
        assert_eq!(
            errors.get(Field::Title),
            Some("Title must be less than 100 characters")
        );
        assert_eq!(errors.get(Field::Content), None);
    }

    #[test]
    fn test_title_length_counts_chars() {
        assert!(validate_note_form(&form(&"é".repeat(100), "x")).is_ok());
    }

    #[test]
    fn test_parse_tags() {
        assert_eq!(
            parse_tags(" work, personal,,important , work"),
            vec!["work", "personal", "important", "work"]
        );
        assert!(parse_tags("  ,  ").is_empty());
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_login_checks() {
        let creds = Credentials {
            username: " ".to_string(),
            password: "12345".to_string(),
        };
        let errors = validate_login(&creds).unwrap_err();
        assert_eq!(errors.get(Field::Username), Some("Username is required"));
        assert_eq!(
            errors.get(Field::Password),
            Some("Password must be at least 6 characters")
        );

        let creds = Credentials {
            username: "ana".to_string(),
            password: "123456".to_string(),
        };
        assert!(validate_login(&creds).is_ok());
    }

    #[test]
    fn test_register_checks() {
        let mut form = RegisterForm {
            username: "al".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret2".to_string(),
        };
        let errors = validate_register(&form).unwrap_err();
        assert_eq!(
            errors.get(Field::Username),
            Some("Username must be at least 3 characters")
        );
        assert_eq!(
            errors.get(Field::ConfirmPassword),
            Some("Passwords do not match")
        );
        assert_eq!(errors.get(Field::Password), None);

        form.username = "alice".to_string();
        form.confirm_password = String::new();
        let errors = validate_register(&form).unwrap_err();
        assert_eq!(
            errors.get(Field::ConfirmPassword),
            Some("Please confirm your password")
        );

        form.confirm_password = "secret1".to_string();
        assert!(validate_register(&form).is_ok());
    }
}
