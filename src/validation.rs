// Validation utilities module
// Custom validation functions for the auth request DTOs

use std::sync::OnceLock;

use regex::Regex;
use validator::ValidationError;

static NAME_RE: OnceLock<Regex> = OnceLock::new();

fn name_re() -> &'static Regex {
    NAME_RE.get_or_init(|| {
        Regex::new(r"^[A-Za-z][A-Za-z' \-]*$").expect("name pattern is a valid regex")
    })
}

/// Validates a person name: letters, with spaces, apostrophes, and hyphens
/// allowed after the first character
pub fn validate_person_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::new("name_required"));
    }
    if name.len() > 64 {
        return Err(ValidationError::new("name_too_long"));
    }
    if !name_re().is_match(name) {
        return Err(ValidationError::new("name_invalid_characters"));
    }
    Ok(())
}

/// Validates password strength: at least 8 characters with at least one
/// letter and one digit
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    if password.len() < 8 {
        return Err(ValidationError::new("password_too_short"));
    }
    if !password.chars().any(|c| c.is_ascii_alphabetic()) {
        return Err(ValidationError::new("password_needs_letter"));
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("password_needs_digit"));
    }
    Ok(())
}
