//! Input normalization shared by the services.

use validator::ValidateEmail;

use notabook_core::error::AppError;
use notabook_core::result::AppResult;

/// Trim `value` and reject it if nothing is left.
pub(crate) fn required_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional field, mapping blank to `None`.
pub(crate) fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Trim and syntactically validate an email address.
pub(crate) fn required_email(value: &str) -> AppResult<String> {
    let email = required_text(value, "Email")?;
    if !email.validate_email() {
        return Err(AppError::validation(format!("Invalid email address: '{email}'")));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_text_trims() {
        assert_eq!(required_text("  Acme ", "Name").unwrap(), "Acme");
        assert_eq!(
            required_text("   ", "Name").unwrap_err().message,
            "Name is required"
        );
    }

    #[test]
    fn test_email() {
        assert_eq!(required_email(" ana@example.com ").unwrap(), "ana@example.com");
        assert!(required_email("not-an-email").is_err());
    }

    #[test]
    fn test_optional_text() {
        assert_eq!(optional_text(Some("  ")), None);
        assert_eq!(optional_text(Some(" x ")), Some("x".to_string()));
    }
}
