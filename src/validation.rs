// Validation utilities module
// Custom validation functions for domain-specific rules

use validator::ValidationError;

/// Validates a mobile number: digits only (optional leading +), 6-15 digits
pub fn validate_mobile(mobile: &str) -> Result<(), ValidationError> {
    let digits = mobile.strip_prefix('+').unwrap_or(mobile);
    if digits.len() >= 6 && digits.len() <= 15 && digits.chars().all(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_mobile"))
    }
}
