/// Validation utilities for user input

pub struct ValidationResult {
    pub is_valid: bool,
    pub error: Option<String>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            is_valid: true,
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            error: Some(message.into()),
        }
    }
}

/// Validate a channel display name
pub fn validate_channel_name(name: &str) -> ValidationResult {
    if name.is_empty() {
        return ValidationResult::err("Channel name is required");
    }

    if name.len() > 64 {
        return ValidationResult::err("Channel name must be at most 64 characters");
    }

    ValidationResult::ok()
}

/// Validate a public channel username (without the leading '@')
pub fn validate_channel_username(username: &str) -> ValidationResult {
    if username.is_empty() {
        return ValidationResult::err("Channel username is required");
    }

    if username.len() < 5 {
        return ValidationResult::err("Channel username must be at least 5 characters");
    }

    if username.len() > 32 {
        return ValidationResult::err("Channel username must be at most 32 characters");
    }

    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return ValidationResult::err("Channel username can only contain letters, numbers and _");
    }

    if !username
        .chars()
        .next()
        .map(|c| c.is_ascii_alphabetic())
        .unwrap_or(false)
    {
        return ValidationResult::err("Channel username must start with a letter");
    }

    ValidationResult::ok()
}

/// Parse a Telegram channel id from raw form input.
///
/// Channel ids from the Bot API are large negative numbers (the -100 prefix),
/// but any integer is accepted here; the backend is the authority.
pub fn parse_telegram_id(raw: &str) -> Result<i64, String> {
    if raw.is_empty() {
        return Err("Telegram ID is required".to_string());
    }

    raw.parse::<i64>()
        .map_err(|_| "Telegram ID must be a number (e.g. -1001234567890)".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_name_validation() {
        assert!(validate_channel_name("Daily Digest").is_valid);
        assert!(!validate_channel_name("").is_valid);
        assert!(!validate_channel_name(&"x".repeat(65)).is_valid);
    }

    #[test]
    fn test_channel_username_validation() {
        assert!(validate_channel_username("dailydigest").is_valid);
        assert!(validate_channel_username("tech_brief_2").is_valid);
        assert!(!validate_channel_username("").is_valid);
        assert!(!validate_channel_username("abcd").is_valid); // too short
        assert!(!validate_channel_username("2fast2follow").is_valid); // starts with digit
        assert!(!validate_channel_username("bad-name!").is_valid);
        assert!(!validate_channel_username(&"a".repeat(33)).is_valid);
    }

    #[test]
    fn test_telegram_id_parsing() {
        assert_eq!(parse_telegram_id("-1001234567890"), Ok(-1001234567890));
        assert_eq!(parse_telegram_id("42"), Ok(42));
        assert!(parse_telegram_id("").is_err());
        assert!(parse_telegram_id("not-a-number").is_err());
    }
}
