use std::fmt;

pub const CUSTOMER_NAME_MAX_LEN: usize = 120;
pub const PHONE_MAX_LEN: usize = 32;
pub const ITEM_NAME_MAX_LEN: usize = 255;
pub const MAX_LINE_ITEMS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

pub type ValidationResult = Result<(), ValidationError>;

/// Strips control characters and collapses runs of whitespace.
pub fn sanitize_string(value: &str) -> String {
    value
        .chars()
        .filter(|ch| !ch.is_control())
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn validate_required(field: &'static str, value: &str) -> ValidationResult {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }

    Ok(())
}

pub fn validate_max_len(field: &'static str, value: &str, max: usize) -> ValidationResult {
    if value.chars().count() > max {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max),
        ));
    }

    Ok(())
}
