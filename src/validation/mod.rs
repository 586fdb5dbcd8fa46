use chrono::NaiveTime;
use std::fmt;

pub const NAME_MAX_LEN: usize = 100;
pub const EMAIL_MAX_LEN: usize = 254;
pub const PHONE_MAX_LEN: usize = 20;
pub const ADDRESS_MAX_LEN: usize = 255;
pub const FREE_TEXT_MAX_LEN: usize = 500;

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

pub fn validate_max_len(field: &'static str, value: &str, max_len: usize) -> ValidationResult {
    if value.chars().count() > max_len {
        return Err(ValidationError::new(
            field,
            format!("must be at most {} characters", max_len),
        ));
    }

    Ok(())
}

pub fn validate_name(name: &str) -> ValidationResult {
    let name = sanitize_string(name);
    validate_required("name", &name)?;
    validate_max_len("name", &name, NAME_MAX_LEN)
}

pub fn validate_email(email: &str) -> ValidationResult {
    let email = email.trim();
    validate_required("email", email)?;
    validate_max_len("email", email, EMAIL_MAX_LEN)?;

    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::new("email", "must be a valid email address"));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult {
    if password.is_empty() {
        return Err(ValidationError::new("password", "must not be empty"));
    }

    Ok(())
}

pub fn validate_phone(phone: &str) -> ValidationResult {
    let phone = phone.trim();
    validate_required("phone", phone)?;
    validate_max_len("phone", phone, PHONE_MAX_LEN)?;

    if !phone
        .chars()
        .all(|ch| ch.is_ascii_digit() || matches!(ch, '+' | '-' | ' ' | '(' | ')'))
    {
        return Err(ValidationError::new(
            "phone",
            "must contain only digits, spaces and + - ( )",
        ));
    }

    if !phone.chars().any(|ch| ch.is_ascii_digit()) {
        return Err(ValidationError::new("phone", "must contain digits"));
    }

    Ok(())
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn validate_time_of_day(field: &'static str, value: &str) -> ValidationResult {
    let value = value.trim();
    validate_required(field, value)?;

    if NaiveTime::parse_from_str(value, "%H:%M").is_err()
        && NaiveTime::parse_from_str(value, "%H:%M:%S").is_err()
    {
        return Err(ValidationError::new(field, "must be a time of day as HH:MM"));
    }

    Ok(())
}

pub fn validate_positive_id(field: &'static str, id: i64) -> ValidationResult {
    if id <= 0 {
        return Err(ValidationError::new(field, "must be a positive identifier"));
    }

    Ok(())
}
