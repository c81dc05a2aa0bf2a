//! Request field validation over JSON bodies.
//!
//! Handlers take `serde_json::Value` bodies and pull typed fields out through
//! [`Fields`], so every type check and domain check produces the same
//! `{ "error": "<message>" }` 400 envelope.

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::ApiError;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_TEXT_LENGTH: usize = 5000;
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Borrowed view over a JSON object body
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn from_body(body: &'a Value) -> Result<Self, ApiError> {
        body.as_object()
            .map(Self::new)
            .ok_or_else(|| ApiError::bad_request("Request body must be a JSON object"))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    /// Present and not JSON null
    fn value(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    fn string_value(&self, key: &str) -> Result<Option<&'a str>, ApiError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ApiError::bad_request(format!("{} must be a string", key))),
        }
    }

    /// Trimmed, non-empty string. `required_message` is used when the field is
    /// absent, null or blank.
    pub fn required_string(&self, key: &str, required_message: &str, max_len: usize) -> Result<String, ApiError> {
        let value = self
            .string_value(key)?
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ApiError::bad_request(required_message))?;
        check_length(key, value, max_len)?;
        Ok(value.to_string())
    }

    /// Trimmed string; blank values collapse to `None`
    pub fn optional_string(&self, key: &str, max_len: usize) -> Result<Option<String>, ApiError> {
        match self.string_value(key)?.map(str::trim).filter(|s| !s.is_empty()) {
            Some(value) => {
                check_length(key, value, max_len)?;
                Ok(Some(value.to_string()))
            }
            None => Ok(None),
        }
    }

    /// Untrimmed string for secrets such as passwords; only `""` counts as absent
    pub fn optional_raw_string(&self, key: &str, max_len: usize) -> Result<Option<String>, ApiError> {
        match self.string_value(key)?.filter(|s| !s.is_empty()) {
            Some(value) => {
                check_length(key, value, max_len)?;
                Ok(Some(value.to_string()))
            }
            None => Ok(None),
        }
    }

    pub fn required_raw_string(&self, key: &str, required_message: &str, max_len: usize) -> Result<String, ApiError> {
        self.optional_raw_string(key, max_len)?
            .ok_or_else(|| ApiError::bad_request(required_message))
    }

    /// Patch semantics: absent → `None`, null/blank → `Some(None)`
    pub fn patch_string(&self, key: &str, max_len: usize) -> Result<Option<Option<String>>, ApiError> {
        if !self.contains(key) {
            return Ok(None);
        }
        self.optional_string(key, max_len).map(Some)
    }

    pub fn optional_bool(&self, key: &str) -> Result<Option<bool>, ApiError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(_) => Err(ApiError::bad_request(format!("{} must be a boolean", key))),
        }
    }

    pub fn optional_number(&self, key: &str) -> Result<Option<f64>, ApiError> {
        match self.value(key) {
            None => Ok(None),
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) if v.is_finite() => Ok(Some(v)),
                _ => Err(ApiError::bad_request(format!("{} must be a finite number", key))),
            },
            Some(_) => Err(ApiError::bad_request(format!("{} must be a number", key))),
        }
    }

    pub fn required_number(&self, key: &str) -> Result<f64, ApiError> {
        self.optional_number(key)?
            .ok_or_else(|| ApiError::bad_request(format!("{} is required", key)))
    }

    pub fn patch_number(&self, key: &str) -> Result<Option<Option<f64>>, ApiError> {
        if !self.contains(key) {
            return Ok(None);
        }
        self.optional_number(key).map(Some)
    }

    pub fn optional_uuid(&self, key: &str) -> Result<Option<Uuid>, ApiError> {
        match self.string_value(key)?.map(str::trim).filter(|s| !s.is_empty()) {
            Some(raw) => parse_uuid(key, raw).map(Some),
            None => Ok(None),
        }
    }

    pub fn patch_uuid(&self, key: &str) -> Result<Option<Option<Uuid>>, ApiError> {
        if !self.contains(key) {
            return Ok(None);
        }
        self.optional_uuid(key).map(Some)
    }

    pub fn optional_hex_color(&self, key: &str) -> Result<Option<String>, ApiError> {
        match self.optional_string(key, MAX_NAME_LENGTH)? {
            Some(color) if is_hex_color(&color) => Ok(Some(color)),
            Some(_) => Err(invalid_color(key)),
            None => Ok(None),
        }
    }

    pub fn patch_hex_color(&self, key: &str) -> Result<Option<Option<String>>, ApiError> {
        if !self.contains(key) {
            return Ok(None);
        }
        self.optional_hex_color(key).map(Some)
    }

    /// String constrained to a fixed set of values (compared lowercase)
    pub fn optional_enum(&self, key: &str, allowed: &[&str]) -> Result<Option<String>, ApiError> {
        match self.optional_string(key, MAX_NAME_LENGTH)? {
            Some(value) => {
                let lowered = value.to_ascii_lowercase();
                if allowed.contains(&lowered.as_str()) {
                    Ok(Some(lowered))
                } else {
                    Err(ApiError::bad_request(format!(
                        "{} must be one of: {}",
                        key,
                        allowed.join(", ")
                    )))
                }
            }
            None => Ok(None),
        }
    }

    pub fn patch_enum(&self, key: &str, allowed: &[&str]) -> Result<Option<Option<String>>, ApiError> {
        if !self.contains(key) {
            return Ok(None);
        }
        self.optional_enum(key, allowed).map(Some)
    }
}

fn check_length(key: &str, value: &str, max_len: usize) -> Result<(), ApiError> {
    if value.chars().count() > max_len {
        return Err(ApiError::bad_request(format!(
            "{} must be {} characters or fewer",
            key, max_len
        )));
    }
    Ok(())
}

fn invalid_color(key: &str) -> ApiError {
    ApiError::bad_request(format!("{} must be a valid hex color (#RGB or #RRGGBB)", key))
}

/// `#RGB` or `#RRGGBB`, hex digits in either case
pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(digits) => {
            matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

pub fn parse_uuid(field: &str, raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::bad_request(format!("{} must be a valid UUID", field)))
}

/// Inclusive range check for numeric fields
pub fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), ApiError> {
    if value < min || value > max {
        return Err(ApiError::bad_request(format!(
            "{} must be between {} and {}",
            field, min, max
        )));
    }
    Ok(())
}

/// Validate email format
pub fn validate_email_format(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".to_string());
    }

    if email.chars().any(char::is_whitespace) {
        return Err("Invalid email format".to_string());
    }

    let mut parts = email.split('@');
    let (local, domain) = match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) => (local, domain),
        _ => return Err("Invalid email format".to_string()),
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err("Invalid email format".to_string());
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Validate username format and requirements
pub fn validate_username_format(username: &str) -> Result<(), String> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters".to_string());
    }

    if username.len() > 50 {
        return Err("Username must be 50 characters or fewer".to_string());
    }

    // Allow alphanumeric, underscore, hyphen
    if !username.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
        return Err("Username can only contain letters, numbers, underscore, and hyphen".to_string());
    }

    // Must start with alphanumeric
    if !username.starts_with(|c: char| c.is_ascii_alphanumeric()) {
        return Err("Username must start with a letter or number".to_string());
    }

    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH));
    }
    Ok(())
}
