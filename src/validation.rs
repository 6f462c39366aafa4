//! Structural validation of input records.
//!
//! The input record is lenient: missing or malformed optional fields are
//! defaulted by [`crate::request`]. Validation only rejects what no default
//! can repair:
//! - A record that is not a JSON object
//! - Negative `Doctors`, `Patients` or `Beds`
//! - `Doctors`, `Patients` or `Beds` above [`MAX_COUNT`]

use serde_json::Value;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The record is not a key-value object.
    NotAnObject,
    /// A declared count is below zero.
    NegativeCount,
    /// A declared count exceeds [`MAX_COUNT`].
    CountTooLarge,
}

impl ValidationError {
    /// Creates an error.
    pub fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Record keys holding entity counts.
pub const COUNT_FIELDS: [&str; 3] = ["Doctors", "Patients", "Beds"];

/// Largest accepted value for any count field.
pub const MAX_COUNT: i64 = 100_000;

/// Validates the structure of an input record.
///
/// Checks:
/// 1. The record is a JSON object
/// 2. `Doctors`, `Patients` and `Beds`, when present and numeric, are
///    within `0..=MAX_COUNT`
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_record(record: &Value) -> ValidationResult {
    let Some(fields) = record.as_object() else {
        return Err(vec![ValidationError::new(
            ValidationErrorKind::NotAnObject,
            format!("Input record must be an object, got {}", type_name(record)),
        )]);
    };

    let errors: Vec<ValidationError> = COUNT_FIELDS
        .iter()
        .filter_map(|&key| {
            let n = fields.get(key).and_then(lenient_i64)?;
            if n < 0 {
                Some(ValidationError::new(
                    ValidationErrorKind::NegativeCount,
                    format!("{key} is negative ({n})"),
                ))
            } else if n > MAX_COUNT {
                Some(ValidationError::new(
                    ValidationErrorKind::CountTooLarge,
                    format!("{key} exceeds {MAX_COUNT} ({n})"),
                ))
            } else {
                None
            }
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Reads an integer from a number, numeric string or boolean.
///
/// Fractional numbers truncate toward zero. Returns `None` for anything
/// else.
pub fn lenient_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite())
                .map(|f| f.trunc() as i64)
        }),
        Value::String(s) => s.trim().parse().ok(),
        Value::Bool(b) => Some(i64::from(*b)),
        _ => None,
    }
}

/// Reads a float from a number or numeric string.
pub fn lenient_f64(value: &Value) -> Option<f64> {
    let parsed: Option<f64> = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.filter(|f| f.is_finite())
}

/// Reads a flag from a boolean, number, or "true"/"false"/"1"/"0".
pub fn lenient_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" => Some(true),
            "false" | "0" | "no" | "" => Some(false),
            _ => None,
        },
        Value::Null => Some(false),
        _ => None,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
