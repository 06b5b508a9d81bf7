//! Validation of inbound school payloads and query parameters.
//!
//! Every check runs before storage or ranking is touched. Failures are
//! reported per field, and all failing fields are collected rather than
//! stopping at the first one.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::school::{Coordinates, NewSchool};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 255;
const ADDRESS_MIN: usize = 5;
const ADDRESS_MAX: usize = 500;

/// Keys accepted in an add-school body.
const SCHOOL_FIELDS: [&str; 4] = ["name", "address", "latitude", "longitude"];

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Name of the offending field (e.g., `latitude`).
    pub field: String,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// One or more field-level validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// The individual field errors, in the order they were found.
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Whether any error names `field`.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }
}

impl From<Vec<FieldError>> for ValidationErrors {
    fn from(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Bounds and messages for a text field.
struct TextRule {
    field: &'static str,
    label: &'static str,
    min: usize,
    max: usize,
}

/// Bounds and messages for a coordinate field.
struct RangeRule {
    field: &'static str,
    label: &'static str,
    min: f64,
    max: f64,
}

const NAME: TextRule = TextRule {
    field: "name",
    label: "School name",
    min: NAME_MIN,
    max: NAME_MAX,
};

const ADDRESS: TextRule = TextRule {
    field: "address",
    label: "Address",
    min: ADDRESS_MIN,
    max: ADDRESS_MAX,
};

const LATITUDE: RangeRule = RangeRule {
    field: "latitude",
    label: "Latitude",
    min: -90.0,
    max: 90.0,
};

const LONGITUDE: RangeRule = RangeRule {
    field: "longitude",
    label: "Longitude",
    min: -180.0,
    max: 180.0,
};

/// Validate an add-school request body.
///
/// Text fields are trimmed before their length is checked, and the trimmed
/// value is what ends up in the returned [`NewSchool`]. Lengths are measured
/// in UTF-16 code units. Coordinates may be JSON numbers or numeric strings.
/// Any key other than the four school fields is rejected.
///
/// # Example
///
/// ```
/// use schools::validation::validate_new_school;
///
/// let body = serde_json::json!({
///     "name": "Hillside Academy",
///     "address": "4 Hill Lane, Bath",
///     "latitude": 51.38,
///     "longitude": -2.36
/// });
/// let school = validate_new_school(&body).unwrap();
/// assert_eq!(school.name, "Hillside Academy");
///
/// let bad = serde_json::json!({
///     "name": "Hillside Academy",
///     "address": "4 Hill Lane, Bath",
///     "latitude": 95,
///     "longitude": -2.36
/// });
/// let errors = validate_new_school(&bad).unwrap_err();
/// assert!(errors.has_field("latitude"));
/// ```
pub fn validate_new_school(body: &Value) -> Result<NewSchool, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let Some(object) = body.as_object() else {
        errors.push("body", "Request body must be a JSON object");
        return Err(errors);
    };

    let name = check_text(object.get("name"), &NAME, &mut errors);
    let address = check_text(object.get("address"), &ADDRESS, &mut errors);
    let latitude = check_number(object.get("latitude"), &LATITUDE, &mut errors);
    let longitude = check_number(object.get("longitude"), &LONGITUDE, &mut errors);

    for key in object.keys() {
        if !SCHOOL_FIELDS.contains(&key.as_str()) {
            errors.push(key, format!("\"{}\" is not allowed", key));
        }
    }

    match (name, address, latitude, longitude) {
        (Some(name), Some(address), Some(latitude), Some(longitude)) if errors.is_empty() => {
            Ok(NewSchool {
                name,
                address,
                latitude,
                longitude,
            })
        }
        _ => Err(errors),
    }
}

/// Validate a reference point given as raw query-string values.
///
/// Each value is parsed explicitly from text; a value that is not a finite
/// number is a validation failure, never a silent coercion.
pub fn validate_coordinates(
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> Result<Coordinates, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let lat = check_number_text(latitude, &LATITUDE, &mut errors);
    let lon = check_number_text(longitude, &LONGITUDE, &mut errors);

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok(Coordinates::new(lat, lon)),
        _ => Err(errors),
    }
}

/// Validate a school id taken from a URL path segment.
pub fn validate_school_id(raw: &str) -> Result<i64, ValidationErrors> {
    raw.trim().parse::<i64>().map_err(|_| {
        let mut errors = ValidationErrors::new();
        errors.push("id", "School id must be an integer");
        errors
    })
}

fn check_text(
    value: Option<&Value>,
    rule: &TextRule,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let text = match value {
        None | Some(Value::Null) => {
            errors.push(rule.field, format!("{} is required", rule.label));
            return None;
        }
        Some(Value::String(s)) => s.trim(),
        Some(_) => {
            errors.push(rule.field, format!("{} must be a string", rule.label));
            return None;
        }
    };

    let len = text.encode_utf16().count();
    if len == 0 {
        errors.push(rule.field, format!("{} is required", rule.label));
        None
    } else if len < rule.min {
        errors.push(
            rule.field,
            format!("{} must be at least {} characters long", rule.label, rule.min),
        );
        None
    } else if len > rule.max {
        errors.push(
            rule.field,
            format!("{} cannot exceed {} characters", rule.label, rule.max),
        );
        None
    } else {
        Some(text.to_string())
    }
}

fn check_number(
    value: Option<&Value>,
    rule: &RangeRule,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    match value {
        None | Some(Value::Null) => check_number_text(None, rule, errors),
        Some(Value::Number(n)) => match n.as_f64() {
            Some(v) => check_range(v, rule, errors),
            None => {
                errors.push(rule.field, format!("{} must be a number", rule.label));
                None
            }
        },
        Some(Value::String(s)) => check_number_text(Some(s), rule, errors),
        Some(_) => {
            errors.push(rule.field, format!("{} must be a number", rule.label));
            None
        }
    }
}

fn check_number_text(
    value: Option<&str>,
    rule: &RangeRule,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let text = match value.map(str::trim) {
        None | Some("") => {
            errors.push(rule.field, format!("{} is required", rule.label));
            return None;
        }
        Some(text) => text,
    };

    match text.parse::<f64>() {
        Ok(v) if v.is_finite() => check_range(v, rule, errors),
        _ => {
            errors.push(rule.field, format!("{} must be a number", rule.label));
            None
        }
    }
}

fn check_range(value: f64, rule: &RangeRule, errors: &mut ValidationErrors) -> Option<f64> {
    if (rule.min..=rule.max).contains(&value) {
        Some(value)
    } else {
        errors.push(
            rule.field,
            format!("{} must be between {} and {}", rule.label, rule.min, rule.max),
        );
        None
    }
}
