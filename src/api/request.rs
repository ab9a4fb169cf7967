//! Request decoding and validation
//!
//! A create request is a JSON object with exactly five fields:
//!
//! ```json
//! {
//!   "nome_da_imagem": "a.jpg",
//!   "categoria_detectada": "sadia",
//!   "area_verde_pixels": 100.0,
//!   "area_manchas_pixels": 0.0,
//!   "porcentagem_doenca_folha": 0.0
//! }
//! ```
//!
//! Validation is one pass over the whole object. Every problem found is
//! reported together; a `NewRecord` is only built when there are none.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::storage::NewRecord;

pub const FIELD_IMAGE_NAME: &str = "nome_da_imagem";
pub const FIELD_CATEGORY: &str = "categoria_detectada";
pub const FIELD_GREEN_AREA: &str = "area_verde_pixels";
pub const FIELD_SPOT_AREA: &str = "area_manchas_pixels";
pub const FIELD_DISEASE: &str = "porcentagem_doenca_folha";

/// Fields a create request must carry, in validation order.
pub const REQUIRED_FIELDS: [&str; 5] = [
    FIELD_IMAGE_NAME,
    FIELD_CATEGORY,
    FIELD_GREEN_AREA,
    FIELD_SPOT_AREA,
    FIELD_DISEASE,
];

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PER_PAGE: i64 = 10;

/// One rejected field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
}

impl FieldError {
    fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.reason, self.field)
    }
}

/// All problems found in one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Create with a single field error
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, reason);
        errors
    }

    fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.errors.push(FieldError::new(field, reason));
    }

    /// Returns every field error, in detection order
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Returns whether no errors were recorded
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns whether `field` was rejected
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}", e)?;
        }
        Ok(())
    }
}

/// Validates a create-record body and builds the submission.
pub fn parse_create_request(body: &Value) -> Result<NewRecord, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let object = match body.as_object() {
        Some(o) => o,
        None => {
            errors.push("body", "must be a JSON object");
            return Err(errors);
        }
    };

    for key in object.keys() {
        if !REQUIRED_FIELDS.contains(&key.as_str()) {
            errors.push(key.as_str(), "unknown field");
        }
    }

    let image_name = text_field(object, FIELD_IMAGE_NAME, &mut errors);
    let category = text_field(object, FIELD_CATEGORY, &mut errors);
    let green = number_field(object, FIELD_GREEN_AREA, &mut errors);
    let spot = number_field(object, FIELD_SPOT_AREA, &mut errors);
    let disease = number_field(object, FIELD_DISEASE, &mut errors);

    if let Some(v) = green {
        check_non_negative(FIELD_GREEN_AREA, v, &mut errors);
    }
    if let Some(v) = spot {
        check_non_negative(FIELD_SPOT_AREA, v, &mut errors);
    }
    if let Some(v) = disease {
        if !(0.0..=100.0).contains(&v) {
            errors.push(FIELD_DISEASE, "must be between 0 and 100");
        }
    }

    match (image_name, category, green, spot, disease) {
        (Some(image_name), Some(detected_category), Some(g), Some(s), Some(d)) => {
            errors.into_result(|| NewRecord {
                image_name,
                detected_category,
                green_area_pixels: g,
                spot_area_pixels: s,
                disease_percentage: d,
            })
        }
        _ => Err(errors),
    }
}

fn text_field(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match object.get(field) {
        None | Some(Value::Null) => {
            errors.push(field, "missing required field");
            None
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(field, "must not be empty");
            None
        }
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            errors.push(field, "must be a string");
            None
        }
    }
}

/// Accepts JSON numbers and numeric strings.
fn number_field(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let value = match object.get(field) {
        None | Some(Value::Null) => {
            errors.push(field, "missing required field");
            return None;
        }
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    };

    match value {
        Some(v) if v.is_finite() => Some(v),
        Some(_) => {
            errors.push(field, "must be a finite number");
            None
        }
        None => {
            errors.push(field, "must be a number");
            None
        }
    }
}

fn check_non_negative(field: &str, value: f64, errors: &mut ValidationErrors) {
    if value < 0.0 {
        errors.push(field, "must be >= 0");
    }
}

/// Parses the `page` / `perPage` query parameters.
///
/// Absent parameters take their defaults. Range checks (`>= 1`) are left to
/// pagination itself.
pub fn parse_page_params(
    page: Option<&str>,
    per_page: Option<&str>,
) -> Result<(i64, i64), ValidationErrors> {
    let mut errors = ValidationErrors::default();
    let page = int_param("page", page, DEFAULT_PAGE, &mut errors);
    let per_page = int_param("perPage", per_page, DEFAULT_PER_PAGE, &mut errors);
    errors.into_result(|| (page, per_page))
}

fn int_param(name: &str, raw: Option<&str>, default: i64, errors: &mut ValidationErrors) -> i64 {
    match raw {
        None => default,
        Some(s) => match s.trim().parse::<i64>() {
            Ok(v) => v,
            Err(_) => {
                errors.push(name, "must be an integer");
                default
            }
        },
    }
}
