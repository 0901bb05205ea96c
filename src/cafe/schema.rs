//! Structural and type validation of café documents.
//!
//! A document is a JSON object as received from a client (create) or the
//! stored record with a client patch merged on top (update). Every field is
//! checked and all failures are reported together, keyed by path.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use strum::IntoEnumIterator;

use super::models::{CafeDetails, DayHours, OpeningHours, Weekday};

/// Keys a client may set; anything else in a body is ignored
pub const WRITABLE_FIELDS: [&str; 8] = [
    "name",
    "description",
    "latitude",
    "longitude",
    "address",
    "phone",
    "menu",
    "openingHours",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldErrorKind {
    Required,
    Cast,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: String,
    pub path: String,
}

impl FieldError {
    pub fn required(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            kind: FieldErrorKind::Required,
            message: format!("Path `{}` is required", path),
            path,
        }
    }

    pub fn cast(path: impl Into<String>, expected: &str, value: &Value) -> Self {
        let path = path.into();
        Self {
            kind: FieldErrorKind::Cast,
            message: format!(
                "Cast to {} failed for value {} ({}) at path `{}`",
                expected,
                value,
                type_name(value),
                path
            ),
            path,
        }
    }
}

/// Field-level failures keyed by path
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    errors: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, error: FieldError) {
        self.errors.entry(error.path.clone()).or_insert(error);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, path: &str) -> Option<&FieldError> {
        self.errors.get(path)
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .values()
            .map(|error| format!("{}: {}", error.path, error.message))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// Copies writable keys present in `patch` onto `document`, replacing prior values
pub fn merge_patch(document: &mut Map<String, Value>, patch: &Map<String, Value>) {
    for key in WRITABLE_FIELDS {
        if let Some(value) = patch.get(key) {
            document.insert(key.to_string(), value.clone());
        }
    }
}

/// Validates a café document, casting scalars the way clients commonly send them
pub fn validate(document: &Map<String, Value>) -> Result<CafeDetails, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    let name = required_string(document, "name", &mut errors);
    let description = optional_string(document.get("description"), "description", &mut errors);
    let latitude = required_number(document, "latitude", &mut errors);
    let longitude = required_number(document, "longitude", &mut errors);
    let address = required_string(document, "address", &mut errors);
    let phone = required_string(document, "phone", &mut errors);
    let menu = string_list(document.get("menu"), "menu", &mut errors);
    let opening_hours = opening_hours(document.get("openingHours"), &mut errors);

    match (name, latitude, longitude, address, phone) {
        (Some(name), Some(latitude), Some(longitude), Some(address), Some(phone))
            if errors.is_empty() =>
        {
            Ok(CafeDetails {
                name,
                description,
                latitude,
                longitude,
                address,
                phone,
                menu,
                opening_hours,
            })
        }
        _ => Err(errors),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn cast_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn required_string(
    document: &Map<String, Value>,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match document.get(path) {
        None | Some(Value::Null) => {
            errors.push(FieldError::required(path));
            None
        }
        Some(value) => match cast_string(value) {
            Some(s) if s.trim().is_empty() => {
                errors.push(FieldError::required(path));
                None
            }
            Some(s) => Some(s),
            None => {
                errors.push(FieldError::cast(path, "string", value));
                None
            }
        },
    }
}

fn optional_string(
    value: Option<&Value>,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    match value {
        None | Some(Value::Null) => None,
        Some(value) => {
            let cast = cast_string(value);
            if cast.is_none() {
                errors.push(FieldError::cast(path, "string", value));
            }
            cast
        }
    }
}

fn required_number(
    document: &Map<String, Value>,
    path: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let value = match document.get(path) {
        None | Some(Value::Null) => {
            errors.push(FieldError::required(path));
            return None;
        }
        Some(Value::String(s)) if s.trim().is_empty() => {
            errors.push(FieldError::required(path));
            return None;
        }
        Some(value) => value,
    };

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    };
    if number.is_none() {
        errors.push(FieldError::cast(path, "number", value));
    }
    number
}

fn string_list(value: Option<&Value>, path: &str, errors: &mut ValidationErrors) -> Vec<String> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| {
                let cast = cast_string(item);
                if cast.is_none() {
                    errors.push(FieldError::cast(format!("{}.{}", path, index), "string", item));
                }
                cast
            })
            .collect(),
        Some(object @ Value::Object(_)) => {
            errors.push(FieldError::cast(path, "array", object));
            Vec::new()
        }
        Some(scalar) => cast_string(scalar).into_iter().collect(),
    }
}

fn opening_hours(value: Option<&Value>, errors: &mut ValidationErrors) -> OpeningHours {
    let mut hours = OpeningHours::default();

    let days = match value {
        None | Some(Value::Null) => return hours,
        Some(Value::Object(days)) => days,
        Some(other) => {
            errors.push(FieldError::cast("openingHours", "object", other));
            return hours;
        }
    };

    for day in Weekday::iter() {
        let path = format!("openingHours.{}", day.key());
        match days.get(day.key()) {
            None | Some(Value::Null) => {}
            Some(Value::Object(times)) => {
                let open = optional_string(times.get("open"), &format!("{}.open", path), errors);
                let close =
                    optional_string(times.get("close"), &format!("{}.close", path), errors);
                hours.set_day(day, Some(DayHours { open, close }));
            }
            Some(other) => errors.push(FieldError::cast(path, "object", other)),
        }
    }

    hours
}
