use std::borrow::Cow;

use lazy_static::lazy_static;
use regex::Regex;
use rust_decimal::Decimal;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

lazy_static! {
    /// Plain decimal notation for coordinates
    /// - Valid: "40.7128", "-74.0060", "0", "+12.5", ".5", "-.5", "40."
    /// - Invalid: "1e5", "40,7128", "1_000", ".", "abc"
    pub static ref DECIMAL_REGEX: Regex =
        Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)$").unwrap();
}

/// Parse a coordinate written in plain decimal notation
pub fn parse_decimal(value: &str) -> Option<Decimal> {
    let value = value.trim();
    if !DECIMAL_REGEX.is_match(value) {
        return None;
    }

    let (sign, digits) = match value.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", value.trim_start_matches('+')),
    };
    // ".5" -> "0.5", "40." -> "40"
    let digits = digits.strip_suffix('.').unwrap_or(digits);
    let lead = if digits.starts_with('.') { "0" } else { "" };

    format!("{}{}{}", sign, lead, digits).parse::<Decimal>().ok()
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error("blank", "must not be blank"));
    }
    Ok(())
}

pub fn validate_latitude(value: &str) -> Result<(), ValidationError> {
    validate_coordinate(value, 90)
}

pub fn validate_longitude(value: &str) -> Result<(), ValidationError> {
    validate_coordinate(value, 180)
}

fn validate_coordinate(value: &str, bound: i64) -> Result<(), ValidationError> {
    let decimal =
        parse_decimal(value).ok_or_else(|| error("decimal", "must be a decimal number"))?;

    let bound = Decimal::from(bound);
    if decimal < -bound || decimal > bound {
        return Err(error(
            "range",
            format!("must be between {} and {}", -bound, bound),
        ));
    }
    Ok(())
}

fn error(code: &'static str, message: impl Into<Cow<'static, str>>) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

/// Flatten validator output into sorted "field: message" lines
pub fn describe_errors(errors: &ValidationErrors) -> Vec<String> {
    let mut lines: Vec<String> = errors
        .errors()
        .iter()
        .flat_map(|(field, kind)| match kind {
            ValidationErrorsKind::Field(list) => list
                .iter()
                .map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string());
                    format!("{}: {}", camel_case(field), message)
                })
                .collect::<Vec<_>>(),
            _ => vec![format!("{}: invalid", camel_case(field))],
        })
        .collect();

    lines.sort();
    lines
}

/// `incident_type` -> `incidentType`, matching the wire names
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}
