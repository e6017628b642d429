//! Field-level validation errors shared by record forms and questionnaire
//! submissions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One failed field with a human-readable reason.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Every field error found in one form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// Whether `field` has at least one error.
    #[must_use]
    pub fn has(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    /// `Ok(value)` when no errors were collected.
    ///
    /// # Errors
    ///
    /// Returns `self` when any field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Check a decimal fits a `(max_digits, decimal_places)` column. The sign is
/// not counted as a digit.
pub fn check_decimal(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<f64>,
    max_digits: u32,
    decimal_places: u32,
) {
    let Some(v) = value else { return };
    if !v.is_finite() {
        errors.push(field, "must be a finite number");
        return;
    }
    let int_digits = max_digits - decimal_places;
    let limit = 10f64.powi(i32::try_from(int_digits).unwrap_or(i32::MAX));
    if v.abs() >= limit {
        errors.push(
            field,
            format!("must have at most {int_digits} digits before the decimal point"),
        );
    }
    let scale = 10f64.powi(i32::try_from(decimal_places).unwrap_or(i32::MAX));
    let scaled = v.abs() * scale;
    if (scaled - scaled.round()).abs() > 1e-6 {
        errors.push(
            field,
            format!("must have at most {decimal_places} decimal places"),
        );
    }
}

/// Check an optional text does not exceed `max_chars`.
pub fn check_max_len(errors: &mut ValidationErrors, field: &str, value: Option<&str>, max_chars: usize) {
    if let Some(v) = value
        && v.chars().count() > max_chars
    {
        errors.push(field, format!("must be at most {max_chars} characters"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(1234.56), 6, 2, true)]
    #[case(Some(10000.0), 6, 2, false)]
    #[case(Some(12.345), 6, 2, false)]
    #[case(Some(-1.0), 6, 2, true)]
    #[case(Some(-9999.99), 6, 2, true)]
    #[case(Some(-10000.0), 6, 2, false)]
    #[case(Some(-1.005), 6, 2, false)]
    #[case(Some(0.1234), 10, 4, true)]
    #[case(None, 5, 2, true)]
    fn decimal_bounds(
        #[case] value: Option<f64>,
        #[case] max_digits: u32,
        #[case] places: u32,
        #[case] ok: bool,
    ) {
        let mut errors = ValidationErrors::new();
        check_decimal(&mut errors, "x", value, max_digits, places);
        assert_eq!(errors.is_empty(), ok, "{errors}");
    }

    #[test]
    fn max_len_counts_chars() {
        let mut errors = ValidationErrors::new();
        check_max_len(&mut errors, "nyha_class", Some("ééééé"), 5);
        assert!(errors.is_empty());
        check_max_len(&mut errors, "nyha_class", Some("abcdef"), 5);
        assert!(errors.has("nyha_class"));
    }
}
