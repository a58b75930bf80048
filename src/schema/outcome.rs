//! Validation outcome types
//!
//! A failed rule is data, not a fault: each field carries at most one
//! `FieldError`, and the whole call yields a `ValidationResult`.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Category of a field-level failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Input could not be coerced to the field's type
    TypeCoercion,
    /// Numeric min/max violation
    Range,
    /// minLength/maxLength violation
    Length,
    /// Pattern did not match
    PatternMismatch,
    /// Too few options selected
    SelectionCount,
    /// Required field is empty
    RequiredField,
}

impl FieldErrorKind {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            FieldErrorKind::TypeCoercion => "FORM_TYPE_COERCION",
            FieldErrorKind::Range => "FORM_RANGE",
            FieldErrorKind::Length => "FORM_LENGTH",
            FieldErrorKind::PatternMismatch => "FORM_PATTERN_MISMATCH",
            FieldErrorKind::SelectionCount => "FORM_SELECTION_COUNT",
            FieldErrorKind::RequiredField => "FORM_REQUIRED_FIELD",
        }
    }
}

/// A single field-level failure. `Display` is the user-facing message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Must be a number")]
    NotANumber,

    #[error("Must be at least {}", display_number(.min))]
    BelowMinimum { min: f64 },

    #[error("Must be at most {}", display_number(.max))]
    AboveMaximum { max: f64 },

    #[error("Must be at least {min_length} characters")]
    TooShort { min_length: usize },

    #[error("Must be at most {max_length} characters")]
    TooLong { max_length: usize },

    #[error("{}", .message.as_deref().unwrap_or("Invalid format"))]
    PatternMismatch { message: Option<String> },

    #[error("Please select at least {} {}", .min_selected, option_noun(.min_selected))]
    TooFewSelected { min_selected: usize },

    #[error("This field is required")]
    Required,
}

impl FieldError {
    /// Returns the failure category
    pub fn kind(&self) -> FieldErrorKind {
        match self {
            FieldError::NotANumber => FieldErrorKind::TypeCoercion,
            FieldError::BelowMinimum { .. } | FieldError::AboveMaximum { .. } => {
                FieldErrorKind::Range
            }
            FieldError::TooShort { .. } | FieldError::TooLong { .. } => FieldErrorKind::Length,
            FieldError::PatternMismatch { .. } => FieldErrorKind::PatternMismatch,
            FieldError::TooFewSelected { .. } => FieldErrorKind::SelectionCount,
            FieldError::Required => FieldErrorKind::RequiredField,
        }
    }
}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Renders a bound the way a form user typed it: `18`, not `18.0`.
fn display_number(n: &f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", *n as i64)
    } else {
        n.to_string()
    }
}

fn option_noun(count: &usize) -> &'static str {
    if *count == 1 {
        "option"
    } else {
        "options"
    }
}

/// Result of validating one payload against one schema
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    /// True when `errors` is empty
    pub is_valid: bool,
    /// Field name to its single error
    pub errors: BTreeMap<String, FieldError>,
    /// One coerced value per schema field, present even when invalid
    pub normalized: Map<String, Value>,
}

impl ValidationResult {
    pub(crate) fn assemble(
        errors: BTreeMap<String, FieldError>,
        normalized: Map<String, Value>,
    ) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            normalized,
        }
    }

    /// Returns the error for a field, if any
    pub fn error(&self, field: &str) -> Option<&FieldError> {
        self.errors.get(field)
    }

    /// Returns the error messages keyed by field name
    pub fn messages(&self) -> BTreeMap<String, String> {
        self.errors
            .iter()
            .map(|(name, err)| (name.clone(), err.to_string()))
            .collect()
    }

    /// Yields the normalized record only when the payload is valid.
    ///
    /// This is the record a caller may persist.
    pub fn into_normalized(self) -> Result<Map<String, Value>, BTreeMap<String, FieldError>> {
        if self.is_valid {
            Ok(self.normalized)
        } else {
            Err(self.errors)
        }
    }
}
