//! Submission validation and normalization
//!
//! Validation semantics, per field and in schema order:
//! 1. Kind-specific coercion and constraint checks; the first failing
//!    check sets the field's error
//! 2. Required check, only when no error is set yet
//! 3. The coerced value is written to the normalized record; absent
//!    values become `null`, except multi-select which is always an array
//!
//! The engine is total: it never returns `Err` and never panics on any
//! payload/schema pair. It performs no I/O and holds no state, so a single
//! `FormValidator` can be shared across request handlers.

use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use std::sync::Arc;

use super::outcome::{FieldError, ValidationResult};
use super::types::{
    FieldKind, FormSchema, NumericConstraints, SelectionConstraints, StringConstraints,
};

/// Validates payloads against one shared schema.
#[derive(Debug, Clone)]
pub struct FormValidator {
    schema: Arc<FormSchema>,
}

impl FormValidator {
    /// Creates a validator over the given schema.
    pub fn new(schema: Arc<FormSchema>) -> Self {
        Self { schema }
    }

    /// Returns a shared handle to the schema.
    pub fn shared_schema(&self) -> Arc<FormSchema> {
        Arc::clone(&self.schema)
    }

    /// Validates a raw payload.
    pub fn validate(&self, raw: &Value) -> ValidationResult {
        validate(raw, &self.schema)
    }
}

/// Validates and normalizes `raw` against `schema`.
///
/// A payload that is not a JSON object is treated as an empty object.
pub fn validate(raw: &Value, schema: &FormSchema) -> ValidationResult {
    let empty = Map::new();
    let payload = raw.as_object().unwrap_or(&empty);

    let mut errors = BTreeMap::new();
    let mut normalized = Map::new();

    for field in &schema.fields {
        let raw_value = payload.get(&field.name).cloned().unwrap_or(Value::Null);
        let (value, mut error) = check_field(&field.kind, raw_value);

        if error.is_none() && field.required && is_empty(&value) {
            error = Some(FieldError::Required);
        }

        if let Some(error) = error {
            errors.insert(field.name.clone(), error);
        }
        normalized.insert(field.name.clone(), value);
    }

    ValidationResult::assemble(errors, normalized)
}

/// Whether a coerced value counts as "not filled in".
///
/// Missing, `null`, `""` and `[]` are empty. `false` and `0` are not.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Loose truthiness used for switches and for "value present" tests.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn check_field(kind: &FieldKind, raw: Value) -> (Value, Option<FieldError>) {
    match kind {
        FieldKind::Number(constraints) => check_number(raw, constraints),
        FieldKind::Switch => (Value::Bool(is_truthy(&raw)), None),
        FieldKind::MultiSelect { constraints, .. } => check_selection(raw, constraints),
        FieldKind::Text(constraints)
        | FieldKind::Textarea(constraints)
        | FieldKind::Date(constraints)
        | FieldKind::Select { constraints, .. } => check_text(raw, constraints),
        FieldKind::Passthrough { .. } => (raw, None),
    }
}

fn check_number(raw: Value, constraints: &NumericConstraints) -> (Value, Option<FieldError>) {
    if raw.is_null() || raw.as_str() == Some("") {
        return (raw, None);
    }

    let Some(number) = coerce_number(&raw) else {
        return (raw, Some(FieldError::NotANumber));
    };

    let error = match (constraints.min, constraints.max) {
        (Some(min), _) if number < min => Some(FieldError::BelowMinimum { min }),
        (_, Some(max)) if number > max => Some(FieldError::AboveMaximum { max }),
        _ => None,
    };

    (number_value(number), error)
}

/// Numeric coercion: numbers as-is, trimmed decimal strings, booleans as 1/0.
/// A whitespace-only string is zero.
fn coerce_number(raw: &Value) -> Option<f64> {
    let number = match raw {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) if s.trim().is_empty() => 0.0,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        _ => return None,
    };
    number.is_finite().then_some(number)
}

/// Integral values are stored as JSON integers.
fn number_value(number: f64) -> Value {
    const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

    if number.fract() == 0.0 && number.abs() <= MAX_SAFE_INTEGER {
        Value::from(number as i64)
    } else {
        Number::from_f64(number).map_or(Value::Null, Value::Number)
    }
}

fn check_selection(raw: Value, constraints: &SelectionConstraints) -> (Value, Option<FieldError>) {
    let selected = match raw {
        Value::Null => Vec::new(),
        Value::String(s) if s.is_empty() => Vec::new(),
        Value::Array(items) => items,
        other => vec![other],
    };

    let error = constraints
        .min_selected
        .filter(|&min| selected.len() < min)
        .map(|min_selected| FieldError::TooFewSelected { min_selected });

    (Value::Array(selected), error)
}

fn check_text(raw: Value, constraints: &StringConstraints) -> (Value, Option<FieldError>) {
    let value = match raw {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other,
    };
    let error = text_error(&value, constraints);
    (value, error)
}

fn text_error(value: &Value, constraints: &StringConstraints) -> Option<FieldError> {
    // Non-empty strings count characters, arrays count elements.
    let length = match value {
        Value::String(s) if !s.is_empty() => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    };

    if let (Some(min_length), Some(len)) = (constraints.min_length, length) {
        if len < min_length {
            return Some(FieldError::TooShort { min_length });
        }
    }

    if let (Some(max_length), Some(len)) = (constraints.max_length, length) {
        if len > max_length {
            return Some(FieldError::TooLong { max_length });
        }
    }

    if let Some(pattern) = &constraints.pattern {
        if is_truthy(value) && !pattern.is_match(&match_text(value)) {
            return Some(FieldError::PatternMismatch {
                message: constraints.message.clone(),
            });
        }
    }

    None
}

/// Text a pattern is tested against. Arrays join their elements with `,`;
/// objects render as `[object Object]`.
fn match_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() => f.to_string(),
            _ => n.to_string(),
        },
        Value::Array(items) => items.iter().map(match_text).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{FieldDefinition, Pattern, SelectOption};
    use serde_json::json;

    fn single(field: FieldDefinition) -> FormSchema {
        FormSchema::new("test", "Test", vec![field])
    }

    fn age_schema() -> FormSchema {
        single(
            FieldDefinition::new(
                "age",
                FieldKind::Number(NumericConstraints::default().min(18.0).max(65.0)),
            )
            .required(),
        )
    }

    fn email_schema(message: Option<&str>) -> FormSchema {
        let mut constraints =
            StringConstraints::default().pattern(Pattern::new(r"^\S+@\S+\.\S+$").unwrap());
        if let Some(message) = message {
            constraints = constraints.message(message);
        }
        single(FieldDefinition::new("email", FieldKind::Text(constraints)))
    }

    fn skills_schema(min_selected: Option<usize>) -> FormSchema {
        let mut constraints = SelectionConstraints::default();
        constraints.min_selected = min_selected;
        single(
            FieldDefinition::new(
                "skills",
                FieldKind::MultiSelect {
                    options: vec![SelectOption::new("Rust", "rust"), SelectOption::new("Go", "go")],
                    constraints,
                },
            )
            .required(),
        )
    }

    #[test]
    fn test_number_below_minimum_is_still_coerced() {
        let result = validate(&json!({ "age": "17" }), &age_schema());
        assert!(!result.is_valid);
        assert_eq!(result.error("age"), Some(&FieldError::BelowMinimum { min: 18.0 }));
        assert_eq!(result.normalized["age"], json!(17));
    }

    #[test]
    fn test_number_above_maximum() {
        let result = validate(&json!({ "age": 70 }), &age_schema());
        assert_eq!(result.errors["age"].to_string(), "Must be at most 65");
    }

    #[test]
    fn test_number_not_a_number_keeps_raw_value() {
        let result = validate(&json!({ "age": "abc" }), &age_schema());
        assert_eq!(result.error("age"), Some(&FieldError::NotANumber));
        assert_eq!(result.normalized["age"], json!("abc"));
    }

    #[test]
    fn test_number_rejects_non_finite_and_blank() {
        for raw in [json!("NaN"), json!("inf"), json!([1]), json!({})] {
            let result = validate(&json!({ "age": raw }), &age_schema());
            assert_eq!(result.error("age"), Some(&FieldError::NotANumber));
        }
    }

    #[test]
    fn test_whitespace_number_is_zero() {
        let result = validate(&json!({ "age": "   " }), &age_schema());
        assert_eq!(result.error("age"), Some(&FieldError::BelowMinimum { min: 18.0 }));
        assert_eq!(result.normalized["age"], json!(0));

        let schema = single(FieldDefinition::new(
            "score",
            FieldKind::Number(NumericConstraints::default()),
        ));
        let result = validate(&json!({ "score": "\t" }), &schema);
        assert!(result.is_valid);
        assert_eq!(result.normalized["score"], json!(0));
    }

    #[test]
    fn test_number_trims_and_keeps_fractions() {
        let schema = single(FieldDefinition::new(
            "score",
            FieldKind::Number(NumericConstraints::default()),
        ));
        let result = validate(&json!({ "score": " 2.5 " }), &schema);
        assert!(result.is_valid);
        assert_eq!(result.normalized["score"], json!(2.5));
    }

    #[test]
    fn test_empty_number_is_required_not_coercion() {
        let result = validate(&json!({ "age": "" }), &age_schema());
        assert_eq!(result.error("age"), Some(&FieldError::Required));
        assert_eq!(result.normalized["age"], json!(""));

        let result = validate(&json!({}), &age_schema());
        assert_eq!(result.error("age"), Some(&FieldError::Required));
        assert_eq!(result.normalized["age"], Value::Null);
    }

    #[test]
    fn test_pattern_default_and_custom_message() {
        let result = validate(&json!({ "email": "bad" }), &email_schema(None));
        assert_eq!(result.errors["email"].to_string(), "Invalid format");

        let result = validate(&json!({ "email": "bad" }), &email_schema(Some("Use a real email")));
        assert_eq!(result.errors["email"].to_string(), "Use a real email");

        let result = validate(&json!({ "email": "  a@b.co  " }), &email_schema(None));
        assert!(result.is_valid);
        assert_eq!(result.normalized["email"], json!("a@b.co"));
    }

    #[test]
    fn test_pattern_skipped_for_empty_optional_value() {
        let result = validate(&json!({ "email": "" }), &email_schema(None));
        assert!(result.is_valid);
    }

    #[test]
    fn test_length_checks_count_characters_after_trim() {
        let schema = single(FieldDefinition::new(
            "name",
            FieldKind::Text(StringConstraints::default().min_length(3).max_length(5)),
        ));

        let result = validate(&json!({ "name": "  ab  " }), &schema);
        assert_eq!(result.error("name"), Some(&FieldError::TooShort { min_length: 3 }));

        let result = validate(&json!({ "name": "ééééé" }), &schema);
        assert!(result.is_valid);

        let result = validate(&json!({ "name": "abcdef" }), &schema);
        assert_eq!(result.error("name"), Some(&FieldError::TooLong { max_length: 5 }));
    }

    #[test]
    fn test_length_wins_over_pattern() {
        let schema = single(FieldDefinition::new(
            "code",
            FieldKind::Text(
                StringConstraints::default()
                    .min_length(4)
                    .pattern(Pattern::new("^[0-9]+$").unwrap()),
            ),
        ));
        let result = validate(&json!({ "code": "ab" }), &schema);
        assert_eq!(result.error("code"), Some(&FieldError::TooShort { min_length: 4 }));
    }

    #[test]
    fn test_non_string_text_value_passes_through() {
        let schema = single(FieldDefinition::new(
            "zip",
            FieldKind::Text(StringConstraints::default().pattern(Pattern::new("^[0-9]{5}$").unwrap())),
        ));
        let result = validate(&json!({ "zip": 12345 }), &schema);
        assert!(result.is_valid);
        assert_eq!(result.normalized["zip"], json!(12345));

        let result = validate(&json!({ "zip": ["12345"] }), &schema);
        assert!(result.is_valid);
        assert_eq!(result.normalized["zip"], json!(["12345"]));

        let result = validate(&json!({ "zip": ["123", "45"] }), &schema);
        assert_eq!(result.error("zip"), Some(&FieldError::PatternMismatch { message: None }));

        let result = validate(&json!({ "zip": { "code": "12345" } }), &schema);
        assert_eq!(result.error("zip"), Some(&FieldError::PatternMismatch { message: None }));
    }

    #[test]
    fn test_array_text_value_counts_elements() {
        let schema = single(FieldDefinition::new(
            "tags",
            FieldKind::Text(StringConstraints::default().min_length(2).max_length(3)),
        ));

        let result = validate(&json!({ "tags": ["a"] }), &schema);
        assert_eq!(result.error("tags"), Some(&FieldError::TooShort { min_length: 2 }));

        let result = validate(&json!({ "tags": ["a", "b", "c", "d"] }), &schema);
        assert_eq!(result.error("tags"), Some(&FieldError::TooLong { max_length: 3 }));

        let result = validate(&json!({ "tags": [] }), &schema);
        assert_eq!(result.error("tags"), Some(&FieldError::TooShort { min_length: 2 }));

        let result = validate(&json!({ "tags": ["ab", "cd"] }), &schema);
        assert!(result.is_valid);
    }

    #[test]
    fn test_switch_coercion() {
        let schema = single(FieldDefinition::new("remote", FieldKind::Switch));
        let cases = [
            (json!({}), false),
            (json!({ "remote": null }), false),
            (json!({ "remote": "" }), false),
            (json!({ "remote": 0 }), false),
            (json!({ "remote": false }), false),
            (json!({ "remote": true }), true),
            (json!({ "remote": "yes" }), true),
            (json!({ "remote": 1 }), true),
        ];
        for (payload, expected) in cases {
            let result = validate(&payload, &schema);
            assert!(result.is_valid);
            assert_eq!(result.normalized["remote"], json!(expected), "payload {}", payload);
        }
    }

    #[test]
    fn test_required_switch_accepts_false() {
        let schema = single(FieldDefinition::new("agree", FieldKind::Switch).required());
        let result = validate(&json!({}), &schema);
        assert!(result.is_valid);
    }

    #[test]
    fn test_multi_select_normalization() {
        let schema = skills_schema(None);

        let result = validate(&json!({ "skills": "rust" }), &schema);
        assert_eq!(result.normalized["skills"], json!(["rust"]));

        let result = validate(&json!({ "skills": ["rust", "go"] }), &schema);
        assert_eq!(result.normalized["skills"], json!(["rust", "go"]));

        let result = validate(&json!({ "skills": "" }), &schema);
        assert_eq!(result.normalized["skills"], json!([]));
        assert_eq!(result.error("skills"), Some(&FieldError::Required));
    }

    #[test]
    fn test_min_selected_wins_over_required() {
        let result = validate(&json!({}), &skills_schema(Some(1)));
        assert_eq!(result.normalized["skills"], json!([]));
        assert_eq!(
            result.errors["skills"].to_string(),
            "Please select at least 1 option"
        );
    }

    #[test]
    fn test_min_selected_counts_scalar_as_one() {
        let result = validate(&json!({ "skills": "rust" }), &skills_schema(Some(2)));
        assert_eq!(
            result.errors["skills"].to_string(),
            "Please select at least 2 options"
        );
    }

    #[test]
    fn test_passthrough_field() {
        let schema = single(
            FieldDefinition::new(
                "rating",
                FieldKind::Passthrough {
                    type_name: "stars".into(),
                },
            )
            .required(),
        );

        let result = validate(&json!({ "rating": { "value": 4 } }), &schema);
        assert!(result.is_valid);
        assert_eq!(result.normalized["rating"], json!({ "value": 4 }));

        let result = validate(&json!({ "rating": "" }), &schema);
        assert_eq!(result.error("rating"), Some(&FieldError::Required));
    }

    #[test]
    fn test_non_object_payload_treated_as_empty() {
        let result = validate(&json!(["not", "an", "object"]), &age_schema());
        assert_eq!(result.normalized.len(), 1);
        assert_eq!(result.error("age"), Some(&FieldError::Required));
    }

    #[test]
    fn test_unknown_payload_keys_are_dropped() {
        let result = validate(&json!({ "age": 30, "extra": "x" }), &age_schema());
        assert!(result.is_valid);
        assert!(!result.normalized.contains_key("extra"));
    }

    #[test]
    fn test_is_empty() {
        assert!(is_empty(&Value::Null));
        assert!(is_empty(&json!("")));
        assert!(is_empty(&json!([])));
        assert!(!is_empty(&json!(false)));
        assert!(!is_empty(&json!(0)));
        assert!(!is_empty(&json!({})));
    }

    #[test]
    fn test_form_validator_shares_schema() {
        let validator = FormValidator::new(Arc::new(age_schema()));
        let first = validator.validate(&json!({ "age": 40 }));
        let second = validator.clone().validate(&json!({ "age": 40 }));
        assert_eq!(first, second);
        assert_eq!(validator.shared_schema().name, "test");
    }
}
