//! Validation Engine Tests
//!
//! End-to-end behavior of the validation and normalization pass against the
//! built-in employee onboarding schema:
//! - One normalized entry per schema field, valid or not
//! - At most one error per field
//! - Normalizing a normalized record changes nothing
//! - Required fields are never empty in a valid record

use formintake::schema::{
    is_empty, validate, FieldErrorKind, FormSchema, FormValidator, SchemaLoader, ValidationResult,
};
use serde_json::{json, Value};
use std::sync::Arc;

// =============================================================================
// Helper Functions
// =============================================================================

fn onboarding() -> FormSchema {
    SchemaLoader::builtin().load().unwrap()
}

fn valid_payload() -> Value {
    json!({
        "fullName": "  Ada Lovelace ",
        "email": "ada@example.com",
        "age": "36",
        "department": "engineering",
        "skills": ["ts", "node"],
        "joiningDate": "2026-03-01",
        "remote": true,
        "about": "Enjoys analytical engines."
    })
}

fn run(payload: Value) -> ValidationResult {
    validate(&payload, &onboarding())
}

// =============================================================================
// Scenarios
// =============================================================================

/// Out-of-range age is reported but still coerced.
#[test]
fn test_age_below_minimum() {
    let result = run(json!({ "age": "17" }));

    assert!(!result.is_valid);
    assert_eq!(result.messages()["age"], "Must be at least 18");
    assert_eq!(result.normalized["age"], json!(17));
    assert_eq!(result.error("age").unwrap().kind(), FieldErrorKind::Range);
}

/// The schema's custom message replaces the generic one.
#[test]
fn test_email_pattern_uses_custom_message() {
    let result = run(json!({ "email": "bad" }));

    assert_eq!(
        result.messages()["email"],
        "Please enter a valid email address."
    );
    assert_eq!(
        result.error("email").unwrap().kind(),
        FieldErrorKind::PatternMismatch
    );
}

/// An empty required multi-select reports the selection count, not "required".
#[test]
fn test_skills_missing() {
    let result = run(json!({}));

    assert_eq!(result.normalized["skills"], json!([]));
    assert_eq!(result.messages()["skills"], "Please select at least 1 option");
}

/// An optional switch defaults to false without error.
#[test]
fn test_remote_missing() {
    let result = run(json!({}));

    assert_eq!(result.normalized["remote"], json!(false));
    assert!(result.error("remote").is_none());
}

#[test]
fn test_full_valid_payload() {
    let result = run(valid_payload());

    assert!(result.is_valid, "unexpected errors: {:?}", result.messages());
    assert!(result.errors.is_empty());
    assert_eq!(result.normalized["fullName"], "Ada Lovelace");
    assert_eq!(result.normalized["age"], json!(36));
    assert_eq!(result.normalized["skills"], json!(["ts", "node"]));
    assert_eq!(result.normalized["remote"], json!(true));
}

// =============================================================================
// Invariants
// =============================================================================

/// Normalizing an already normalized valid record is a no-op.
#[test]
fn test_normalization_is_idempotent() {
    let schema = onboarding();
    let first = validate(&valid_payload(), &schema);
    let second = validate(&Value::Object(first.normalized.clone()), &schema);

    assert_eq!(first, second);
}

/// Every payload shape yields exactly one entry per field.
#[test]
fn test_validation_is_total() {
    let schema = onboarding();
    let payloads = [
        json!(null),
        json!([1, 2, 3]),
        json!("just a string"),
        json!({}),
        json!({ "age": {}, "skills": { "a": 1 }, "remote": "false", "extra": 1 }),
        json!({ "fullName": 42, "email": true, "age": [], "about": null }),
    ];

    for payload in &payloads {
        let result = validate(payload, &schema);
        let keys: Vec<&str> = result.normalized.keys().map(String::as_str).collect();
        let names: Vec<&str> = schema.field_names().collect();

        assert_eq!(keys.len(), names.len());
        for name in names {
            assert!(result.normalized.contains_key(name), "missing {}", name);
        }
        assert_eq!(result.is_valid, result.errors.is_empty());
    }
}

/// No required field is empty in a valid record.
#[test]
fn test_required_fields_never_empty_when_valid() {
    let schema = onboarding();
    let result = validate(&valid_payload(), &schema);
    assert!(result.is_valid);

    for field in schema.fields.iter().filter(|f| f.required) {
        assert!(!is_empty(&result.normalized[&field.name]), "{}", field.name);
    }
}

#[test]
fn test_multi_select_shapes() {
    let scalar = run(json!({ "skills": "ts" }));
    assert_eq!(scalar.normalized["skills"], json!(["ts"]));
    assert!(scalar.error("skills").is_none());

    let list = run(json!({ "skills": ["css", "html"] }));
    assert_eq!(list.normalized["skills"], json!(["css", "html"]));
}

/// Both bounds are inclusive.
#[test]
fn test_age_bounds_are_inclusive() {
    for age in [json!(18), json!("65"), json!(18.0)] {
        let mut payload = valid_payload();
        payload["age"] = age.clone();

        let result = run(payload);
        assert!(result.is_valid, "age {} rejected: {:?}", age, result.messages());
    }

    let mut payload = valid_payload();
    payload["age"] = json!(65.5);
    assert_eq!(run(payload).messages()["age"], "Must be at most 65");
}

#[test]
fn test_age_not_a_number_keeps_raw_value() {
    let result = run(json!({ "age": "abc" }));

    assert_eq!(result.messages()["age"], "Must be a number");
    assert_eq!(result.normalized["age"], "abc");
}

#[test]
fn test_missing_required_text() {
    let result = run(json!({ "fullName": "   " }));

    assert_eq!(result.messages()["fullName"], "This field is required");
    assert_eq!(result.normalized["fullName"], "");
}

#[test]
fn test_about_too_long() {
    let mut payload = valid_payload();
    payload["about"] = json!("x".repeat(501));

    let result = run(payload);
    assert!(!result.is_valid);
    assert_eq!(result.messages()["about"], "Must be at most 500 characters");
    assert_eq!(result.errors.len(), 1);
}

/// The serialized result uses camelCase keys and plain string messages.
#[test]
fn test_result_wire_shape() {
    let validator = FormValidator::new(Arc::new(onboarding()));
    let result = validator.validate(&json!({ "age": "70" }));
    let wire = serde_json::to_value(&result).unwrap();

    assert_eq!(wire["isValid"], json!(false));
    assert_eq!(wire["errors"]["age"], "Must be at most 65");
    assert_eq!(wire["normalized"]["age"], json!(70));
}
