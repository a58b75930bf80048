//! Form schema type definitions
//!
//! Supported field types:
//! - text, textarea, date, select: string-like, trimmed, length/pattern constraints
//! - number: coerced to a JSON number, min/max constraints
//! - multi-select: coerced to an array, minSelected constraint
//! - switch: coerced to a boolean, no constraints
//!
//! Any other type tag is kept as a pass-through field.
//!
//! On the wire a field is the flat `{type, options, validations}` object the
//! form client renders from. In memory each kind carries only the
//! constraints that apply to it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use super::errors::{SchemaError, SchemaResult};

/// A compiled `pattern` constraint.
///
/// Patterns use the `regex` crate syntax and are not vetted beyond
/// compiling. Matching is linear in the input length.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern
    pub fn new(source: impl Into<String>) -> SchemaResult<Self> {
        let source = source.into();
        let regex = Regex::new(&source).map_err(|e| SchemaError::invalid_pattern(&source, e))?;
        Ok(Self { source, regex })
    }

    /// Returns the pattern source
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern matches anywhere in `text`
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Constraints for string-like fields
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringConstraints {
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<Pattern>,
    /// Message reported when `pattern` does not match
    pub message: Option<String>,
}

impl StringConstraints {
    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn pattern(mut self, pattern: Pattern) -> Self {
        self.pattern = Some(pattern);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    fn is_unconstrained(&self) -> bool {
        self.min_length.is_none()
            && self.max_length.is_none()
            && self.pattern.is_none()
            && self.message.is_none()
    }
}

/// Constraints for number fields
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericConstraints {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl NumericConstraints {
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }
}

/// Constraints for multi-select fields
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionConstraints {
    pub min_selected: Option<usize>,
}

impl SelectionConstraints {
    pub fn min_selected(mut self, min: usize) -> Self {
        self.min_selected = Some(min);
        self
    }
}

/// A selectable option of a select or multi-select field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// Field kinds, one variant per type tag
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text(StringConstraints),
    Textarea(StringConstraints),
    Date(StringConstraints),
    Select {
        options: Vec<SelectOption>,
        constraints: StringConstraints,
    },
    MultiSelect {
        options: Vec<SelectOption>,
        constraints: SelectionConstraints,
    },
    Number(NumericConstraints),
    Switch,
    /// Unrecognized type tag; values pass through untouched
    Passthrough { type_name: String },
}

impl FieldKind {
    /// Returns the wire type tag
    pub fn type_name(&self) -> &str {
        match self {
            FieldKind::Text(_) => "text",
            FieldKind::Textarea(_) => "textarea",
            FieldKind::Date(_) => "date",
            FieldKind::Select { .. } => "select",
            FieldKind::MultiSelect { .. } => "multi-select",
            FieldKind::Number(_) => "number",
            FieldKind::Switch => "switch",
            FieldKind::Passthrough { type_name } => type_name,
        }
    }

    /// Returns the options of a select or multi-select field
    pub fn options(&self) -> Option<&[SelectOption]> {
        match self {
            FieldKind::Select { options, .. } | FieldKind::MultiSelect { options, .. } => {
                Some(options)
            }
            _ => None,
        }
    }

    /// Returns the string constraints of a string-like field
    pub fn string_constraints(&self) -> Option<&StringConstraints> {
        match self {
            FieldKind::Text(c)
            | FieldKind::Textarea(c)
            | FieldKind::Date(c)
            | FieldKind::Select { constraints: c, .. } => Some(c),
            _ => None,
        }
    }
}

/// A single form field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "WireField", into = "WireField")]
pub struct FieldDefinition {
    /// Record key, unique within a schema
    pub name: String,
    pub label: String,
    pub required: bool,
    pub placeholder: Option<String>,
    pub default_value: Option<Value>,
    /// Rendering hint for text-like inputs; no validation effect
    pub input_type: Option<String>,
    pub kind: FieldKind,
}

impl FieldDefinition {
    /// Create an optional field labelled with its name
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            required: false,
            placeholder: None,
            default_value: None,
            input_type: None,
            kind,
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Value a blank form starts with for this field
    pub fn initial_value(&self) -> Value {
        if let Some(value) = &self.default_value {
            return value.clone();
        }
        match self.kind {
            FieldKind::Switch => Value::Bool(false),
            FieldKind::MultiSelect { .. } => Value::Array(Vec::new()),
            _ => Value::String(String::new()),
        }
    }
}

/// Complete form schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSchema {
    /// Machine name of the form
    pub name: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Ordered field list
    pub fields: Vec<FieldDefinition>,
}

impl FormSchema {
    /// Create a new schema
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            description: None,
            fields,
        }
    }

    /// Look up a field by name
    pub fn field(&self, name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Returns the field names in schema order
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }

    /// Initial values for a blank form, keyed by field name
    pub fn default_values(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|f| (f.name.clone(), f.initial_value()))
            .collect()
    }

    /// Checks the schema itself, not a submission.
    ///
    /// The validation engine never calls this; a schema that fails here
    /// is still validated against, with unspecified but non-panicking
    /// results.
    pub fn check_integrity(&self) -> SchemaResult<()> {
        let mut seen = HashSet::new();

        for (position, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SchemaError::empty_field_name(position));
            }
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::duplicate_field(&field.name));
            }

            if let Some(options) = field.kind.options() {
                if options.is_empty() {
                    return Err(SchemaError::missing_options(&field.name, field.kind.type_name()));
                }
            }

            match &field.kind {
                FieldKind::Number(c) => {
                    if let (Some(min), Some(max)) = (c.min, c.max) {
                        if min > max {
                            return Err(SchemaError::invalid_constraint(
                                &field.name,
                                format!("min {} exceeds max {}", min, max),
                            ));
                        }
                    }
                }
                FieldKind::MultiSelect { options, constraints } => {
                    if let Some(min) = constraints.min_selected {
                        if min > options.len() {
                            return Err(SchemaError::invalid_constraint(
                                &field.name,
                                format!("minSelected {} exceeds {} options", min, options.len()),
                            ));
                        }
                    }
                }
                _ => {}
            }

            if let Some(c) = field.kind.string_constraints() {
                if let (Some(min), Some(max)) = (c.min_length, c.max_length) {
                    if min > max {
                        return Err(SchemaError::invalid_constraint(
                            &field.name,
                            format!("minLength {} exceeds maxLength {}", min, max),
                        ));
                    }
                }
            }
        }

        Ok(())
    }
}

// ==================
// Wire form
// ==================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    min_selected: Option<usize>,
}

impl WireConstraints {
    fn to_string_constraints(&self) -> SchemaResult<StringConstraints> {
        let pattern = self.pattern.as_deref().map(Pattern::new).transpose()?;
        Ok(StringConstraints {
            min_length: self.min_length,
            max_length: self.max_length,
            pattern,
            message: self.message.clone(),
        })
    }

    fn from_string_constraints(c: &StringConstraints) -> Option<Self> {
        if c.is_unconstrained() {
            return None;
        }
        Some(Self {
            min_length: c.min_length,
            max_length: c.max_length,
            pattern: c.pattern.as_ref().map(|p| p.as_str().to_string()),
            message: c.message.clone(),
            ..Default::default()
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireField {
    name: String,
    #[serde(default)]
    label: String,
    #[serde(rename = "type")]
    field_type: String,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    options: Option<Vec<SelectOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    validations: Option<WireConstraints>,
}

impl TryFrom<WireField> for FieldDefinition {
    type Error = SchemaError;

    fn try_from(wire: WireField) -> SchemaResult<Self> {
        let cfg = wire.validations.unwrap_or_default();
        let with_field = |e: SchemaError| e.for_field(&wire.name);

        let kind = match wire.field_type.as_str() {
            "text" => FieldKind::Text(cfg.to_string_constraints().map_err(with_field)?),
            "textarea" => FieldKind::Textarea(cfg.to_string_constraints().map_err(with_field)?),
            "date" => FieldKind::Date(cfg.to_string_constraints().map_err(with_field)?),
            "select" => FieldKind::Select {
                options: wire.options.unwrap_or_default(),
                constraints: cfg.to_string_constraints().map_err(with_field)?,
            },
            "multi-select" => FieldKind::MultiSelect {
                options: wire.options.unwrap_or_default(),
                constraints: SelectionConstraints {
                    min_selected: cfg.min_selected,
                },
            },
            "number" => FieldKind::Number(NumericConstraints {
                min: cfg.min,
                max: cfg.max,
            }),
            "switch" => FieldKind::Switch,
            other => FieldKind::Passthrough {
                type_name: other.to_string(),
            },
        };

        Ok(FieldDefinition {
            name: wire.name,
            label: wire.label,
            required: wire.required,
            placeholder: wire.placeholder,
            default_value: wire.default_value,
            input_type: wire.input_type,
            kind,
        })
    }
}

impl From<FieldDefinition> for WireField {
    fn from(field: FieldDefinition) -> Self {
        let field_type = field.kind.type_name().to_string();
        let (options, validations) = match field.kind {
            FieldKind::Text(c) | FieldKind::Textarea(c) | FieldKind::Date(c) => {
                (None, WireConstraints::from_string_constraints(&c))
            }
            FieldKind::Select {
                options,
                constraints,
            } => (
                Some(options),
                WireConstraints::from_string_constraints(&constraints),
            ),
            FieldKind::MultiSelect {
                options,
                constraints,
            } => (
                Some(options),
                constraints.min_selected.map(|min| WireConstraints {
                    min_selected: Some(min),
                    ..Default::default()
                }),
            ),
            FieldKind::Number(c) => (
                None,
                (c.min.is_some() || c.max.is_some()).then(|| WireConstraints {
                    min: c.min,
                    max: c.max,
                    ..Default::default()
                }),
            ),
            FieldKind::Switch | FieldKind::Passthrough { .. } => (None, None),
        };

        WireField {
            name: field.name,
            label: field.label,
            field_type,
            required: field.required,
            placeholder: field.placeholder,
            options,
            default_value: field.default_value,
            input_type: field.input_type,
            validations,
        }
    }
}
