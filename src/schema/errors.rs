//! Schema error types
//!
//! Error codes:
//! - FORM_SCHEMA_MALFORMED
//! - FORM_SCHEMA_DUPLICATE_FIELD
//! - FORM_SCHEMA_EMPTY_FIELD_NAME
//! - FORM_SCHEMA_MISSING_OPTIONS
//! - FORM_SCHEMA_INVALID_CONSTRAINT
//! - FORM_SCHEMA_INVALID_PATTERN
//!
//! These describe a broken *schema*. Problems with a submitted payload are
//! never errors; they are reported as data in a `ValidationResult`.

use std::fmt;

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Schema source could not be read or parsed
    FormSchemaMalformed,
    /// Two fields share a name
    FormSchemaDuplicateField,
    /// A field has an empty name
    FormSchemaEmptyFieldName,
    /// A select or multi-select field has no options
    FormSchemaMissingOptions,
    /// Constraint bounds contradict each other
    FormSchemaInvalidConstraint,
    /// A pattern does not compile
    FormSchemaInvalidPattern,
}

impl SchemaErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::FormSchemaMalformed => "FORM_SCHEMA_MALFORMED",
            SchemaErrorCode::FormSchemaDuplicateField => "FORM_SCHEMA_DUPLICATE_FIELD",
            SchemaErrorCode::FormSchemaEmptyFieldName => "FORM_SCHEMA_EMPTY_FIELD_NAME",
            SchemaErrorCode::FormSchemaMissingOptions => "FORM_SCHEMA_MISSING_OPTIONS",
            SchemaErrorCode::FormSchemaInvalidConstraint => "FORM_SCHEMA_INVALID_CONSTRAINT",
            SchemaErrorCode::FormSchemaInvalidPattern => "FORM_SCHEMA_INVALID_PATTERN",
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Offending field, if the error is tied to one
    field: Option<String>,
}

impl SchemaError {
    /// Create an error for an unreadable or unparseable schema source
    pub fn malformed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::FormSchemaMalformed,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            field: None,
        }
    }

    /// Create a duplicate field error
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::FormSchemaDuplicateField,
            message: format!("Field '{}' is declared more than once", field),
            field: Some(field),
        }
    }

    /// Create an empty field name error
    pub fn empty_field_name(position: usize) -> Self {
        Self {
            code: SchemaErrorCode::FormSchemaEmptyFieldName,
            message: format!("Field at position {} has an empty name", position),
            field: None,
        }
    }

    /// Create a missing options error
    pub fn missing_options(field: impl Into<String>, type_name: &str) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::FormSchemaMissingOptions,
            message: format!("Field '{}' of type '{}' must declare options", field, type_name),
            field: Some(field),
        }
    }

    /// Create an invalid constraint error
    pub fn invalid_constraint(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            code: SchemaErrorCode::FormSchemaInvalidConstraint,
            message: format!("Field '{}': {}", field, reason.into()),
            field: Some(field),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(pattern: &str, reason: impl fmt::Display) -> Self {
        Self {
            code: SchemaErrorCode::FormSchemaInvalidPattern,
            message: format!("Pattern '{}' does not compile: {}", pattern, reason),
            field: None,
        }
    }

    /// Attach the offending field name
    pub fn for_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the offending field if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)?;
        if let Some(field) = &self.field {
            write!(f, " [field {}]", field)?;
        }
        Ok(())
    }
}

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
