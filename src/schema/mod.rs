//! Form schema subsystem
//!
//! A schema is an ordered list of typed fields. The validator turns an
//! untyped JSON payload into a normalized record plus at most one error
//! per field.
//!
//! # Design Principles
//!
//! - Field kinds are a closed enum; each kind carries only its own constraints
//! - Validation is total: payload problems are data, never `Err`
//! - Validation is deterministic and stateless
//! - Schemas are immutable once loaded and shared read-only

mod errors;
mod loader;
mod outcome;
mod types;
mod validator;

pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaLoader;
pub use outcome::{FieldError, FieldErrorKind, ValidationResult};
pub use types::{
    FieldDefinition, FieldKind, FormSchema, NumericConstraints, Pattern, SelectOption,
    SelectionConstraints, StringConstraints,
};
pub use validator::{is_empty, validate, FormValidator};
