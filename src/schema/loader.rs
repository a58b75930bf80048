//! Schema loader
//!
//! A form schema comes from one of two places:
//! - a JSON file in wire form, named by configuration
//! - the built-in employee onboarding schema, compiled into the binary
//!
//! Every loaded schema is integrity-checked before it is handed out, so a
//! running server only ever validates against a well-formed schema.

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use super::errors::{SchemaError, SchemaResult};
use super::types::{FieldDefinition, FormSchema, WireField};

/// Wire form of the built-in schema
const BUILTIN_SCHEMA: &str = include_str!("../../schemas/employee-onboarding.json");

/// Source name used in errors for the built-in schema
const BUILTIN_SOURCE: &str = "<builtin>";

#[derive(Deserialize)]
struct WireSchema {
    name: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    fields: Vec<WireField>,
}

/// Loads a form schema from disk or from the built-in definition.
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    /// Schema file; `None` selects the built-in schema
    path: Option<PathBuf>,
}

impl SchemaLoader {
    /// Creates a loader for the given schema file, or the built-in schema.
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Creates a loader for the built-in schema.
    pub fn builtin() -> Self {
        Self { path: None }
    }

    /// Returns a printable name for the schema source.
    pub fn source_name(&self) -> String {
        match &self.path {
            Some(path) => path.display().to_string(),
            None => BUILTIN_SOURCE.to_string(),
        }
    }

    /// Loads and integrity-checks the schema.
    pub fn load(&self) -> SchemaResult<FormSchema> {
        match &self.path {
            Some(path) => {
                let content = fs::read_to_string(path).map_err(|e| {
                    SchemaError::malformed(
                        path.display().to_string(),
                        format!("Failed to read file: {}", e),
                    )
                })?;
                Self::parse(&path.display().to_string(), &content)
            }
            None => Self::parse(BUILTIN_SOURCE, BUILTIN_SCHEMA),
        }
    }

    /// Parses a wire-form schema document and checks its integrity.
    pub fn parse(source: &str, content: &str) -> SchemaResult<FormSchema> {
        let wire: WireSchema = serde_json::from_str(content)
            .map_err(|e| SchemaError::malformed(source, format!("Invalid JSON: {}", e)))?;

        let fields = wire
            .fields
            .into_iter()
            .map(FieldDefinition::try_from)
            .collect::<SchemaResult<Vec<_>>>()?;

        let schema = FormSchema {
            name: wire.name,
            title: wire.title,
            description: wire.description,
            fields,
        };
        schema.check_integrity()?;

        Ok(schema)
    }

    /// Writes a schema to disk in wire form.
    pub fn save_schema(schema: &FormSchema, path: &Path) -> SchemaResult<()> {
        let content = serde_json::to_string_pretty(schema).map_err(|e| {
            SchemaError::malformed(
                path.display().to_string(),
                format!("Failed to serialize schema: {}", e),
            )
        })?;

        fs::write(path, content).map_err(|e| {
            SchemaError::malformed(
                path.display().to_string(),
                format!("Failed to write file: {}", e),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::errors::SchemaErrorCode;
    use crate::schema::types::FieldKind;
    use tempfile::TempDir;

    #[test]
    fn test_builtin_schema_loads() {
        let schema = SchemaLoader::builtin().load().unwrap();

        assert_eq!(schema.name, "employee-onboarding");
        let names: Vec<_> = schema.field_names().collect();
        assert_eq!(
            names,
            [
                "fullName",
                "email",
                "age",
                "department",
                "skills",
                "joiningDate",
                "remote",
                "about"
            ]
        );
        assert!(matches!(
            schema.field("skills").unwrap().kind,
            FieldKind::MultiSelect { .. }
        ));
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("form.json");

        let schema = SchemaLoader::builtin().load().unwrap();
        SchemaLoader::save_schema(&schema, &path).unwrap();

        let loaded = SchemaLoader::new(Some(path)).load().unwrap();
        assert_eq!(loaded, schema);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let loader = SchemaLoader::new(Some(temp_dir.path().join("nope.json")));

        let err = loader.load().unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::FormSchemaMalformed);
    }

    #[test]
    fn test_invalid_pattern_keeps_code_and_field() {
        let content = r#"{
            "name": "f",
            "title": "F",
            "fields": [
                { "name": "zip", "type": "text", "validations": { "pattern": "[0-9" } }
            ]
        }"#;

        let err = SchemaLoader::parse("inline", content).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::FormSchemaInvalidPattern);
        assert_eq!(err.field(), Some("zip"));
    }

    #[test]
    fn test_integrity_checked_on_load() {
        let content = r#"{
            "name": "f",
            "title": "F",
            "fields": [
                { "name": "dept", "type": "select" }
            ]
        }"#;

        let err = SchemaLoader::parse("inline", content).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::FormSchemaMissingOptions);
    }

    #[test]
    fn test_source_name() {
        assert_eq!(SchemaLoader::builtin().source_name(), "<builtin>");
        let loader = SchemaLoader::new(Some(PathBuf::from("/etc/form.json")));
        assert_eq!(loader.source_name(), "/etc/form.json");
    }
}
