//! Form Schema HTTP Routes
//!
//! Serves the active schema so a client can render the form, plus the
//! initial values for an empty form.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde_json::{Map, Value};

use crate::schema::FormSchema;

/// Create form schema routes
pub fn form_routes(schema: Arc<FormSchema>) -> Router {
    Router::new()
        .route("/form-schema", get(get_schema_handler))
        .route("/form-schema/defaults", get(get_defaults_handler))
        .with_state(schema)
}

/// Returns the schema in wire form
async fn get_schema_handler(State(schema): State<Arc<FormSchema>>) -> Json<FormSchema> {
    Json(schema.as_ref().clone())
}

async fn get_defaults_handler(State(schema): State<Arc<FormSchema>>) -> Json<Map<String, Value>> {
    Json(schema.default_values())
}
