use schemars::schema_for;
use serde_json::Value as JsonValue;

use crate::catalog::Catalog;

/// JSON schema describing a catalog document, generated from the Rust types.
pub fn generate_schema_value() -> Result<JsonValue, serde_json::Error> {
    serde_json::to_value(schema_for!(Catalog))
}

/// Pretty-printed form of [`generate_schema_value`].
pub fn generate_schema_json_pretty() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&generate_schema_value()?)
}
