//! Gridform field catalog specification.
//!
//! Declares the document model for form fields (with multiple-choice grids as
//! the first-class citizen), validation of catalog invariants, the key
//! derivation used to name registrations, and JSON schema generation.

pub mod catalog;
pub mod schema;
pub mod slug;
pub mod validation;

pub use catalog::{
    CURRENT_SPEC_VERSION, Catalog, ChoiceField, Column, Field, FieldKind, GridFieldDefinition,
    KeyCollision, KeyScope, Line, SPEC_IDENT, SpecVersion, TextField,
};
pub use schema::{generate_schema_json_pretty, generate_schema_value};
pub use validation::{FieldIssue, ValidationError};
