//! Gridform runtime bindings.
//!
//! This crate binds [`gridform_spec::GridFieldDefinition`]s to a form-state
//! engine. Each line of a grid becomes one single-selection group, every cell
//! gets a stable address, `required` is enforced per line, and submitted
//! values flatten into one answer per line. Rendering stays with the caller:
//! the binder only offers lazy traversals over lines and columns.

mod catalog;
mod engine;
mod error;
mod grid;
mod keys;
mod line;
mod memory;
mod options;
mod registrar;

pub use catalog::{FieldCatalog, MemoryCatalog};
pub use engine::{
    ControlKind, ErrorReport, ErrorType, FormEngine, FormValues, LineError, RegisterRequest,
    Registration,
};
pub use error::{BindError, EngineError, SubmitError};
pub use grid::{ErrorMap, GridAnswers, GridBinder, GridBinding, LineMap, bind_grid};
pub use keys::{CellKey, GroupKey};
pub use line::{ColumnBinding, LineBinding};
pub use memory::{FormConfig, MemoryFormEngine, ValidationMode};
pub use options::{RegisterOptions, RequiredRule};
pub use registrar::register_cell;

pub use gridform_spec::slug::derive as derive_key;
pub use gridform_spec::{Catalog, Column, Field, FieldKind, GridFieldDefinition, Line};
