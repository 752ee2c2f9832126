use gridform_spec::FieldKind;
use thiserror::Error;

use crate::engine::ErrorReport;

/// Configuration errors raised while binding a grid field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("field `{id}` not found in catalog")]
    FieldNotFound { id: String },

    #[error("field `{id}` is a {found} field, expected {expected}")]
    FieldTypeMismatch {
        id: String,
        expected: FieldKind,
        found: FieldKind,
    },
}

/// Errors raised by the in-memory form engine on user interaction.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EngineError {
    #[error("no registered control with id `{id}`")]
    UnknownControl { id: String },

    #[error("no registered group named `{group}`")]
    UnknownGroup { group: String },

    #[error("control `{id}` is disabled")]
    DisabledControl { id: String },
}

/// Submission outcome when validation fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("submission blocked: {} group(s) failed validation", .0.len())]
    Invalid(ErrorReport),
}

impl SubmitError {
    pub fn report(&self) -> &ErrorReport {
        match self {
            Self::Invalid(report) => report,
        }
    }
}
