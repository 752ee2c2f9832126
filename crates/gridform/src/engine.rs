//! Seam to the form-state engine that owns selections and validation results.
//!
//! The binder never stores selection state itself. It hands the engine a
//! [`RegisterRequest`] per rendered control and later reads values and errors
//! back by [`GroupKey`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::keys::{CellKey, GroupKey};
use crate::options::RegisterOptions;

/// Registration primitive and state readout of a form-state engine.
pub trait FormEngine {
    /// Register one control under `request.group`, returning the descriptor
    /// the caller attaches to the control.
    fn register(&self, request: RegisterRequest) -> Registration;

    /// Currently selected value of a group, if any.
    fn value(&self, group: &GroupKey) -> Option<String>;

    /// Validation error recorded for a group by the last validation pass.
    fn error(&self, group: &GroupKey) -> Option<LineError>;
}

/// Everything the engine needs to wire one selectable control.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisterRequest {
    pub group: GroupKey,
    pub cell: CellKey,
    /// Value recorded for the group when this control becomes the selection.
    pub value: String,
    pub options: RegisterOptions,
}

/// Kind of control a registration is meant for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    /// Single selection within its group.
    Radio,
}

/// Descriptor attached to a rendered control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registration {
    /// Group membership; identical for all columns of a line.
    pub name: GroupKey,
    /// Per-control address.
    pub id: CellKey,
    pub value: String,
    pub control: ControlKind,
    pub disabled: bool,
}

/// Kind of validation failure on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorType {
    /// A required line has no selection.
    Required,
}

impl ErrorType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
        }
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validation failure for one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineError {
    #[serde(rename = "type")]
    pub kind: ErrorType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LineError {
    pub fn required(message: Option<String>) -> Self {
        Self {
            kind: ErrorType::Required,
            message,
        }
    }
}

/// Errors from the last validation pass, keyed by group.
pub type ErrorReport = BTreeMap<GroupKey, LineError>;

/// Snapshot of every registered group's selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormValues(BTreeMap<GroupKey, Option<String>>);

impl FormValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: GroupKey, value: Option<String>) {
        self.0.insert(group, value);
    }

    /// Selected value of `group`; `None` when unselected or never registered.
    pub fn selection(&self, group: &GroupKey) -> Option<&str> {
        self.0.get(group).and_then(|value| value.as_deref())
    }

    pub fn contains(&self, group: &GroupKey) -> bool {
        self.0.contains_key(group)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, Option<&str>)> {
        self.0.iter().map(|(group, value)| (group, value.as_deref()))
    }
}

impl FromIterator<(GroupKey, Option<String>)> for FormValues {
    fn from_iter<I: IntoIterator<Item = (GroupKey, Option<String>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
