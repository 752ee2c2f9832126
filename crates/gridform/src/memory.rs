//! In-memory form-state engine.
//!
//! Single-threaded: state sits behind a `RefCell` and every operation runs to
//! completion before the next. Mirrors the behaviour a UI form engine gives a
//! radio group: one value per group, replaced on each selection, validated on
//! submit (and optionally on change).

use std::cell::RefCell;
use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::engine::{
    ControlKind, ErrorReport, FormEngine, FormValues, LineError, RegisterRequest, Registration,
};
use crate::error::{EngineError, SubmitError};
use crate::keys::{CellKey, GroupKey};
use crate::options::RegisterOptions;

/// When a group is validated outside of submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Only on submit.
    #[default]
    OnSubmit,
    /// On every selection change of the group.
    OnChange,
}

/// Engine behaviour switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    /// Validation trigger before the first submit.
    pub mode: ValidationMode,
    /// Validation trigger after the first submit.
    pub revalidate_mode: ValidationMode,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            mode: ValidationMode::OnSubmit,
            revalidate_mode: ValidationMode::OnChange,
        }
    }
}

#[derive(Debug, Clone)]
struct GroupState {
    value: Option<String>,
    options: RegisterOptions,
}

impl GroupState {
    fn validate(&self) -> Option<LineError> {
        if self.options.disabled || self.value.is_some() {
            return None;
        }
        match &self.options.required {
            Some(rule) if rule.is_enabled() => {
                Some(LineError::required(rule.message().map(str::to_string)))
            }
            _ => None,
        }
    }

    fn submitted_value(&self) -> Option<String> {
        if self.options.disabled {
            None
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone)]
struct ControlEntry {
    group: GroupKey,
    value: String,
}

#[derive(Debug, Default)]
struct FormState {
    groups: BTreeMap<GroupKey, GroupState>,
    controls: FxHashMap<CellKey, ControlEntry>,
    errors: ErrorReport,
    submit_count: u32,
}

/// Form-state engine keeping selections and errors in memory.
#[derive(Debug, Default)]
pub struct MemoryFormEngine {
    config: FormConfig,
    state: RefCell<FormState>,
}

impl MemoryFormEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FormConfig) -> Self {
        Self {
            config,
            state: RefCell::default(),
        }
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    /// Activate the control registered as `cell_id`, replacing any earlier
    /// selection in its group.
    pub fn select(&self, cell_id: &str) -> Result<(), EngineError> {
        let mut state = self.state.borrow_mut();
        let control = state
            .controls
            .get(cell_id)
            .cloned()
            .ok_or_else(|| EngineError::UnknownControl {
                id: cell_id.to_string(),
            })?;
        let revalidate = self.validates_on_change(state.submit_count);
        let group = state
            .groups
            .get_mut(&control.group)
            .ok_or_else(|| EngineError::UnknownGroup {
                group: control.group.to_string(),
            })?;
        if group.options.disabled {
            return Err(EngineError::DisabledControl {
                id: cell_id.to_string(),
            });
        }

        #[cfg(feature = "tracing")]
        tracing::trace!(
            group = control.group.as_str(),
            previous = group.value.as_deref(),
            value = control.value.as_str(),
            "selection changed"
        );

        group.value = Some(control.value);
        if revalidate {
            let outcome = group.validate();
            apply_validation(&mut state.errors, control.group, outcome);
        }
        Ok(())
    }

    /// Remove the selection of `group`.
    pub fn clear(&self, group: &GroupKey) -> Result<(), EngineError> {
        let mut state = self.state.borrow_mut();
        let revalidate = self.validates_on_change(state.submit_count);
        let entry = state
            .groups
            .get_mut(group)
            .ok_or_else(|| EngineError::UnknownGroup {
                group: group.to_string(),
            })?;
        entry.value = None;
        if revalidate {
            let outcome = entry.validate();
            apply_validation(&mut state.errors, group.clone(), outcome);
        }
        Ok(())
    }

    /// Whether the control registered as `cell_id` is the current selection of its group.
    pub fn is_selected(&self, cell_id: &str) -> bool {
        let state = self.state.borrow();
        state.controls.get(cell_id).is_some_and(|control| {
            state
                .groups
                .get(&control.group)
                .and_then(|group| group.value.as_deref())
                == Some(control.value.as_str())
        })
    }

    /// Current values of every registered group.
    pub fn values(&self) -> FormValues {
        self.state
            .borrow()
            .groups
            .iter()
            .map(|(key, group)| (key.clone(), group.submitted_value()))
            .collect()
    }

    /// Errors from the latest validation pass.
    pub fn errors(&self) -> ErrorReport {
        self.state.borrow().errors.clone()
    }

    pub fn submit_count(&self) -> u32 {
        self.state.borrow().submit_count
    }

    /// Validate every group and hand back the values when all pass.
    pub fn submit(&self) -> Result<FormValues, SubmitError> {
        let report: ErrorReport = {
            let mut state = self.state.borrow_mut();
            let report: ErrorReport = state
                .groups
                .iter()
                .filter_map(|(key, group)| group.validate().map(|error| (key.clone(), error)))
                .collect();
            state.errors = report.clone();
            state.submit_count = state.submit_count.saturating_add(1);
            report
        };

        #[cfg(feature = "tracing")]
        tracing::debug!(
            groups = self.state.borrow().groups.len(),
            invalid = report.len(),
            "form submitted"
        );

        if report.is_empty() {
            Ok(self.values())
        } else {
            Err(SubmitError::Invalid(report))
        }
    }

    /// Drop every selection and error, keeping registrations.
    pub fn reset(&self) {
        let mut state = self.state.borrow_mut();
        for group in state.groups.values_mut() {
            group.value = None;
        }
        state.errors.clear();
        state.submit_count = 0;
    }

    fn validates_on_change(&self, submit_count: u32) -> bool {
        let mode = if submit_count == 0 {
            self.config.mode
        } else {
            self.config.revalidate_mode
        };
        mode == ValidationMode::OnChange
    }
}

fn apply_validation(errors: &mut ErrorReport, group: GroupKey, outcome: Option<LineError>) {
    match outcome {
        Some(error) => {
            errors.insert(group, error);
        }
        None => {
            errors.remove(&group);
        }
    }
}

impl FormEngine for MemoryFormEngine {
    fn register(&self, request: RegisterRequest) -> Registration {
        let RegisterRequest {
            group,
            cell,
            value,
            options,
        } = request;
        let disabled = options.disabled;

        let mut state = self.state.borrow_mut();
        state
            .groups
            .entry(group.clone())
            .and_modify(|existing| existing.options = options.clone())
            .or_insert_with(|| GroupState {
                value: None,
                options,
            });
        state.controls.insert(
            cell.clone(),
            ControlEntry {
                group: group.clone(),
                value: value.clone(),
            },
        );

        Registration {
            name: group,
            id: cell,
            value,
            control: ControlKind::Radio,
            disabled,
        }
    }

    fn value(&self, group: &GroupKey) -> Option<String> {
        self.state
            .borrow()
            .groups
            .get(group)
            .and_then(GroupState::submitted_value)
    }

    fn error(&self, group: &GroupKey) -> Option<LineError> {
        self.state.borrow().errors.get(group).cloned()
    }
}
