use gridform_spec::{Column, FieldKind, GridFieldDefinition, Line};
use indexmap::IndexMap;
use serde::Serialize;

use crate::catalog::FieldCatalog;
use crate::engine::{FormEngine, FormValues, LineError};
use crate::error::BindError;
use crate::keys::GroupKey;
use crate::line::LineBinding;

/// Binds grid fields from a catalog against a form engine.
pub struct GridBinder<'a, C: ?Sized, E: ?Sized> {
    catalog: &'a C,
    engine: &'a E,
}

impl<'a, C, E> GridBinder<'a, C, E>
where
    C: FieldCatalog + ?Sized,
    E: FormEngine + ?Sized,
{
    pub fn new(catalog: &'a C, engine: &'a E) -> Self {
        Self { catalog, engine }
    }

    /// Resolve `field_id` and bind it. See [`bind_grid`].
    pub fn bind(&self, field_id: &str) -> Result<GridBinding<'a, E>, BindError> {
        bind_grid(self.catalog, self.engine, field_id)
    }
}

/// Resolve a multiple-choice grid field and bind it to `engine`.
///
/// Unknown ids and fields of another kind are configuration errors; the
/// caller is expected to pass the id of an existing grid field.
pub fn bind_grid<'a, C, E>(
    catalog: &'a C,
    engine: &'a E,
    field_id: &str,
) -> Result<GridBinding<'a, E>, BindError>
where
    C: FieldCatalog + ?Sized,
    E: FormEngine + ?Sized,
{
    let field = catalog.get(field_id).ok_or_else(|| BindError::FieldNotFound {
        id: field_id.to_string(),
    })?;
    let grid = field
        .as_multiple_choice_grid()
        .ok_or_else(|| BindError::FieldTypeMismatch {
            id: field_id.to_string(),
            expected: FieldKind::MultipleChoiceGrid,
            found: field.kind(),
        })?;

    #[cfg(feature = "tracing")]
    tracing::debug!(
        field = field_id,
        lines = grid.lines.len(),
        columns = grid.columns.len(),
        required = grid.required,
        "bound grid field"
    );

    Ok(GridBinding {
        engine,
        field: grid,
    })
}

/// A grid field bound to a form engine.
///
/// Holds no state of its own: traversals are rebuilt from the definition on
/// each call, and errors are read from the engine when asked for.
pub struct GridBinding<'a, E: ?Sized> {
    engine: &'a E,
    field: &'a GridFieldDefinition,
}

impl<'a, E> GridBinding<'a, E>
where
    E: FormEngine + ?Sized,
{
    pub fn field(&self) -> &'a GridFieldDefinition {
        self.field
    }

    pub fn id(&self) -> &'a str {
        &self.field.id
    }

    pub fn label(&self) -> &'a str {
        &self.field.label
    }

    pub fn required(&self) -> bool {
        self.field.required
    }

    /// Column headers in declared order.
    pub fn columns(&self) -> &'a [Column] {
        &self.field.columns
    }

    pub fn lines(&self) -> &'a [Line] {
        &self.field.lines
    }

    /// Registration name for one of this field's lines.
    pub fn group_key(&self, line_id: &str) -> GroupKey {
        GroupKey::new(&self.field.id, line_id)
    }

    /// Visit the lines in declared order, each wrapped in a [`LineBinding`].
    ///
    /// The returned iterator is lazy and rebuilt on every call. A line only
    /// exists for the engine once one of its columns is registered, so every
    /// line must be traversed (and its columns registered) for `required`
    /// validation to cover it.
    pub fn traverse_lines<T, F>(&self, mut visit: F) -> impl Iterator<Item = T> + use<'a, E, T, F>
    where
        F: FnMut(LineBinding<'a, E>) -> T,
    {
        let engine = self.engine;
        let field = self.field;
        field
            .lines
            .iter()
            .map(move |line| visit(LineBinding::new(engine, field, line)))
    }

    /// Per-line errors keyed by line id, or `None` when every line is valid.
    pub fn errors(&self) -> Option<ErrorMap> {
        let errors: IndexMap<_, _> = self
            .field
            .lines
            .iter()
            .filter_map(|line| {
                self.engine
                    .error(&self.group_key(&line.id))
                    .map(|error| (line.id.clone(), error))
            })
            .collect();
        if errors.is_empty() {
            None
        } else {
            Some(LineMap(errors))
        }
    }

    /// Flatten submitted values into one entry per declared line.
    pub fn answers(&self, values: &FormValues) -> GridAnswers {
        LineMap(
            self.field
                .lines
                .iter()
                .map(|line| {
                    let selection = values.selection(&self.group_key(&line.id));
                    (line.id.clone(), selection.map(str::to_string))
                })
                .collect(),
        )
    }
}

/// Values keyed by line id, kept in declared line order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LineMap<V>(IndexMap<String, V>);

/// Errors keyed by line id.
pub type ErrorMap = LineMap<LineError>;

/// Submitted selection (or `None`) keyed by line id.
pub type GridAnswers = LineMap<Option<String>>;

impl<V> LineMap<V> {
    pub fn get(&self, line_id: &str) -> Option<&V> {
        self.0.get(line_id)
    }

    pub fn contains(&self, line_id: &str) -> bool {
        self.0.contains_key(line_id)
    }

    pub fn line_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(id, value)| (id.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> IndexMap<String, V> {
        self.0
    }
}

impl GridAnswers {
    /// Selected label for `line_id`; `None` when unselected or undeclared.
    pub fn selection(&self, line_id: &str) -> Option<&str> {
        self.get(line_id).and_then(|value| value.as_deref())
    }
}
