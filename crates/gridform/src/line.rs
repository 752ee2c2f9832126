use gridform_spec::{Column, GridFieldDefinition, Line};

use crate::engine::{FormEngine, LineError, Registration};
use crate::keys::{CellKey, GroupKey};
use crate::options::RegisterOptions;
use crate::registrar::register_cell;

/// One line of a bound grid.
pub struct LineBinding<'a, E: ?Sized> {
    engine: &'a E,
    field: &'a GridFieldDefinition,
    line: &'a Line,
    group: GroupKey,
}

impl<'a, E> LineBinding<'a, E>
where
    E: FormEngine + ?Sized,
{
    pub(crate) fn new(engine: &'a E, field: &'a GridFieldDefinition, line: &'a Line) -> Self {
        Self {
            engine,
            field,
            line,
            group: GroupKey::new(&field.id, &line.id),
        }
    }

    pub fn id(&self) -> &'a str {
        &self.line.id
    }

    pub fn label(&self) -> &'a str {
        &self.line.label
    }

    pub fn line(&self) -> &'a Line {
        self.line
    }

    /// Registration name shared by all columns of this line.
    pub fn group_key(&self) -> &GroupKey {
        &self.group
    }

    /// Column label currently selected on this line, if any.
    pub fn selection(&self) -> Option<String> {
        self.engine.value(&self.group)
    }

    /// Error reported by the engine's last validation pass for this line.
    pub fn error(&self) -> Option<LineError> {
        self.engine.error(&self.group)
    }

    /// Visit the field's columns in declared order, each bound to this line.
    ///
    /// The returned iterator is lazy and rebuilt on every call.
    pub fn traverse_columns<T, F>(&self, mut visit: F) -> impl Iterator<Item = T> + use<'a, E, T, F>
    where
        F: FnMut(ColumnBinding<'a, E>) -> T,
    {
        let engine = self.engine;
        let field = self.field;
        let line = self.line;
        field
            .columns
            .iter()
            .map(move |column| visit(ColumnBinding::new(engine, field, line, column)))
    }
}

/// One cell of a bound grid, ready to be attached to a selectable control.
pub struct ColumnBinding<'a, E: ?Sized> {
    engine: &'a E,
    field: &'a GridFieldDefinition,
    line: &'a Line,
    column: &'a Column,
    id: CellKey,
}

impl<'a, E> ColumnBinding<'a, E>
where
    E: FormEngine + ?Sized,
{
    fn new(
        engine: &'a E,
        field: &'a GridFieldDefinition,
        line: &'a Line,
        column: &'a Column,
    ) -> Self {
        let group = GroupKey::new(&field.id, &line.id);
        Self {
            engine,
            field,
            line,
            column,
            id: CellKey::new(&group, &column.label),
        }
    }

    /// Per-cell address of the control, unique within the field.
    pub fn id(&self) -> &CellKey {
        &self.id
    }

    pub fn label(&self) -> &'a str {
        &self.column.label
    }

    pub fn line_id(&self) -> &'a str {
        &self.line.id
    }

    /// Register this cell with the engine and return the control descriptor.
    pub fn register_column(&self, options: Option<RegisterOptions>) -> Registration {
        register_cell(
            self.engine,
            self.field,
            &self.line.id,
            &self.column.label,
            options,
        )
    }
}
