use gridform_spec::GridFieldDefinition;

use crate::engine::{FormEngine, RegisterRequest, Registration};
use crate::keys::{CellKey, GroupKey};
use crate::options::{RegisterOptions, RequiredRule};

/// Register one line × column cell of `field` with the engine.
///
/// Every column of a line registers under the same [`GroupKey`], so the
/// engine treats them as one single-selection group. When the field is
/// required and `options` carries no required setting of its own, a required
/// rule is added for the group, making the line the unit of validation.
pub fn register_cell<E>(
    engine: &E,
    field: &GridFieldDefinition,
    line_id: &str,
    column_label: &str,
    options: Option<RegisterOptions>,
) -> Registration
where
    E: FormEngine + ?Sized,
{
    let group = GroupKey::new(&field.id, line_id);
    let cell = CellKey::new(&group, column_label);
    let mut options = options.unwrap_or_default();
    if field.required {
        options = options.or_required(RequiredRule::Flag(true));
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        group = group.as_str(),
        cell = cell.as_str(),
        required = options.is_required(),
        "registering grid cell"
    );

    engine.register(RegisterRequest {
        group,
        cell,
        value: column_label.to_string(),
        options,
    })
}
