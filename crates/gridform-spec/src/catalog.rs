use std::borrow::Cow;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use semver::Version;
use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::slug;
use crate::validation::{FieldIssue, ValidationError};

/// Current supported catalog specification version.
pub const CURRENT_SPEC_VERSION: &str = "0.2.0";
/// Constant identifier for this spec.
pub const SPEC_IDENT: &str = "gridform";

static FIELD_ID_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9]+([_-][A-Za-z0-9]+)*$").expect("field id regex must compile")
});

/// Canonical field catalog representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[schemars(
    title = "Gridform Field Catalog",
    description = "Ordered set of form field definitions, including multiple-choice grids, that a form binds against."
)]
#[serde(deny_unknown_fields)]
pub struct Catalog {
    /// Identifier for this specification (must be `gridform`).
    pub spec: String,
    #[serde(rename = "spec_version")]
    pub spec_version: SpecVersion,
    /// Field definitions in form order.
    pub fields: Vec<Field>,
}

impl Catalog {
    /// Build a catalog at the current spec version from a list of fields.
    pub fn new(fields: Vec<Field>) -> Self {
        Self {
            spec: SPEC_IDENT.to_string(),
            spec_version: SpecVersion::current(),
            fields,
        }
    }

    /// Construct a catalog by reading YAML from any reader.
    pub fn from_yaml_reader<R: std::io::Read>(reader: R) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_reader(reader)
    }

    /// Construct a catalog from a YAML string slice.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Construct a catalog from a JSON string slice.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize this catalog to YAML.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }

    /// Look up a field by id.
    pub fn get(&self, id: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.id() == id)
    }

    /// Validate the catalog and return granular issues when invariants fail.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut issues = Vec::new();

        if self.spec != SPEC_IDENT {
            issues.push(FieldIssue::new(
                "spec",
                format!(
                    "expected spec identifier `{}`, found `{}`",
                    SPEC_IDENT, self.spec
                ),
            ));
        }

        let current = SpecVersion::current();
        if self.spec_version.0.major != current.0.major {
            issues.push(FieldIssue::new(
                "spec_version",
                format!(
                    "incompatible major version `{}` (expected `{}`)",
                    self.spec_version.0, current.0.major
                ),
            ));
        }

        let mut seen_ids = HashSet::new();
        for (idx, field) in self.fields.iter().enumerate() {
            let path = format!("fields[{idx}]");
            if !FIELD_ID_PATTERN.is_match(field.id()) {
                issues.push(FieldIssue::new(
                    format!("{path}.id"),
                    "field id must contain alphanumeric characters optionally separated by '-' or '_'",
                ));
            }
            if !seen_ids.insert(field.id()) {
                issues.push(FieldIssue::new(
                    format!("{path}.id"),
                    format!("duplicate field id `{}`", field.id()),
                ));
            }
            if field.label().trim().is_empty() {
                issues.push(FieldIssue::new(
                    format!("{path}.label"),
                    "field label must not be blank",
                ));
            }

            match field {
                Field::MultipleChoiceGrid(grid) | Field::CheckboxGrid(grid) => {
                    validate_grid(&path, grid, &mut issues)
                }
                Field::MultipleChoice(choice)
                | Field::Checkboxes(choice)
                | Field::Dropdown(choice) => {
                    if choice.options.is_empty() {
                        issues.push(FieldIssue::new(
                            format!("{path}.options"),
                            "choice field must define at least one option",
                        ));
                    }
                }
                Field::ShortAnswer(_) | Field::Paragraph(_) => {}
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(issues))
        }
    }

    /// Report distinct raw line ids or column labels that derive to the same key.
    ///
    /// Collisions are advisory only; they never fail [`Catalog::validate`].
    pub fn key_collisions(&self) -> Vec<KeyCollision> {
        let mut collisions = Vec::new();
        for field in &self.fields {
            let (Field::MultipleChoiceGrid(grid) | Field::CheckboxGrid(grid)) = field else {
                continue;
            };
            collect_collisions(
                &grid.id,
                KeyScope::Line,
                grid.lines.iter().map(|line| line.id.as_str()),
                &mut collisions,
            );
            collect_collisions(
                &grid.id,
                KeyScope::Column,
                grid.columns.iter().map(|column| column.label.as_str()),
                &mut collisions,
            );
        }
        collisions
    }
}

fn validate_grid(path: &str, grid: &GridFieldDefinition, issues: &mut Vec<FieldIssue>) {
    if grid.lines.is_empty() {
        issues.push(FieldIssue::new(
            format!("{path}.lines"),
            "grid must define at least one line",
        ));
    }
    if grid.columns.is_empty() {
        issues.push(FieldIssue::new(
            format!("{path}.columns"),
            "grid must define at least one column",
        ));
    }

    let mut line_ids = HashSet::new();
    for (idx, line) in grid.lines.iter().enumerate() {
        if line.id.trim().is_empty() {
            issues.push(FieldIssue::new(
                format!("{path}.lines[{idx}].id"),
                "line id must not be blank",
            ));
        }
        if !line_ids.insert(line.id.as_str()) {
            issues.push(FieldIssue::new(
                format!("{path}.lines[{idx}].id"),
                format!("duplicate line id `{}`", line.id),
            ));
        }
    }

    let mut labels = HashSet::new();
    for (idx, column) in grid.columns.iter().enumerate() {
        if column.label.trim().is_empty() {
            issues.push(FieldIssue::new(
                format!("{path}.columns[{idx}].label"),
                "column label must not be blank",
            ));
        }
        if !labels.insert(column.label.as_str()) {
            issues.push(FieldIssue::new(
                format!("{path}.columns[{idx}].label"),
                format!("duplicate column label `{}`", column.label),
            ));
        }
    }
}

fn collect_collisions<'a>(
    field: &str,
    scope: KeyScope,
    raws: impl Iterator<Item = &'a str>,
    out: &mut Vec<KeyCollision>,
) {
    let mut first_by_key: BTreeMap<String, &str> = BTreeMap::new();
    for raw in raws {
        let derived = slug::derive(raw);
        match first_by_key.get(&derived) {
            Some(first) if *first != raw => out.push(KeyCollision {
                field: field.to_string(),
                scope,
                first: first.to_string(),
                second: raw.to_string(),
                derived,
            }),
            Some(_) => {}
            None => {
                first_by_key.insert(derived, raw);
            }
        }
    }
}

/// Which part of a grid a derived-key collision was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyScope {
    Line,
    Column,
}

/// Two distinct raw values in one grid whose derived fragments coincide.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyCollision {
    pub field: String,
    pub scope: KeyScope,
    pub first: String,
    pub second: String,
    pub derived: String,
}

impl fmt::Display for KeyCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scope = match self.scope {
            KeyScope::Line => "line ids",
            KeyScope::Column => "column labels",
        };
        write!(
            f,
            "field `{}`: {} `{}` and `{}` both derive to `{}`",
            self.field, scope, self.first, self.second, self.derived
        )
    }
}

/// Field kind discriminator, matching the serialized `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    MultipleChoiceGrid,
    CheckboxGrid,
    ShortAnswer,
    Paragraph,
    MultipleChoice,
    Checkboxes,
    Dropdown,
}

impl FieldKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MultipleChoiceGrid => "MULTIPLE_CHOICE_GRID",
            Self::CheckboxGrid => "CHECKBOX_GRID",
            Self::ShortAnswer => "SHORT_ANSWER",
            Self::Paragraph => "PARAGRAPH",
            Self::MultipleChoice => "MULTIPLE_CHOICE",
            Self::Checkboxes => "CHECKBOXES",
            Self::Dropdown => "DROPDOWN",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Form field definition, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Field {
    /// Matrix of lines × columns, one selection per line.
    MultipleChoiceGrid(GridFieldDefinition),
    /// Matrix of lines × columns, any number of selections per line.
    CheckboxGrid(GridFieldDefinition),
    ShortAnswer(TextField),
    Paragraph(TextField),
    MultipleChoice(ChoiceField),
    Checkboxes(ChoiceField),
    Dropdown(ChoiceField),
}

impl Field {
    pub fn id(&self) -> &str {
        match self {
            Self::MultipleChoiceGrid(grid) | Self::CheckboxGrid(grid) => &grid.id,
            Self::ShortAnswer(text) | Self::Paragraph(text) => &text.id,
            Self::MultipleChoice(choice) | Self::Checkboxes(choice) | Self::Dropdown(choice) => {
                &choice.id
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::MultipleChoiceGrid(grid) | Self::CheckboxGrid(grid) => &grid.label,
            Self::ShortAnswer(text) | Self::Paragraph(text) => &text.label,
            Self::MultipleChoice(choice) | Self::Checkboxes(choice) | Self::Dropdown(choice) => {
                &choice.label
            }
        }
    }

    pub fn required(&self) -> bool {
        match self {
            Self::MultipleChoiceGrid(grid) | Self::CheckboxGrid(grid) => grid.required,
            Self::ShortAnswer(text) | Self::Paragraph(text) => text.required,
            Self::MultipleChoice(choice) | Self::Checkboxes(choice) | Self::Dropdown(choice) => {
                choice.required
            }
        }
    }

    pub fn kind(&self) -> FieldKind {
        match self {
            Self::MultipleChoiceGrid(_) => FieldKind::MultipleChoiceGrid,
            Self::CheckboxGrid(_) => FieldKind::CheckboxGrid,
            Self::ShortAnswer(_) => FieldKind::ShortAnswer,
            Self::Paragraph(_) => FieldKind::Paragraph,
            Self::MultipleChoice(_) => FieldKind::MultipleChoice,
            Self::Checkboxes(_) => FieldKind::Checkboxes,
            Self::Dropdown(_) => FieldKind::Dropdown,
        }
    }

    /// The grid definition when this is a single-selection grid.
    pub fn as_multiple_choice_grid(&self) -> Option<&GridFieldDefinition> {
        match self {
            Self::MultipleChoiceGrid(grid) => Some(grid),
            _ => None,
        }
    }
}

/// Static definition of a grid question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct GridFieldDefinition {
    /// Stable identifier, unique within the catalog.
    pub id: String,
    /// Question text.
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    /// Whether every line needs a selection before submit.
    pub required: bool,
    /// Rows in rendering order.
    pub lines: Vec<Line>,
    /// Selectable options in rendering order, shared by every line.
    pub columns: Vec<Column>,
}

/// One row of a grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Line {
    /// Identifier, unique within the grid; keys the submitted answer.
    pub id: String,
    pub label: String,
}

/// One selectable option; the label is also the stored value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Column {
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TextField {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ChoiceField {
    pub id: String,
    pub label: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    /// Option labels in rendering order.
    pub options: Vec<String>,
}

/// Wrapper around semver::Version for serde compatibility.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SpecVersion(pub Version);

impl SpecVersion {
    pub fn new(version: Version) -> Self {
        Self(version)
    }

    pub fn current() -> Self {
        Self(Version::new(0, 2, 0))
    }
}

impl Serialize for SpecVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for SpecVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct VersionVisitor;

        impl<'de> Visitor<'de> for VersionVisitor {
            type Value = SpecVersion;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("semantic version string (e.g. 0.2.0)")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Version::parse(v)
                    .map(SpecVersion)
                    .map_err(|err| de::Error::custom(format!("invalid spec_version: {err}")))
            }
        }

        deserializer.deserialize_str(VersionVisitor)
    }
}

impl JsonSchema for SpecVersion {
    fn schema_name() -> Cow<'static, str> {
        "SpecVersion".into()
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": r"^[0-9]+\.[0-9]+\.[0-9]+(?:-[0-9A-Za-z-.]+)?(?:\+[0-9A-Za-z-.]+)?$"
        })
    }
}

impl std::str::FromStr for Catalog {
    type Err = serde_yaml::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Catalog::from_yaml_str(s)
    }
}
