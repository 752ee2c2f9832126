use std::borrow::Borrow;
use std::fmt;

use gridform_spec::slug;
use serde::Serialize;

/// Registration name shared by every column of one line.
///
/// Built from the field id and line id only; column identity never takes part,
/// which is what makes the columns of a line mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct GroupKey(String);

impl GroupKey {
    pub fn new(field_id: &str, line_id: &str) -> Self {
        Self(slug::compose([field_id, line_id]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier addressing one rendered control (a single line × column cell).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CellKey(String);

impl CellKey {
    pub fn new(group: &GroupKey, column_label: &str) -> Self {
        Self(slug::extend(group.as_str(), column_label))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_key_traits {
    ($key:ty) => {
        impl fmt::Display for $key {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $key {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $key {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_key_traits!(GroupKey);
impl_key_traits!(CellKey);
