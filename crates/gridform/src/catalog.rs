use gridform_spec::{Catalog, Field, ValidationError};
use rustc_hash::FxHashMap;

/// Source of field definitions, looked up by id.
pub trait FieldCatalog {
    fn get(&self, id: &str) -> Option<&Field>;
}

impl FieldCatalog for Catalog {
    fn get(&self, id: &str) -> Option<&Field> {
        Catalog::get(self, id)
    }
}

/// Indexed in-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    fields: Vec<Field>,
    index: FxHashMap<String, usize>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a catalog document and index its fields.
    pub fn from_catalog(catalog: Catalog) -> Result<Self, ValidationError> {
        catalog.validate()?;
        Ok(Self::from_fields(catalog.fields))
    }

    /// Index fields without document-level validation; later ids replace earlier ones.
    pub fn from_fields(fields: impl IntoIterator<Item = Field>) -> Self {
        let mut catalog = Self::new();
        for field in fields {
            catalog.insert(field);
        }
        catalog
    }

    /// Insert a field, returning the definition it replaced.
    pub fn insert(&mut self, field: Field) -> Option<Field> {
        match self.index.get(field.id()) {
            Some(&idx) => Some(std::mem::replace(&mut self.fields[idx], field)),
            None => {
                self.index.insert(field.id().to_string(), self.fields.len());
                self.fields.push(field);
                None
            }
        }
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FieldCatalog for MemoryCatalog {
    fn get(&self, id: &str) -> Option<&Field> {
        self.index.get(id).map(|&idx| &self.fields[idx])
    }
}
