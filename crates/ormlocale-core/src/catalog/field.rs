//! Field definitions for record classes.

use super::types::FieldType;
use serde::{Deserialize, Serialize};

/// A database field declared on a record class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field (column) name.
    pub name: String,
    /// Declared column type.
    pub field_type: FieldType,
}

impl FieldDef {
    /// Create a new field definition.
    pub fn new(name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        Self {
            name: name.into(),
            field_type: field_type.into(),
        }
    }
}

/// An ordered name → type mapping of database fields.
///
/// Declaration order is preserved; inserting a name that is already present
/// replaces its type in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldSet {
    fields: Vec<FieldDef>,
}

impl FieldSet {
    /// Create an empty field set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field, replacing the type of an existing field with the same name.
    pub fn insert(&mut self, field: FieldDef) {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => existing.field_type = field.field_type,
            None => self.fields.push(field),
        }
    }

    /// Builder form of [`FieldSet::insert`].
    pub fn with(mut self, name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        self.insert(FieldDef::new(name, field_type));
        self
    }

    /// Get a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Check whether a field with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> Vec<String> {
        self.fields.iter().map(|f| f.name.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<FieldDef> for FieldSet {
    fn from_iter<I: IntoIterator<Item = FieldDef>>(iter: I) -> Self {
        let mut set = FieldSet::new();
        for field in iter {
            set.insert(field);
        }
        set
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for FieldSet {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        iter.into_iter()
            .map(|(name, ty)| FieldDef::new(name, ty))
            .collect()
    }
}

impl IntoIterator for FieldSet {
    type Item = FieldDef;
    type IntoIter = std::vec::IntoIter<FieldDef>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}
