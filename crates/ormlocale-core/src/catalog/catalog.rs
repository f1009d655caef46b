//! In-memory class catalog.

use std::collections::{HashMap, HashSet};

use super::class::ClassDef;
use super::field::FieldSet;
use super::source::SchemaSource;

/// An in-memory [`SchemaSource`] built from [`ClassDef`]s.
///
/// Hosts with their own metadata layer implement [`SchemaSource`] directly;
/// this catalog serves embedded use and tests.
#[derive(Debug, Clone, Default)]
pub struct ClassCatalog {
    classes: HashMap<String, ClassDef>,
}

impl ClassCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a class, replacing any class with the same name.
    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.insert(class);
        self
    }

    /// Add a class, replacing any class with the same name.
    pub fn insert(&mut self, class: ClassDef) {
        self.classes.insert(class.name.clone(), class);
    }

    /// Get a class by name.
    pub fn get(&self, name: &str) -> Option<&ClassDef> {
        self.classes.get(name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl SchemaSource for ClassCatalog {
    fn database_fields_of(&self, class: &str, include_inherited: bool) -> FieldSet {
        if !include_inherited {
            return self
                .classes
                .get(class)
                .map(|c| c.fields.clone())
                .unwrap_or_default();
        }

        let mut fields = FieldSet::new();
        for name in self.ancestry_of(class) {
            if let Some(def) = self.classes.get(&name) {
                for field in def.fields.iter() {
                    fields.insert(field.clone());
                }
            }
        }
        fields
    }

    fn table_name_of(&self, class: &str) -> Option<String> {
        self.classes.get(class).and_then(|c| c.table.clone())
    }

    fn ancestry_of(&self, class: &str) -> Vec<String> {
        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut current = self.classes.get(class);

        while let Some(def) = current {
            if !seen.insert(def.name.as_str()) {
                break;
            }
            chain.push(def.name.clone());
            current = def.parent.as_deref().and_then(|p| self.classes.get(p));
        }

        chain.reverse();
        chain
    }

    fn class_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.classes.keys().cloned().collect();
        names.sort();
        names
    }
}
