//! Record class definitions.

use super::field::{FieldDef, FieldSet};
use super::types::FieldType;
use serde::{Deserialize, Serialize};

/// A record class known to the host ORM.
///
/// A class either owns a physical table (named after the class unless
/// overridden) or has no table of its own, e.g. an abstract base class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDef {
    /// Class name (unique within the catalog).
    pub name: String,
    /// Direct parent class, if any.
    pub parent: Option<String>,
    /// Physical table backing this class.
    pub table: Option<String>,
    /// Database fields declared on this class itself.
    pub fields: FieldSet,
}

impl ClassDef {
    /// Create a class with a table of the same name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            table: Some(name.clone()),
            name,
            parent: None,
            fields: FieldSet::new(),
        }
    }

    /// Create a class that has no physical table.
    pub fn without_table(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parent: None,
            table: None,
            fields: FieldSet::new(),
        }
    }

    /// Set the parent class.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Override the table name.
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    /// Declare a field on this class.
    pub fn with_field(mut self, name: impl Into<String>, field_type: impl Into<FieldType>) -> Self {
        self.fields.insert(FieldDef::new(name, field_type));
        self
    }

    /// Check if this class owns a physical table.
    pub fn has_table(&self) -> bool {
        self.table.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_builder() {
        let page = ClassDef::new("Page")
            .with_parent("SiteTree")
            .with_field("Title", "Varchar(255)")
            .with_field("Content", "HTMLText");

        assert_eq!(page.table.as_deref(), Some("Page"));
        assert_eq!(page.parent.as_deref(), Some("SiteTree"));
        assert_eq!(page.fields.len(), 2);
        assert!(page.has_table());
    }

    #[test]
    fn test_tableless_class() {
        let base = ClassDef::without_table("DataObject");
        assert!(!base.has_table());
        assert!(base.fields.is_empty());
    }
}
