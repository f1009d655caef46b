//! Declared column types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A column type as the host ORM declares it, e.g. `Varchar(255)` or `Int`.
///
/// Types are kept as their declared text; the localization rules only need
/// the raw name and its base name with parameters stripped.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldType(String);

impl FieldType {
    /// Create a field type from its declared text.
    pub fn new(declared: impl Into<String>) -> Self {
        Self(declared.into())
    }

    /// The declared text, parameters included.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type name with any parenthesized parameters removed.
    pub fn base(&self) -> &str {
        base_type(&self.0)
    }

    /// Check whether values of this type are strings, so that an empty
    /// string counts as "no value".
    pub fn is_text(&self) -> bool {
        let base = self.base();
        base.ends_with("Varchar")
            || base.ends_with("Text")
            || base.ends_with("Char")
            || base.ends_with("Enum")
    }
}

/// Strip everything from the first `(` onward.
///
/// `base_type("Varchar(255)") == "Varchar"`, `base_type("Int") == "Int"`.
pub fn base_type(declared: &str) -> &str {
    match declared.find('(') {
        Some(idx) => &declared[..idx],
        None => declared,
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldType {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FieldType {
    fn from(value: String) -> Self {
        Self(value)
    }
}
