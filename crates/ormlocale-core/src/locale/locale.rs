//! Locale entities.

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::schema::LOCALE_CODE_MAX_LEN;

/// A language/region identifier with an optional fallback parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Locale {
    /// Locale code, e.g. `en_NZ`.
    pub code: String,
    /// Code of the locale to fall back to.
    pub parent: Option<String>,
}

impl Locale {
    /// Create a locale without a parent.
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            parent: None,
        }
    }

    /// Set the fallback parent.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Check the code fits the shadow table's `Locale` column.
    pub fn validate_code(code: &str) -> Result<(), Error> {
        if code.is_empty() || code.chars().count() > LOCALE_CODE_MAX_LEN {
            return Err(Error::InvalidLocaleCode(code.to_string()));
        }
        Ok(())
    }
}
