//! Request-scoped locale state.

use parking_lot::RwLock;

/// Ambient locale of the request being served.
pub trait RequestState {
    /// Locale code selected for the current request, if any.
    fn current_locale_code(&self) -> Option<String>;
}

/// A settable holder for the current request's locale code.
#[derive(Debug, Default)]
pub struct RequestLocale {
    code: RwLock<Option<String>>,
}

impl RequestLocale {
    /// Create a holder with no locale selected.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a holder with `code` selected.
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: RwLock::new(Some(code.into())),
        }
    }

    /// Select a locale for the current request.
    pub fn set(&self, code: impl Into<String>) {
        *self.code.write() = Some(code.into());
    }

    /// Clear the selection.
    pub fn clear(&self) {
        *self.code.write() = None;
    }
}

impl RequestState for RequestLocale {
    fn current_locale_code(&self) -> Option<String> {
        self.code.read().clone()
    }
}

impl RequestState for Option<String> {
    fn current_locale_code(&self) -> Option<String> {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_clear() {
        let state = RequestLocale::new();
        assert_eq!(state.current_locale_code(), None);

        state.set("fr_FR");
        assert_eq!(state.current_locale_code().as_deref(), Some("fr_FR"));

        state.clear();
        assert_eq!(state.current_locale_code(), None);
    }

    #[test]
    fn test_option_state() {
        let state = Some("de_DE".to_string());
        assert_eq!(state.current_locale_code().as_deref(), Some("de_DE"));
        assert_eq!(None::<String>.current_locale_code(), None);
    }
}
