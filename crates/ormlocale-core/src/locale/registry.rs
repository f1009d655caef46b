//! In-memory locale registry.

use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::debug;

use super::locale::Locale;
use super::resolver::LocaleResolver;
use crate::error::Error;

#[derive(Debug, Default)]
struct RegistryInner {
    locales: HashMap<String, Locale>,
    default: Option<String>,
}

/// Thread-safe [`LocaleResolver`] holding locales in memory.
///
/// Parent chains are validated on registration: a parent must already be
/// registered and no chain may loop, so every chain terminates.
#[derive(Debug, Default)]
pub struct LocaleRegistry {
    inner: RwLock<RegistryInner>,
}

impl LocaleRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace a locale.
    pub fn insert(&self, locale: Locale) -> Result<(), Error> {
        Locale::validate_code(&locale.code)?;

        let mut inner = self.inner.write();
        if let Some(parent) = &locale.parent {
            if !inner.locales.contains_key(parent) && *parent != locale.code {
                return Err(Error::UnknownParentLocale {
                    locale: locale.code.clone(),
                    parent: parent.clone(),
                });
            }

            // Walk up from the parent; reaching the new code means a loop.
            let mut cursor = Some(parent.as_str());
            while let Some(code) = cursor {
                if code == locale.code {
                    return Err(Error::LocaleCycle(locale.code.clone()));
                }
                cursor = inner
                    .locales
                    .get(code)
                    .and_then(|l| l.parent.as_deref());
            }
        }

        debug!(code = %locale.code, parent = ?locale.parent, "Registered locale");
        inner.locales.insert(locale.code.clone(), locale);
        Ok(())
    }

    /// Builder form of [`LocaleRegistry::insert`].
    pub fn with_locale(self, locale: Locale) -> Result<Self, Error> {
        self.insert(locale)?;
        Ok(self)
    }

    /// Make a registered locale the default.
    pub fn set_default(&self, code: &str) -> Result<(), Error> {
        let mut inner = self.inner.write();
        if !inner.locales.contains_key(code) {
            return Err(Error::UnknownLocale(code.to_string()));
        }
        inner.default = Some(code.to_string());
        Ok(())
    }

    /// Remove a locale. Fails while other locales fall back to it.
    pub fn remove(&self, code: &str) -> Result<Option<Locale>, Error> {
        let mut inner = self.inner.write();
        if let Some(child) = inner
            .locales
            .values()
            .find(|l| l.parent.as_deref() == Some(code))
        {
            return Err(Error::LocaleInUse {
                locale: code.to_string(),
                child: child.code.clone(),
            });
        }
        if inner.default.as_deref() == Some(code) {
            inner.default = None;
        }
        Ok(inner.locales.remove(code))
    }

    /// All registered codes, sorted.
    pub fn codes(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.inner.read().locales.keys().cloned().collect();
        codes.sort();
        codes
    }

    pub fn len(&self) -> usize {
        self.inner.read().locales.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().locales.is_empty()
    }
}

impl LocaleResolver for LocaleRegistry {
    fn get_by_code(&self, code: &str) -> Option<Locale> {
        self.inner.read().locales.get(code).cloned()
    }

    fn get_default(&self) -> Option<Locale> {
        let inner = self.inner.read();
        inner
            .default
            .as_ref()
            .and_then(|code| inner.locales.get(code))
            .cloned()
    }

    fn get_parent(&self, locale: &Locale) -> Option<Locale> {
        let parent = locale.parent.as_ref()?;
        self.inner.read().locales.get(parent).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locale::fallback_chain;

    fn french_registry() -> LocaleRegistry {
        let registry = LocaleRegistry::new()
            .with_locale(Locale::new("en_US"))
            .unwrap()
            .with_locale(Locale::new("fr_BE").with_parent("en_US"))
            .unwrap()
            .with_locale(Locale::new("fr_FR").with_parent("fr_BE"))
            .unwrap();
        registry.set_default("en_US").unwrap();
        registry
    }

    #[test]
    fn test_lookup() {
        let registry = french_registry();
        assert_eq!(registry.get_default().unwrap().code, "en_US");

        let fr = registry.get_by_code("fr_FR").unwrap();
        assert_eq!(registry.get_parent(&fr).unwrap().code, "fr_BE");
        assert!(registry.get_by_code("de_DE").is_none());
        assert_eq!(registry.codes(), vec!["en_US", "fr_BE", "fr_FR"]);
    }

    #[test]
    fn test_unknown_parent_rejected() {
        let registry = LocaleRegistry::new();
        let err = registry
            .insert(Locale::new("fr_FR").with_parent("fr_BE"))
            .unwrap_err();
        assert!(matches!(err, Error::UnknownParentLocale { .. }));
    }

    #[test]
    fn test_cycles_rejected() {
        let registry = french_registry();

        let err = registry
            .insert(Locale::new("en_US").with_parent("fr_FR"))
            .unwrap_err();
        assert!(matches!(err, Error::LocaleCycle(code) if code == "en_US"));

        let err = registry
            .insert(Locale::new("de_DE").with_parent("de_DE"))
            .unwrap_err();
        assert!(matches!(err, Error::LocaleCycle(_)));

        // The rejected update left the old parent in place.
        assert!(registry.get_by_code("en_US").unwrap().parent.is_none());
    }

    #[test]
    fn test_invalid_code_rejected() {
        let registry = LocaleRegistry::new();
        assert!(matches!(
            registry.insert(Locale::new("much_too_long")),
            Err(Error::InvalidLocaleCode(_))
        ));
    }

    #[test]
    fn test_default_must_exist() {
        let registry = LocaleRegistry::new();
        assert!(matches!(
            registry.set_default("en_US"),
            Err(Error::UnknownLocale(_))
        ));
        assert!(registry.get_default().is_none());
    }

    #[test]
    fn test_remove() {
        let registry = french_registry();
        assert!(matches!(
            registry.remove("fr_BE"),
            Err(Error::LocaleInUse { child, .. }) if child == "fr_FR"
        ));

        assert!(registry.remove("fr_FR").unwrap().is_some());
        assert!(registry.remove("fr_BE").unwrap().is_some());
        assert!(registry.remove("en_US").unwrap().is_some());
        assert!(registry.get_default().is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_fallback_chain_stops_before_default() {
        let registry = french_registry();
        let fr = registry.get_by_code("fr_FR").unwrap();

        let chain: Vec<String> = fallback_chain(&registry, fr, "en_US")
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(chain, vec!["fr_FR", "fr_BE"]);
    }

    #[test]
    fn test_fallback_chain_without_default_ancestor() {
        let registry = french_registry();
        registry.insert(Locale::new("de_DE")).unwrap();
        registry.insert(Locale::new("de_AT").with_parent("de_DE")).unwrap();

        let at = registry.get_by_code("de_AT").unwrap();
        let chain: Vec<String> = fallback_chain(&registry, at, "en_US")
            .into_iter()
            .map(|l| l.code)
            .collect();
        assert_eq!(chain, vec!["de_AT", "de_DE"]);
    }

    #[test]
    fn test_fallback_chain_for_default_is_empty() {
        let registry = french_registry();
        let en = registry.get_default().unwrap();
        assert!(fallback_chain(&registry, en, "en_US").is_empty());
    }
}
