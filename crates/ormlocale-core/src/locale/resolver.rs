//! Locale lookup interface and fallback chains.

use super::locale::Locale;

/// Locale storage provided by the host.
pub trait LocaleResolver {
    /// Look up a locale by code.
    fn get_by_code(&self, code: &str) -> Option<Locale>;

    /// The process-wide default locale, whose values live in base tables.
    fn get_default(&self) -> Option<Locale>;

    /// The locale `locale` falls back to.
    fn get_parent(&self, locale: &Locale) -> Option<Locale>;
}

/// Fallback chain for `locale`, most specific first.
///
/// Starts at `locale` and follows parents until there are none. The default
/// locale ends the chain without being part of it, since its values are read
/// from the base table. The parent chain must be finite.
pub fn fallback_chain<R>(resolver: &R, locale: Locale, default_code: &str) -> Vec<Locale>
where
    R: LocaleResolver + ?Sized,
{
    let mut chain = Vec::new();
    let mut current = Some(locale);

    while let Some(next) = current {
        if next.code == default_code {
            break;
        }
        current = resolver.get_parent(&next);
        chain.push(next);
    }

    chain
}
