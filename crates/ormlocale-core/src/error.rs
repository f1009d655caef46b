//! Core error types.

use thiserror::Error;

/// Core localization errors.
///
/// Field filtering and query rewriting never fail; these errors come from
/// loading configuration and registering locale data.
#[derive(Debug, Error)]
pub enum Error {
    /// A `/regex/` pattern could not be compiled.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        /// The pattern text as written in configuration.
        pattern: String,
        /// The underlying regex error.
        #[source]
        source: regex::Error,
    },

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A locale code is empty or longer than the shadow `Locale` column.
    #[error("invalid locale code {0:?}")]
    InvalidLocaleCode(String),

    /// A locale names a parent that has not been registered.
    #[error("locale {locale} references unknown parent {parent}")]
    UnknownParentLocale {
        /// The locale being registered.
        locale: String,
        /// The missing parent code.
        parent: String,
    },

    /// Registering the locale would make its parent chain loop.
    #[error("locale {0} would create a cycle in the parent chain")]
    LocaleCycle(String),

    /// The locale cannot be removed while another locale falls back to it.
    #[error("locale {locale} is the parent of {child}")]
    LocaleInUse {
        /// The locale being removed.
        locale: String,
        /// A locale that falls back to it.
        child: String,
    },

    /// The locale code is not registered.
    #[error("unknown locale {0}")]
    UnknownLocale(String),
}
