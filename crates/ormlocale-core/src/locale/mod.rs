//! Locales, fallback chains and the request's current locale.

mod locale;
mod registry;
mod request;
mod resolver;

pub use locale::Locale;
pub use registry::LocaleRegistry;
pub use request::{RequestLocale, RequestState};
pub use resolver::{fallback_chain, LocaleResolver};
