//! Localization configuration.
//!
//! Settings are declared per class and resolved once per class into a
//! [`LocalizationConfig`], which is then passed explicitly to the field filter.

mod localization;
mod pattern;
mod registry;

pub use localization::{LocalizationConfig, PatternList, TranslateFilter, TRANSLATE_NONE};
pub use pattern::{parse_patterns, Pattern};
pub use registry::{resolve_config, ConfigKey, ConfigRegistry, ConfigScope, ConfigSource};
