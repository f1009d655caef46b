//! Class-keyed configuration and its resolution into [`LocalizationConfig`].

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::localization::{LocalizationConfig, PatternList};
use crate::error::Error;

/// How far up the class hierarchy a setting is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigScope {
    /// Only what the class declares itself.
    Uninherited,
    /// Base settings, then every ancestor root first, then the class.
    Inherited,
}

/// The settings that make up a [`LocalizationConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    /// `translate`.
    Translate,
    /// One of the include/exclude lists.
    Patterns(PatternList),
}

impl ConfigKey {
    /// The scope this key is read with.
    ///
    /// A subclass never inherits an explicit translation list: each class is
    /// evaluated against its own table, so a parent's list would usually name
    /// fields the subclass does not have.
    pub fn scope(self) -> ConfigScope {
        match self {
            ConfigKey::Translate => ConfigScope::Uninherited,
            ConfigKey::Patterns(_) => ConfigScope::Inherited,
        }
    }
}

/// Class-keyed configuration provided by the host.
pub trait ConfigSource {
    /// Settings declared directly on `class`.
    fn class_config(&self, class: &str) -> Option<LocalizationConfig>;

    /// Settings every class starts from.
    fn base_config(&self) -> LocalizationConfig;

    /// Configuration layers visible to `ancestry` (root first, class last)
    /// under `scope`, lowest precedence first.
    fn layers(&self, ancestry: &[String], scope: ConfigScope) -> Vec<LocalizationConfig> {
        match scope {
            ConfigScope::Uninherited => ancestry
                .last()
                .and_then(|class| self.class_config(class))
                .into_iter()
                .collect(),
            ConfigScope::Inherited => std::iter::once(self.base_config())
                .chain(ancestry.iter().filter_map(|class| self.class_config(class)))
                .collect(),
        }
    }
}

/// Resolve the settings for the last class of `ancestry`.
///
/// Pattern lists are concatenated across layers, skipping patterns already
/// present; `translate` comes from the class alone.
pub fn resolve_config(source: &dyn ConfigSource, ancestry: &[String]) -> LocalizationConfig {
    let mut resolved = LocalizationConfig::new();

    let translate_layers = source.layers(ancestry, ConfigKey::Translate.scope());
    resolved.translate = translate_layers
        .into_iter()
        .rev()
        .find_map(|layer| layer.translate);

    for list in PatternList::ALL {
        let layers = source.layers(ancestry, ConfigKey::Patterns(list).scope());
        let target = resolved.patterns_mut(list);
        for layer in &layers {
            for pattern in layer.patterns(list) {
                if !target.contains(pattern) {
                    target.push(pattern.clone());
                }
            }
        }
    }

    resolved
}

/// In-memory [`ConfigSource`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigRegistry {
    /// Settings every class starts from.
    pub base: LocalizationConfig,
    /// Per-class settings.
    pub classes: HashMap<String, LocalizationConfig>,
}

impl ConfigRegistry {
    /// Create a registry with the given base settings.
    pub fn new(base: LocalizationConfig) -> Self {
        Self {
            base,
            classes: HashMap::new(),
        }
    }

    /// Parse a registry from JSON of the form
    /// `{"base": {...}, "classes": {"Page": {...}}}`.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the settings declared on `class`.
    pub fn with_class(mut self, class: impl Into<String>, config: LocalizationConfig) -> Self {
        self.classes.insert(class.into(), config);
        self
    }
}

impl ConfigSource for ConfigRegistry {
    fn class_config(&self, class: &str) -> Option<LocalizationConfig> {
        self.classes.get(class).cloned()
    }

    fn base_config(&self) -> LocalizationConfig {
        self.base.clone()
    }
}
