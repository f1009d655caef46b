//! Localization settings for a record class.

use serde::{Deserialize, Serialize};

use super::pattern::{parse_patterns, Pattern};
use crate::error::Error;

/// Marker value of `translate` that disables localization for a class.
pub const TRANSLATE_NONE: &str = "none";

/// Explicit translation list for a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTranslate", into = "RawTranslate")]
pub enum TranslateFilter {
    /// Nothing on the class is localized.
    Disabled,
    /// Only these fields are localized; include/exclude lists are ignored.
    Only(Vec<String>),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTranslate {
    Marker(String),
    Fields(Vec<String>),
}

impl TryFrom<RawTranslate> for TranslateFilter {
    type Error = String;

    fn try_from(raw: RawTranslate) -> Result<Self, Self::Error> {
        match raw {
            RawTranslate::Marker(marker) if marker == TRANSLATE_NONE => {
                Ok(TranslateFilter::Disabled)
            }
            RawTranslate::Marker(other) => Err(format!(
                "expected \"{TRANSLATE_NONE}\" or a list of field names, got {other:?}"
            )),
            RawTranslate::Fields(fields) => Ok(TranslateFilter::Only(fields)),
        }
    }
}

impl From<TranslateFilter> for RawTranslate {
    fn from(filter: TranslateFilter) -> Self {
        match filter {
            TranslateFilter::Disabled => RawTranslate::Marker(TRANSLATE_NONE.to_string()),
            TranslateFilter::Only(fields) => RawTranslate::Fields(fields),
        }
    }
}

/// Selects one of the four pattern lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatternList {
    /// Field names that may be localized.
    FieldInclude,
    /// Field names that are never localized.
    FieldExclude,
    /// Field types that may be localized.
    DataInclude,
    /// Field types that are never localized.
    DataExclude,
}

impl PatternList {
    /// All lists, in evaluation order.
    pub const ALL: [PatternList; 4] = [
        PatternList::FieldInclude,
        PatternList::FieldExclude,
        PatternList::DataInclude,
        PatternList::DataExclude,
    ];
}

/// Rules deciding which fields of a class are localized.
///
/// The same type describes base settings, a single class's own overrides and
/// the fully resolved settings handed to the field filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalizationConfig {
    /// Explicit translation list or the `"none"` marker.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<TranslateFilter>,
    /// Field name include patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_include: Vec<Pattern>,
    /// Field name exclude patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub field_exclude: Vec<Pattern>,
    /// Field type include patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_include: Vec<Pattern>,
    /// Field type exclude patterns.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub data_exclude: Vec<Pattern>,
}

impl LocalizationConfig {
    /// Create empty settings: every field passes the filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Conventional base settings: text-like columns, minus bookkeeping fields.
    pub fn recommended() -> Self {
        let literals = |names: &[&str]| -> Vec<Pattern> {
            names.iter().map(|n| Pattern::literal(*n)).collect()
        };
        Self {
            translate: None,
            field_include: Vec::new(),
            field_exclude: literals(&["ID", "ClassName", "RecordID", "Locale", "Version"]),
            data_include: literals(&["Varchar", "Text", "HTMLText", "HTMLVarchar"]),
            data_exclude: Vec::new(),
        }
    }

    /// Parse settings from JSON.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Localize only the named fields.
    pub fn with_translate<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.translate = Some(TranslateFilter::Only(
            fields.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Disable localization entirely.
    pub fn disabled(mut self) -> Self {
        self.translate = Some(TranslateFilter::Disabled);
        self
    }

    /// Append patterns to one of the lists.
    pub fn with_patterns<I, S>(mut self, list: PatternList, texts: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let parsed = parse_patterns(texts)?;
        self.patterns_mut(list).extend(parsed);
        Ok(self)
    }

    /// Get one of the pattern lists.
    pub fn patterns(&self, list: PatternList) -> &[Pattern] {
        match list {
            PatternList::FieldInclude => &self.field_include,
            PatternList::FieldExclude => &self.field_exclude,
            PatternList::DataInclude => &self.data_include,
            PatternList::DataExclude => &self.data_exclude,
        }
    }

    /// Get one of the pattern lists mutably.
    pub fn patterns_mut(&mut self, list: PatternList) -> &mut Vec<Pattern> {
        match list {
            PatternList::FieldInclude => &mut self.field_include,
            PatternList::FieldExclude => &mut self.field_exclude,
            PatternList::DataInclude => &mut self.data_include,
            PatternList::DataExclude => &mut self.data_exclude,
        }
    }

    /// Check if the `"none"` marker is set.
    pub fn is_disabled(&self) -> bool {
        matches!(self.translate, Some(TranslateFilter::Disabled))
    }
}
