//! Field filter deciding which fields of a table are localized.
//!
//! The filter is a pure function of a field set and a resolved
//! [`LocalizationConfig`]:
//!
//! 1. `translate = "none"` localizes nothing.
//! 2. A non-empty `translate` list localizes exactly the listed fields that
//!    exist, ignoring every other rule.
//! 3. Otherwise each field must pass, in order, `field_include`,
//!    `field_exclude`, `data_include` and `data_exclude`. A field rejected by
//!    a name rule is never checked against the type rules.

use crate::catalog::{FieldDef, FieldSet};
use crate::config::{LocalizationConfig, Pattern, TranslateFilter};

/// Selects the localized subset of a field set.
pub struct FieldFilter;

impl FieldFilter {
    /// Return the fields of `fields` that must be localized under `config`.
    pub fn select(fields: &FieldSet, config: &LocalizationConfig) -> FieldSet {
        if fields.is_empty() {
            return FieldSet::new();
        }

        match &config.translate {
            Some(TranslateFilter::Disabled) => FieldSet::new(),
            Some(TranslateFilter::Only(names)) if !names.is_empty() => fields
                .iter()
                .filter(|f| names.iter().any(|n| *n == f.name))
                .cloned()
                .collect(),
            _ => fields
                .iter()
                .filter(|f| Self::passes_rules(f, config))
                .cloned()
                .collect(),
        }
    }

    /// Check a single field against the include/exclude rules.
    ///
    /// The `translate` setting is not consulted.
    pub fn passes_rules(field: &FieldDef, config: &LocalizationConfig) -> bool {
        Self::passes_name_rules(&field.name, config)
            && Self::passes_type_rules(field.field_type.as_str(), field.field_type.base(), config)
    }

    fn passes_name_rules(name: &str, config: &LocalizationConfig) -> bool {
        if !config.field_include.is_empty()
            && !Pattern::any_matches(&config.field_include, name, name)
        {
            return false;
        }
        if !config.field_exclude.is_empty()
            && Pattern::any_matches(&config.field_exclude, name, name)
        {
            return false;
        }
        true
    }

    fn passes_type_rules(declared: &str, base: &str, config: &LocalizationConfig) -> bool {
        if !config.data_include.is_empty()
            && !Pattern::any_matches(&config.data_include, declared, base)
        {
            return false;
        }
        if !config.data_exclude.is_empty()
            && Pattern::any_matches(&config.data_exclude, declared, base)
        {
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PatternList;
    use proptest::prelude::*;

    fn page_fields() -> FieldSet {
        FieldSet::new()
            .with("ID", "Int")
            .with("ClassName", "Enum('Page','RedirectorPage')")
            .with("Title", "Varchar(255)")
            .with("MetaTitle", "Varchar(255)")
            .with("MetaDescription", "Text")
            .with("Content", "HTMLText")
            .with("Created", "Datetime")
            .with("Sort", "Int")
    }

    #[test]
    fn test_exclude_names_include_types() {
        let fields = FieldSet::new()
            .with("ID", "Int")
            .with("Title", "Varchar(255)")
            .with("Created", "Datetime");
        let config = LocalizationConfig::new()
            .with_patterns(PatternList::FieldExclude, ["ID", "ClassName"])
            .unwrap()
            .with_patterns(PatternList::DataInclude, ["Text", "Varchar"])
            .unwrap();

        let selected = FieldFilter::select(&fields, &config);
        assert_eq!(selected, FieldSet::new().with("Title", "Varchar(255)"));
    }

    #[test]
    fn test_regex_exclude() {
        let config = LocalizationConfig::new()
            .with_patterns(PatternList::FieldExclude, ["/^Meta/"])
            .unwrap()
            .with_patterns(PatternList::DataInclude, ["Varchar", "Text"])
            .unwrap();

        let selected = FieldFilter::select(&page_fields(), &config);
        assert_eq!(selected.names(), vec!["Title"]);
    }

    #[test]
    fn test_field_include_restricts() {
        let config = LocalizationConfig::new()
            .with_patterns(PatternList::FieldInclude, ["Title", "/Content$/"])
            .unwrap();

        let selected = FieldFilter::select(&page_fields(), &config);
        assert_eq!(selected.names(), vec!["Title", "Content"]);
    }

    #[test]
    fn test_data_exclude_checks_base_type() {
        let config = LocalizationConfig::new()
            .with_patterns(PatternList::DataExclude, ["Int", "Datetime", "Enum"])
            .unwrap();

        let selected = FieldFilter::select(&page_fields(), &config);
        assert_eq!(
            selected.names(),
            vec!["Title", "MetaTitle", "MetaDescription", "Content"]
        );
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let config = LocalizationConfig::new()
            .with_patterns(PatternList::FieldInclude, ["Title", "Sort"])
            .unwrap()
            .with_patterns(PatternList::FieldExclude, ["Sort"])
            .unwrap();

        let selected = FieldFilter::select(&page_fields(), &config);
        assert_eq!(selected.names(), vec!["Title"]);
    }

    #[test]
    fn test_translate_list_overrides_rules() {
        let config = LocalizationConfig::new()
            .with_translate(["Sort", "Title", "Missing"])
            .with_patterns(PatternList::FieldExclude, ["Sort"])
            .unwrap()
            .with_patterns(PatternList::DataInclude, ["Varchar"])
            .unwrap();

        let selected = FieldFilter::select(&page_fields(), &config);
        assert_eq!(selected.names(), vec!["Title", "Sort"]);
    }

    #[test]
    fn test_empty_translate_list_falls_back_to_rules() {
        let config = LocalizationConfig::new()
            .with_translate(Vec::<String>::new())
            .with_patterns(PatternList::DataInclude, ["HTMLText"])
            .unwrap();

        let selected = FieldFilter::select(&page_fields(), &config);
        assert_eq!(selected.names(), vec!["Content"]);
    }

    #[test]
    fn test_translate_none_disables() {
        let config = LocalizationConfig::new().disabled();
        assert!(FieldFilter::select(&page_fields(), &config).is_empty());
    }

    #[test]
    fn test_no_rules_selects_everything() {
        let selected = FieldFilter::select(&page_fields(), &LocalizationConfig::new());
        assert_eq!(selected, page_fields());
    }

    fn field_name() -> impl Strategy<Value = String> {
        "[A-Z][a-zA-Z]{0,8}"
    }

    fn field_set() -> impl Strategy<Value = FieldSet> {
        prop::collection::vec((field_name(), "(Int|Varchar\\(255\\)|Text|Datetime)"), 0..8)
            .prop_map(|pairs| {
                pairs
                    .into_iter()
                    .map(|(name, ty)| FieldDef::new(name, ty))
                    .collect()
            })
    }

    proptest! {
        #[test]
        fn prop_empty_fields_select_nothing(
            translate in prop::option::of(prop::collection::vec(field_name(), 0..4))
        ) {
            let mut config = LocalizationConfig::recommended();
            if let Some(names) = translate {
                config = config.with_translate(names);
            }
            prop_assert!(FieldFilter::select(&FieldSet::new(), &config).is_empty());
        }

        #[test]
        fn prop_translate_list_is_intersection(
            fields in field_set(),
            names in prop::collection::vec(field_name(), 1..6),
        ) {
            let config = LocalizationConfig::recommended().with_translate(names.clone());
            let selected = FieldFilter::select(&fields, &config);

            for field in fields.iter() {
                prop_assert_eq!(selected.contains(&field.name), names.contains(&field.name));
            }
            prop_assert!(selected.iter().all(|f| fields.get(&f.name) == Some(f)));
        }

        #[test]
        fn prop_selection_is_subset(fields in field_set()) {
            let selected = FieldFilter::select(&fields, &LocalizationConfig::recommended());
            prop_assert!(selected.iter().all(|f| fields.get(&f.name) == Some(f)));
        }
    }
}
