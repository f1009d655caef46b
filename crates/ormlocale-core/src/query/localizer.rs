//! Locale-aware query rewriting.
//!
//! For a query over a record class and a requested locale, the localizer
//! joins every localized table's shadow table once per locale in the
//! fallback chain:
//!
//! ```text
//! LEFT JOIN "Page_Localised" AS "Page_Localised_fr_FR"
//!     ON "Page"."ID" = "Page_Localised_fr_FR"."RecordID"
//!     AND "Page_Localised_fr_FR"."Locale" = ?          -- 'fr_FR'
//! LEFT JOIN "Page_Localised" AS "Page_Localised_fr_BE" ...  -- 'fr_BE'
//! ```
//!
//! The default locale is never joined: its values live in the base table.

use tracing::{debug, trace};

use super::fallback::fallback_expression;
use super::select::{column_ref, QueryBuilder, DEFAULT_JOIN_PRIORITY};
use crate::locale::{fallback_chain, LocaleResolver, RequestState};
use crate::schema::{
    shadow_table_name, LocalizationSchema, ID_COLUMN, LOCALE_COLUMN, RECORD_ID_COLUMN,
};

/// Query parameter carrying an explicit locale for one query.
pub const LOCALE_QUERY_PARAM: &str = "Locale";

/// Priority of the first localization join; each further chain step adds one.
pub const LOCALISED_JOIN_PRIORITY: i32 = DEFAULT_JOIN_PRIORITY + 80;

/// Alias of the shadow table of `table` joined for `locale_code`.
pub fn localised_alias(table: &str, locale_code: &str) -> String {
    format!("{}_{locale_code}", shadow_table_name(table))
}

/// Why a query was left untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Neither the query nor the request selects a locale.
    NoLocale,
    /// No default locale is configured.
    NoDefaultLocale,
    /// The requested code is not a known locale.
    UnknownLocale,
    /// The requested locale is the default; base tables already hold it.
    DefaultLocale,
    /// Nothing in the record's class hierarchy is localized.
    NothingLocalized,
}

/// Result of [`QueryLocalizer::rewrite`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
    /// The query was not modified.
    Skipped(SkipReason),
    /// Localization joins were added.
    Localized {
        /// Requested locale code.
        locale: String,
        /// Locale codes joined, most specific first.
        chain: Vec<String>,
        /// Number of localization joins the rewritten fields read through.
        joins: usize,
        /// Number of selected fields rewritten to read through the chain.
        fields: usize,
    },
}

impl RewriteOutcome {
    /// Check whether the query was modified.
    pub fn is_localized(&self) -> bool {
        matches!(self, RewriteOutcome::Localized { .. })
    }
}

/// Rewrites queries provided by the host's query-build pipeline.
pub trait QueryContributor {
    /// Rewrite `query` in place.
    fn augment_query(&self, query: &mut dyn QueryBuilder) -> RewriteOutcome;
}

/// The query-rewrite engine.
pub struct QueryLocalizer<'a> {
    schema: &'a LocalizationSchema,
    locales: &'a dyn LocaleResolver,
    request: &'a dyn RequestState,
}

impl<'a> QueryLocalizer<'a> {
    /// Create a localizer over a schema, a locale store and request state.
    pub fn new(
        schema: &'a LocalizationSchema,
        locales: &'a dyn LocaleResolver,
        request: &'a dyn RequestState,
    ) -> Self {
        Self {
            schema,
            locales,
            request,
        }
    }

    /// Locale code that applies to `query`: its own `Locale` parameter, else
    /// the request's current locale.
    pub fn effective_locale_code<Q>(&self, query: &Q) -> Option<String>
    where
        Q: QueryBuilder + ?Sized,
    {
        query
            .parameter(LOCALE_QUERY_PARAM)
            .map(str::to_string)
            .or_else(|| self.request.current_locale_code())
    }

    /// Add localization joins to `query`.
    ///
    /// Missing locale data is never an error; the query is left as it is.
    pub fn rewrite<Q>(&self, query: &mut Q) -> RewriteOutcome
    where
        Q: QueryBuilder + ?Sized,
    {
        let class = query.record_class().to_string();

        let Some(code) = self.effective_locale_code(query) else {
            return skip(&class, SkipReason::NoLocale);
        };
        let Some(default) = self.locales.get_default() else {
            return skip(&class, SkipReason::NoDefaultLocale);
        };
        let Some(locale) = self.locales.get_by_code(&code) else {
            return skip(&class, SkipReason::UnknownLocale);
        };
        if locale.code == default.code {
            return skip(&class, SkipReason::DefaultLocale);
        }

        let tables = self.schema.localized_tables_for_ancestry(&class);
        if tables.is_empty() {
            return skip(&class, SkipReason::NothingLocalized);
        }

        let chain: Vec<String> = fallback_chain(self.locales, locale, &default.code)
            .into_iter()
            .map(|l| l.code)
            .collect();

        let mut joins = 0;
        let mut fields = 0;

        for entry in tables.iter() {
            let shadow = shadow_table_name(&entry.table);
            let mut aliases = Vec::with_capacity(chain.len());

            for (depth, locale_code) in chain.iter().enumerate() {
                let alias = localised_alias(&entry.table, locale_code);
                let on = format!(
                    "{} = {} AND {} = ?",
                    column_ref(&entry.table, ID_COLUMN),
                    column_ref(&alias, RECORD_ID_COLUMN),
                    column_ref(&alias, LOCALE_COLUMN),
                );
                let priority = LOCALISED_JOIN_PRIORITY + depth as i32;

                trace!(
                    table = %shadow,
                    alias = %alias,
                    locale = %locale_code,
                    priority,
                    "Adding localization join"
                );
                let params = vec![locale_code.clone()];
                if query.add_left_join(&shadow, &on, &alias, priority, params) {
                    aliases.push(alias);
                    joins += 1;
                }
            }

            if aliases.is_empty() {
                continue;
            }
            for field in entry.fields.iter() {
                let expression = fallback_expression(&entry.table, field, &aliases);
                if query.replace_field(&entry.table, &field.name, expression) {
                    fields += 1;
                }
            }
        }

        debug!(
            class = %class,
            locale = %code,
            tables = tables.len(),
            joins,
            fields,
            "Localized query"
        );

        RewriteOutcome::Localized {
            locale: code,
            chain,
            joins,
            fields,
        }
    }
}

impl QueryContributor for QueryLocalizer<'_> {
    fn augment_query(&self, query: &mut dyn QueryBuilder) -> RewriteOutcome {
        self.rewrite(query)
    }
}

fn skip(class: &str, reason: SkipReason) -> RewriteOutcome {
    debug!(class, ?reason, "Query left unlocalized");
    RewriteOutcome::Skipped(reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ClassCatalog, ClassDef};
    use crate::config::{ConfigRegistry, LocalizationConfig, PatternList};
    use crate::locale::{Locale, LocaleRegistry, RequestLocale};
    use crate::query::SelectQuery;
    use std::sync::Arc;

    fn sample_schema() -> LocalizationSchema {
        let catalog = ClassCatalog::new()
            .with_class(
                ClassDef::new("Page")
                    .with_field("ID", "Int")
                    .with_field("Title", "Varchar(255)"),
            )
            .with_class(ClassDef::new("Member").with_field("Email", "Varchar(255)"));
        let config = ConfigRegistry::new(
            LocalizationConfig::new()
                .with_patterns(PatternList::FieldExclude, ["ID"])
                .unwrap(),
        )
        .with_class("Member", LocalizationConfig::new().disabled());

        LocalizationSchema::new(Arc::new(catalog), Arc::new(config))
    }

    fn sample_locales() -> LocaleRegistry {
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

    fn page_query() -> SelectQuery {
        SelectQuery::new("Page", "Page")
            .with_field("Page", "ID")
            .with_field("Page", "Title")
    }

    #[test]
    fn test_two_level_chain() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("fr_FR");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query();
        let outcome = localizer.rewrite(&mut query);

        assert_eq!(
            outcome,
            RewriteOutcome::Localized {
                locale: "fr_FR".into(),
                chain: vec!["fr_FR".into(), "fr_BE".into()],
                joins: 2,
                fields: 1,
            }
        );

        let joins = query.joins();
        assert_eq!(joins.len(), 2);
        assert_eq!(joins[0].table, "Page_Localised");
        assert_eq!(joins[0].alias, "Page_Localised_fr_FR");
        assert_eq!(joins[0].params, vec!["fr_FR"]);
        assert_eq!(joins[0].priority, LOCALISED_JOIN_PRIORITY);
        assert_eq!(joins[1].alias, "Page_Localised_fr_BE");
        assert_eq!(joins[1].params, vec!["fr_BE"]);
        assert_eq!(joins[1].priority, LOCALISED_JOIN_PRIORITY + 1);
        assert!(query.join("Page_Localised_en_US").is_none());

        assert_eq!(
            joins[0].on,
            "\"Page\".\"ID\" = \"Page_Localised_fr_FR\".\"RecordID\" \
             AND \"Page_Localised_fr_FR\".\"Locale\" = ?"
        );
    }

    #[test]
    fn test_locale_code_is_bound_not_interpolated() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("fr_FR");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query();
        localizer.rewrite(&mut query);

        let (sql, params) = query.to_sql();
        assert!(!sql.contains("'fr_FR'"));
        assert_eq!(params, vec!["fr_FR", "fr_BE"]);
    }

    #[test]
    fn test_default_locale_is_noop() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("en_US");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query();
        let before = query.clone();
        assert_eq!(
            localizer.rewrite(&mut query),
            RewriteOutcome::Skipped(SkipReason::DefaultLocale)
        );
        assert_eq!(query, before);
    }

    #[test]
    fn test_no_locale_is_noop() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::new();
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query();
        assert_eq!(
            localizer.rewrite(&mut query),
            RewriteOutcome::Skipped(SkipReason::NoLocale)
        );
        assert!(query.joins().is_empty());
    }

    #[test]
    fn test_unknown_locale_and_missing_default() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("xx_XX");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);
        assert_eq!(
            localizer.rewrite(&mut page_query()),
            RewriteOutcome::Skipped(SkipReason::UnknownLocale)
        );

        let no_default = LocaleRegistry::new().with_locale(Locale::new("fr_FR")).unwrap();
        let request = RequestLocale::with_code("fr_FR");
        let localizer = QueryLocalizer::new(&schema, &no_default, &request);
        assert_eq!(
            localizer.rewrite(&mut page_query()),
            RewriteOutcome::Skipped(SkipReason::NoDefaultLocale)
        );
    }

    #[test]
    fn test_query_parameter_overrides_request() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("fr_FR");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query().with_parameter(LOCALE_QUERY_PARAM, "fr_BE");
        let outcome = localizer.rewrite(&mut query);

        assert!(outcome.is_localized());
        assert_eq!(query.joins().len(), 1);
        assert_eq!(query.joins()[0].alias, "Page_Localised_fr_BE");

        let mut query = page_query().with_parameter(LOCALE_QUERY_PARAM, "en_US");
        assert_eq!(
            localizer.rewrite(&mut query),
            RewriteOutcome::Skipped(SkipReason::DefaultLocale)
        );
    }

    #[test]
    fn test_unlocalized_class_is_noop() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("fr_FR");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = SelectQuery::new("Member", "Member").with_field("Member", "Email");
        assert_eq!(
            localizer.rewrite(&mut query),
            RewriteOutcome::Skipped(SkipReason::NothingLocalized)
        );
    }

    #[test]
    fn test_selected_fields_read_through_chain() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("fr_BE");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query();
        localizer.augment_query(&mut query);

        let (sql, _) = query.to_sql();
        assert_eq!(
            sql,
            "SELECT \"Page\".\"ID\", CASE WHEN \"Page_Localised_fr_BE\".\"Title\" IS NOT NULL \
             AND \"Page_Localised_fr_BE\".\"Title\" != '' THEN \"Page_Localised_fr_BE\".\"Title\" \
             ELSE \"Page\".\"Title\" END AS \"Title\" FROM \"Page\" \
             LEFT JOIN \"Page_Localised\" AS \"Page_Localised_fr_BE\" \
             ON \"Page\".\"ID\" = \"Page_Localised_fr_BE\".\"RecordID\" \
             AND \"Page_Localised_fr_BE\".\"Locale\" = ?"
        );
    }

    #[test]
    fn test_rewrite_twice_keeps_joins() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("fr_FR");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query();
        localizer.rewrite(&mut query);
        localizer.rewrite(&mut query);
        assert_eq!(query.joins().len(), 2);
    }

    #[test]
    fn test_record_id_never_read_from_shadow_row() {
        let catalog = ClassCatalog::new().with_class(
            ClassDef::new("Page")
                .with_field("ID", "Int")
                .with_field("Locale", "Varchar(10)")
                .with_field("Title", "Varchar(255)")
                .with_field("Sort", "Int"),
        );
        let schema =
            LocalizationSchema::new(Arc::new(catalog), Arc::new(ConfigRegistry::default()));
        let locales = sample_locales();
        let request = RequestLocale::with_code("fr_FR");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query().with_field("Page", "Sort");
        localizer.rewrite(&mut query);

        let (sql, _) = query.to_sql();
        assert!(sql.starts_with("SELECT \"Page\".\"ID\", CASE"));
        assert!(!sql.contains("\"Page_Localised_fr_FR\".\"ID\" IS NOT NULL"));
        assert!(sql.contains(
            "WHEN \"Page_Localised_fr_FR\".\"Sort\" IS NOT NULL \
             THEN \"Page_Localised_fr_FR\".\"Sort\""
        ));
        assert!(!sql.contains("\"Sort\" != ''"));
    }

    #[test]
    fn test_taken_alias_left_out_of_fallback() {
        let schema = sample_schema();
        let locales = sample_locales();
        let request = RequestLocale::with_code("fr_FR");
        let localizer = QueryLocalizer::new(&schema, &locales, &request);

        let mut query = page_query().with_inner_join(
            "Archive",
            "Page_Localised_fr_FR",
            "\"Page\".\"ID\" = \"Page_Localised_fr_FR\".\"PageID\"",
        );
        let outcome = localizer.rewrite(&mut query);

        assert_eq!(
            outcome,
            RewriteOutcome::Localized {
                locale: "fr_FR".into(),
                chain: vec!["fr_FR".into(), "fr_BE".into()],
                joins: 1,
                fields: 1,
            }
        );
        assert_eq!(query.join("Page_Localised_fr_FR").unwrap().table, "Archive");

        let (sql, params) = query.to_sql();
        assert!(!sql.contains("WHEN \"Page_Localised_fr_FR\""));
        assert!(sql.contains("WHEN \"Page_Localised_fr_BE\".\"Title\""));
        assert_eq!(params, vec!["fr_BE"]);
    }
}
