//! The localization facade.

use std::sync::Arc;

use serde_json::Value;
use tracing::info;

use ormlocale_core::catalog::SchemaSource;
use ormlocale_core::config::ConfigSource;
use ormlocale_core::locale::{fallback_chain, LocaleResolver, RequestState};
use ormlocale_core::query::{QueryBuilder, QueryContributor, QueryLocalizer, RewriteOutcome};
use ormlocale_core::schema::{
    migrate_shadow_tables, LocalizationSchema, SchemaContributor, SchemaMigrator,
    ShadowMigrationReport, ShadowSchemaAction,
};

use crate::error::Error;
use crate::store::ShadowStore;

/// Localization extension for one host schema.
///
/// Wires the host's class metadata, localization configuration, locale
/// store and request state together. A `Localizer` contributes shadow
/// tables to schema builds and localization joins to query builds.
pub struct Localizer {
    schema: LocalizationSchema,
    locales: Arc<dyn LocaleResolver + Send + Sync>,
    request: Arc<dyn RequestState + Send + Sync>,
}

impl Localizer {
    /// Create a localizer.
    pub fn new(
        schema: Arc<dyn SchemaSource + Send + Sync>,
        config: Arc<dyn ConfigSource + Send + Sync>,
        locales: Arc<dyn LocaleResolver + Send + Sync>,
        request: Arc<dyn RequestState + Send + Sync>,
    ) -> Self {
        Self {
            schema: LocalizationSchema::new(schema, config),
            locales,
            request,
        }
    }

    /// The localization schema.
    pub fn schema(&self) -> &LocalizationSchema {
        &self.schema
    }

    /// A query localizer borrowing this localizer's collaborators.
    pub fn query_localizer(&self) -> QueryLocalizer<'_> {
        QueryLocalizer::new(&self.schema, self.locales.as_ref(), self.request.as_ref())
    }

    /// Add localization joins to `query`.
    pub fn rewrite<Q>(&self, query: &mut Q) -> RewriteOutcome
    where
        Q: QueryBuilder + ?Sized,
    {
        self.query_localizer().rewrite(query)
    }

    /// Apply the shadow schema of every class the host knows.
    pub fn migrate<M>(&self, migrator: &mut M) -> Result<ShadowMigrationReport, M::Error>
    where
        M: SchemaMigrator + ?Sized,
    {
        let classes = self.schema.source().class_names();
        let report = migrate_shadow_tables(self, &classes, migrator)?;
        info!(
            classes = classes.len(),
            required = report.required.len(),
            dropped = report.dropped.len(),
            "Shadow schema migrated"
        );
        Ok(report)
    }

    /// Fallback chain codes for `code`, most specific first.
    ///
    /// Empty when the code is unknown, is the default locale, or no default
    /// locale is configured.
    pub fn chain_for(&self, code: &str) -> Vec<String> {
        let (Some(default), Some(locale)) =
            (self.locales.get_default(), self.locales.get_by_code(code))
        else {
            return Vec::new();
        };
        fallback_chain(self.locales.as_ref(), locale, &default.code)
            .into_iter()
            .map(|l| l.code)
            .collect()
    }

    /// Read `field` of a record of `class` in the request's current locale.
    ///
    /// Walks the ancestry to find the table declaring the field, then reads
    /// the shadow rows along the fallback chain. Returns `None` when the base
    /// table value applies.
    pub fn localized_value(
        &self,
        store: &ShadowStore,
        class: &str,
        record_id: u64,
        field: &str,
    ) -> Result<Option<Value>, Error> {
        let Some(code) = self.request.current_locale_code() else {
            return Ok(None);
        };
        let chain = self.chain_for(&code);
        if chain.is_empty() {
            return Ok(None);
        }

        let tables = self.schema.localized_tables_for_ancestry(class);
        for entry in tables.iter() {
            if entry.fields.contains(field) {
                return store.resolve_value(&entry.table, record_id, &chain, field);
            }
        }
        Ok(None)
    }
}

impl SchemaContributor for Localizer {
    fn shadow_schema(&self, class: &str) -> ShadowSchemaAction {
        self.schema.shadow_schema(class)
    }
}

impl QueryContributor for Localizer {
    fn augment_query(&self, query: &mut dyn QueryBuilder) -> RewriteOutcome {
        self.rewrite(query)
    }
}

impl std::fmt::Debug for Localizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Localizer")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
