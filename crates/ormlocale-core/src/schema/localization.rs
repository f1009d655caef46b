//! Localization schema: which tables and fields of a class hierarchy are
//! localized, and the shadow tables that hold them.

use std::sync::Arc;

use tracing::debug;

use super::cache::FieldSetCache;
use super::shadow::{is_reserved_column, ShadowTableDef};
use crate::catalog::{FieldSet, SchemaSource};
use crate::config::{resolve_config, ConfigSource, LocalizationConfig};
use crate::filter::FieldFilter;

/// Localized fields of one base table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalizedTable {
    /// Base table name.
    pub table: String,
    /// Localized fields with their declared types, in declaration order.
    pub fields: FieldSet,
}

/// Base table → localized fields, across a class ancestry.
///
/// Tables keep the order they were added in (root class first when built by
/// [`LocalizationSchema::localized_tables_for_ancestry`]).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalizedTableMap {
    tables: Vec<LocalizedTable>,
}

impl LocalizedTableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table. Returns false, leaving the map unchanged, if the table is
    /// already present.
    pub fn insert(&mut self, table: impl Into<String>, fields: FieldSet) -> bool {
        let table = table.into();
        if self.contains(&table) {
            return false;
        }
        self.tables.push(LocalizedTable { table, fields });
        true
    }

    /// Localized fields of `table`.
    pub fn get(&self, table: &str) -> Option<&FieldSet> {
        self.tables
            .iter()
            .find(|t| t.table == table)
            .map(|t| &t.fields)
    }

    /// Localized field names of `table`.
    pub fn field_names(&self, table: &str) -> Option<Vec<String>> {
        self.get(table).map(FieldSet::names)
    }

    pub fn contains(&self, table: &str) -> bool {
        self.get(table).is_some()
    }

    /// Table names in insertion order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.table.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocalizedTable> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Derives localized field sets and shadow tables from live class metadata.
///
/// Each class is evaluated on its own: the fields it declares itself are
/// filtered with its resolved configuration, independently of what its
/// ancestors localize. Results are memoized per class for the lifetime of
/// the schema.
pub struct LocalizationSchema {
    schema: Arc<dyn SchemaSource + Send + Sync>,
    config: Arc<dyn ConfigSource + Send + Sync>,
    cache: FieldSetCache,
}

impl LocalizationSchema {
    /// Create a localization schema over the host's metadata and configuration.
    pub fn new(
        schema: Arc<dyn SchemaSource + Send + Sync>,
        config: Arc<dyn ConfigSource + Send + Sync>,
    ) -> Self {
        Self {
            schema,
            config,
            cache: FieldSetCache::new(),
        }
    }

    /// The host metadata this schema reads.
    pub fn source(&self) -> &(dyn SchemaSource + Send + Sync) {
        self.schema.as_ref()
    }

    /// The field-set cache.
    pub fn cache(&self) -> &FieldSetCache {
        &self.cache
    }

    /// Resolve the configuration that applies to `class`.
    pub fn config_for(&self, class: &str) -> LocalizationConfig {
        let ancestry = self.schema.ancestry_of(class);
        resolve_config(self.config.as_ref(), &ancestry)
    }

    /// Localized subset of the fields `class` declares itself.
    ///
    /// The shadow table's own `ID`, `RecordID` and `Locale` columns are never
    /// part of it, whatever the configuration selects.
    pub fn localized_fields(&self, class: &str) -> Arc<FieldSet> {
        self.cache.get_or_compute(class, || {
            let own = self.schema.database_fields_of(class, false);
            let selected: FieldSet = FieldFilter::select(&own, &self.config_for(class))
                .into_iter()
                .filter(|f| !is_reserved_column(&f.name))
                .collect();
            debug!(
                class,
                declared = own.len(),
                localized = selected.len(),
                "Computed localized fields"
            );
            selected
        })
    }

    /// Shadow table definition for `class`.
    ///
    /// Returns `None` when no shadow table is required: the class has no
    /// physical table or localizes none of its own fields.
    pub fn shadow_table_definition(&self, class: &str) -> Option<ShadowTableDef> {
        let table = self.schema.table_name_of(class)?;
        let fields = self.localized_fields(class);
        if fields.is_empty() {
            return None;
        }
        Some(ShadowTableDef::new(table, &fields))
    }

    /// Localized tables across the full ancestry of `class`.
    ///
    /// Classes without a physical table are skipped, as are classes that
    /// localize nothing.
    pub fn localized_tables_for_ancestry(&self, class: &str) -> LocalizedTableMap {
        let mut map = LocalizedTableMap::new();

        for ancestor in self.schema.ancestry_of(class) {
            if !self.schema.class_has_table(&ancestor) {
                continue;
            }
            let Some(table) = self.schema.table_name_of(&ancestor) else {
                continue;
            };

            let fields = self.localized_fields(&ancestor);
            if fields.is_empty() {
                continue;
            }
            map.insert(table, FieldSet::clone(&fields));
        }

        map
    }
}

impl std::fmt::Debug for LocalizationSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalizationSchema")
            .field("cached_classes", &self.cache.len())
            .finish_non_exhaustive()
    }
}
