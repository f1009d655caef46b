//! ormlocale core - field selection, shadow tables and locale-aware query
//! rewriting.
//!
//! This crate decides which fields of a record class are stored per locale,
//! derives the `<Table>_Localised` shadow tables that hold them, and rewrites
//! queries to read a requested locale through its fallback chain.

pub mod catalog;
pub mod config;
pub mod error;
pub mod filter;
pub mod locale;
pub mod query;
pub mod schema;

pub use catalog::{base_type, ClassCatalog, ClassDef, FieldDef, FieldSet, FieldType, SchemaSource};
pub use config::{
    resolve_config, ConfigRegistry, ConfigScope, ConfigSource, LocalizationConfig, Pattern,
    PatternList, TranslateFilter,
};
pub use error::Error;
pub use filter::FieldFilter;
pub use locale::{
    fallback_chain, Locale, LocaleRegistry, LocaleResolver, RequestLocale, RequestState,
};
pub use query::{
    QueryBuilder, QueryContributor, QueryLocalizer, RewriteOutcome, SelectQuery, SkipReason,
};
pub use schema::{
    migrate_shadow_tables, shadow_table_name, LocalizationSchema, LocalizedTableMap,
    SchemaContributor, SchemaMigrator, ShadowMigrationReport, ShadowSchemaAction, ShadowTableDef,
};
