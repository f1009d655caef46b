//! Localization schema and shadow tables.
//!
//! Every base table with localized fields gets a `<Table>_Localised` shadow
//! table holding one row per record and locale.

mod cache;
mod localization;
mod migration;
mod shadow;

pub use cache::{FieldSetCache, FieldSetCacheStats};
pub use localization::{LocalizationSchema, LocalizedTable, LocalizedTableMap};
pub use migration::{
    migrate_shadow_tables, SchemaContributor, SchemaMigrator, ShadowMigrationReport,
    ShadowSchemaAction,
};
pub use shadow::{
    is_reserved_column, shadow_table_name, ColumnKind, ShadowColumn, ShadowIndex, ShadowTableDef,
    ID_COLUMN, LOCALE_CODE_MAX_LEN, LOCALE_COLUMN, RECORD_ID_COLUMN, RESERVED_COLUMNS,
    SHADOW_TABLE_SUFFIX,
};
