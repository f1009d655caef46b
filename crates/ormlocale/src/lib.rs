//! ormlocale - per-locale content for ORM records.
//!
//! Localized fields of a record class are stored in `<Table>_Localised`
//! shadow tables, one row per record and locale. Reads in a non-default
//! locale are rewritten to left join the shadow tables along the locale's
//! fallback chain, falling back to the base table value.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use ormlocale::{
//!     ClassCatalog, ClassDef, ConfigRegistry, Locale, LocaleRegistry, LocalizationConfig,
//!     Localizer, RequestLocale, SelectQuery, ShadowRow, ShadowStore,
//! };
//!
//! # fn main() -> Result<(), ormlocale::Error> {
//! let catalog = ClassCatalog::new()
//!     .with_class(ClassDef::new("Page").with_field("Title", "Varchar(255)"));
//!
//! let locales = LocaleRegistry::new()
//!     .with_locale(Locale::new("en_US"))?
//!     .with_locale(Locale::new("fr_FR").with_parent("en_US"))?;
//! locales.set_default("en_US")?;
//!
//! let localizer = Localizer::new(
//!     Arc::new(catalog),
//!     Arc::new(ConfigRegistry::new(LocalizationConfig::recommended())),
//!     Arc::new(locales),
//!     Arc::new(RequestLocale::with_code("fr_FR")),
//! );
//!
//! let db = sled::open("./data")?;
//! let mut store = ShadowStore::open(&db)?;
//! localizer.migrate(&mut store)?;
//! store.insert("Page", ShadowRow::new(1, "fr_FR").with_value("Title", "Bonjour"))?;
//!
//! let mut query = SelectQuery::new("Page", "Page").with_field("Page", "Title");
//! localizer.rewrite(&mut query);
//! let (sql, params) = query.to_sql();
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod localizer;
pub mod store;

pub use error::Error;
pub use localizer::Localizer;
pub use store::{ShadowRow, ShadowStore, SHADOW_ROWS_TREE, SHADOW_TABLES_TREE};

pub use ormlocale_core as core;
pub use ormlocale_core::{
    ClassCatalog, ClassDef, ConfigRegistry, FieldFilter, FieldSet, Locale, LocaleRegistry,
    LocaleResolver, LocalizationConfig, LocalizationSchema, QueryContributor, RequestLocale,
    RequestState, RewriteOutcome, SchemaContributor, SchemaMigrator, SelectQuery, SkipReason,
};
