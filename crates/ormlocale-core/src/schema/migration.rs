//! Shadow table migration.
//!
//! The host's migration pipeline asks a [`SchemaContributor`] what each class
//! needs and applies the answer through its own [`SchemaMigrator`]. DDL
//! failures are the migrator's business and propagate unchanged.

use tracing::{debug, info};

use super::localization::LocalizationSchema;
use super::shadow::{shadow_table_name, ShadowTableDef};

/// What the migration must do about one class's shadow table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShadowSchemaAction {
    /// Create or update the shadow table.
    Require(ShadowTableDef),
    /// The class localizes nothing; any existing shadow table is obsolete.
    Drop {
        /// Shadow table name.
        table: String,
    },
    /// The class has no physical table, so no shadow table applies.
    Skip,
}

/// Produces shadow-table actions for the host's schema migration.
pub trait SchemaContributor {
    /// Decide what `class` needs.
    fn shadow_schema(&self, class: &str) -> ShadowSchemaAction;
}

impl SchemaContributor for LocalizationSchema {
    fn shadow_schema(&self, class: &str) -> ShadowSchemaAction {
        let Some(base_table) = self.source().table_name_of(class) else {
            return ShadowSchemaAction::Skip;
        };

        match self.shadow_table_definition(class) {
            Some(def) => ShadowSchemaAction::Require(def),
            None => ShadowSchemaAction::Drop {
                table: shadow_table_name(&base_table),
            },
        }
    }
}

/// DDL operations provided by the host.
pub trait SchemaMigrator {
    /// Error raised by the underlying schema layer.
    type Error;

    /// Ensure the table exists with this definition.
    fn require_table(&mut self, def: &ShadowTableDef) -> Result<(), Self::Error>;

    /// Mark a table as no longer required.
    fn dont_require_table(&mut self, table: &str) -> Result<(), Self::Error>;
}

/// Outcome of [`migrate_shadow_tables`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShadowMigrationReport {
    /// Shadow tables required.
    pub required: Vec<String>,
    /// Shadow tables marked for removal.
    pub dropped: Vec<String>,
    /// Classes skipped for lack of a table.
    pub skipped: Vec<String>,
}

impl ShadowMigrationReport {
    /// Total number of DDL operations issued.
    pub fn operation_count(&self) -> usize {
        self.required.len() + self.dropped.len()
    }
}

/// Apply the shadow schema of every class in `classes`.
///
/// Stops at the first migrator error.
pub fn migrate_shadow_tables<C, M, I, S>(
    contributor: &C,
    classes: I,
    migrator: &mut M,
) -> Result<ShadowMigrationReport, M::Error>
where
    C: SchemaContributor + ?Sized,
    M: SchemaMigrator + ?Sized,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut report = ShadowMigrationReport::default();

    for class in classes {
        let class = class.as_ref();
        match contributor.shadow_schema(class) {
            ShadowSchemaAction::Require(def) => {
                migrator.require_table(&def)?;
                info!(
                    class,
                    table = %def.table,
                    columns = def.columns.len(),
                    "Shadow table required"
                );
                report.required.push(def.table);
            }
            ShadowSchemaAction::Drop { table } => {
                migrator.dont_require_table(&table)?;
                info!(class, table = %table, "Shadow table no longer required");
                report.dropped.push(table);
            }
            ShadowSchemaAction::Skip => {
                debug!(class, "Class has no table, skipping shadow schema");
                report.skipped.push(class.to_string());
            }
        }
    }

    Ok(report)
}
