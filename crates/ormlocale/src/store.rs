//! Shadow row storage.
//!
//! Rows of every `<Table>_Localised` table live in one sled tree keyed by
//! `shadow_table\0record_id(be)locale`, which makes `(RecordID, Locale)`
//! unique per table by construction. Shadow table definitions required by a
//! migration live in a second tree keyed by shadow table name.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sled::Tree;
use tracing::{debug, info};

use ormlocale_core::schema::{shadow_table_name, ColumnKind, SchemaMigrator, ShadowTableDef};
use ormlocale_core::Locale;

use crate::error::Error;

/// Tree holding shadow rows.
pub const SHADOW_ROWS_TREE: &str = "shadow:rows";

/// Tree holding required shadow table definitions.
pub const SHADOW_TABLES_TREE: &str = "shadow:tables";

/// One row of a shadow table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowRow {
    /// Row ID, assigned by the store on insert.
    pub id: u64,
    /// ID of the base record.
    pub record_id: u64,
    /// Locale code.
    pub locale: String,
    /// Localized field values.
    pub values: BTreeMap<String, Value>,
}

impl ShadowRow {
    /// Create an empty row for `record_id` in `locale`.
    pub fn new(record_id: u64, locale: impl Into<String>) -> Self {
        Self {
            id: 0,
            record_id,
            locale: locale.into(),
            values: BTreeMap::new(),
        }
    }

    /// Set a field value.
    pub fn with_value(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Get a field value.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }
}

/// Persistent store of shadow rows.
pub struct ShadowStore {
    db: sled::Db,
    rows: Tree,
    tables: Tree,
}

impl ShadowStore {
    /// Open or create the store in a sled database.
    pub fn open(db: &sled::Db) -> Result<Self, Error> {
        Ok(Self {
            db: db.clone(),
            rows: db.open_tree(SHADOW_ROWS_TREE)?,
            tables: db.open_tree(SHADOW_TABLES_TREE)?,
        })
    }

    fn table_prefix(shadow_table: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(shadow_table.len() + 1);
        key.extend_from_slice(shadow_table.as_bytes());
        key.push(0);
        key
    }

    fn record_prefix(shadow_table: &str, record_id: u64) -> Vec<u8> {
        let mut key = Self::table_prefix(shadow_table);
        key.extend_from_slice(&record_id.to_be_bytes());
        key
    }

    fn build_key(shadow_table: &str, record_id: u64, locale: &str) -> Vec<u8> {
        let mut key = Self::record_prefix(shadow_table, record_id);
        key.extend_from_slice(locale.as_bytes());
        key
    }

    /// Definition of the shadow table of `base_table`, if required.
    pub fn table_definition(&self, base_table: &str) -> Result<Option<ShadowTableDef>, Error> {
        let shadow = shadow_table_name(base_table);
        match self.tables.get(shadow.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn checked_definition(
        &self,
        base_table: &str,
        row: &ShadowRow,
    ) -> Result<ShadowTableDef, Error> {
        Locale::validate_code(&row.locale)?;

        let def = self
            .table_definition(base_table)?
            .ok_or_else(|| Error::UnknownTable(shadow_table_name(base_table)))?;

        for column in row.values.keys() {
            if !def.localized_columns().any(|c| c.name == *column) {
                return Err(Error::UnknownColumn {
                    table: def.table.clone(),
                    column: column.clone(),
                });
            }
        }
        Ok(def)
    }

    /// Insert a new row into the shadow table of `base_table`.
    ///
    /// Fails with [`Error::UniqueViolation`] if a row for the same record and
    /// locale exists. Returns the assigned row ID.
    pub fn insert(&self, base_table: &str, mut row: ShadowRow) -> Result<u64, Error> {
        let def = self.checked_definition(base_table, &row)?;
        let key = Self::build_key(&def.table, row.record_id, &row.locale);

        row.id = self.db.generate_id()?;
        let bytes = serde_json::to_vec(&row)?;

        // Atomic insert-if-absent.
        if self
            .rows
            .compare_and_swap(&key, None::<&[u8]>, Some(bytes))?
            .is_err()
        {
            return Err(Error::UniqueViolation {
                table: def.table,
                record_id: row.record_id,
                locale: row.locale,
            });
        }

        debug!(
            table = %def.table,
            record_id = row.record_id,
            locale = %row.locale,
            "Inserted shadow row"
        );
        Ok(row.id)
    }

    /// Insert a row or replace the values of the existing row for the same
    /// record and locale, keeping its ID.
    pub fn upsert(&self, base_table: &str, row: ShadowRow) -> Result<u64, Error> {
        let def = self.checked_definition(base_table, &row)?;
        let key = Self::build_key(&def.table, row.record_id, &row.locale);
        let fresh_id = self.db.generate_id()?;

        let mut assigned = fresh_id;
        let mut failure: Option<serde_json::Error> = None;

        // Read-modify-write in one atomic step; the stored row's ID is kept.
        self.rows.fetch_and_update(&key, |existing| {
            failure = None;
            let mut next = row.clone();
            next.id = match existing.map(serde_json::from_slice::<ShadowRow>) {
                Some(Ok(stored)) => stored.id,
                Some(Err(e)) => {
                    failure = Some(e);
                    return existing.map(<[u8]>::to_vec);
                }
                None => fresh_id,
            };
            match serde_json::to_vec(&next) {
                Ok(bytes) => {
                    assigned = next.id;
                    Some(bytes)
                }
                Err(e) => {
                    failure = Some(e);
                    existing.map(<[u8]>::to_vec)
                }
            }
        })?;

        match failure {
            Some(e) => Err(e.into()),
            None => Ok(assigned),
        }
    }

    /// Get the row for a record in a locale.
    pub fn get(
        &self,
        base_table: &str,
        record_id: u64,
        locale: &str,
    ) -> Result<Option<ShadowRow>, Error> {
        let key = Self::build_key(&shadow_table_name(base_table), record_id, locale);
        match self.rows.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// All rows of one record, ordered by locale code.
    pub fn rows_for_record(
        &self,
        base_table: &str,
        record_id: u64,
    ) -> Result<Vec<ShadowRow>, Error> {
        let prefix = Self::record_prefix(&shadow_table_name(base_table), record_id);
        self.rows
            .scan_prefix(prefix)
            .map(|item| -> Result<ShadowRow, Error> {
                let (_, bytes) = item?;
                Ok(serde_json::from_slice(&bytes)?)
            })
            .collect()
    }

    /// Remove the row for a record in a locale.
    pub fn remove(
        &self,
        base_table: &str,
        record_id: u64,
        locale: &str,
    ) -> Result<Option<ShadowRow>, Error> {
        let key = Self::build_key(&shadow_table_name(base_table), record_id, locale);
        match self.rows.remove(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Number of rows in the shadow table of `base_table`.
    pub fn row_count(&self, base_table: &str) -> usize {
        self.rows
            .scan_prefix(Self::table_prefix(&shadow_table_name(base_table)))
            .count()
    }

    /// Resolve `field` of a record through a fallback chain.
    ///
    /// Returns the value of the first locale in `chain` holding a value, or
    /// `None` when the base table value applies. Null never counts as a
    /// value; for text columns neither does the empty string.
    pub fn resolve_value<S>(
        &self,
        base_table: &str,
        record_id: u64,
        chain: &[S],
        field: &str,
    ) -> Result<Option<Value>, Error>
    where
        S: AsRef<str>,
    {
        let Some(def) = self.table_definition(base_table)? else {
            return Ok(None);
        };
        let text = match def.column(field).map(|c| &c.kind) {
            Some(ColumnKind::Declared(field_type)) => field_type.is_text(),
            _ => return Ok(None),
        };

        for locale in chain {
            let Some(row) = self.get(base_table, record_id, locale.as_ref())? else {
                continue;
            };
            match row.values.get(field) {
                None | Some(Value::Null) => continue,
                Some(Value::String(s)) if text && s.is_empty() => continue,
                Some(value) => return Ok(Some(value.clone())),
            }
        }
        Ok(None)
    }

    /// Flush pending writes to disk.
    pub fn flush(&self) -> Result<(), Error> {
        self.rows.flush()?;
        self.tables.flush()?;
        Ok(())
    }
}

impl SchemaMigrator for ShadowStore {
    type Error = Error;

    fn require_table(&mut self, def: &ShadowTableDef) -> Result<(), Error> {
        self.tables
            .insert(def.table.as_bytes(), serde_json::to_vec(def)?)?;
        Ok(())
    }

    fn dont_require_table(&mut self, table: &str) -> Result<(), Error> {
        if self.tables.remove(table.as_bytes())?.is_none() {
            return Ok(());
        }

        let mut removed = 0u64;
        for item in self.rows.scan_prefix(Self::table_prefix(table)) {
            let (key, _) = item?;
            self.rows.remove(key)?;
            removed += 1;
        }
        info!(table, rows_removed = removed, "Dropped shadow table");
        Ok(())
    }
}
