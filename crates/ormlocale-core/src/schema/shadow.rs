//! Shadow table definitions.

use serde::{Deserialize, Serialize};

use crate::catalog::{FieldSet, FieldType};

/// Suffix appended to a base table name to form its shadow table name.
pub const SHADOW_TABLE_SUFFIX: &str = "Localised";

/// Primary key column of a shadow table.
pub const ID_COLUMN: &str = "ID";

/// Column referencing the base table's `ID`.
pub const RECORD_ID_COLUMN: &str = "RecordID";

/// Column holding the locale code of a shadow row.
pub const LOCALE_COLUMN: &str = "Locale";

/// Maximum length of a locale code.
pub const LOCALE_CODE_MAX_LEN: usize = 10;

/// Columns every shadow table carries itself; never localized.
pub const RESERVED_COLUMNS: [&str; 3] = [ID_COLUMN, RECORD_ID_COLUMN, LOCALE_COLUMN];

/// Check whether `name` is one of the [`RESERVED_COLUMNS`].
pub fn is_reserved_column(name: &str) -> bool {
    RESERVED_COLUMNS.contains(&name)
}

/// Name of the shadow table for `base_table`, e.g. `Page_Localised`.
pub fn shadow_table_name(base_table: &str) -> String {
    format!("{base_table}_{SHADOW_TABLE_SUFFIX}")
}

/// Column type of a shadow table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// Auto-assigned primary key.
    PrimaryKey,
    /// Integer reference to a base record.
    Integer,
    /// String of at most this many characters.
    BoundedString(usize),
    /// Same declared type as the base table column.
    Declared(FieldType),
}

/// A column of a shadow table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowColumn {
    pub name: String,
    pub kind: ColumnKind,
}

impl ShadowColumn {
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// An index on a shadow table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowIndex {
    /// Index name.
    pub name: String,
    /// Indexed columns, in order.
    pub columns: Vec<String>,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
}

/// Definition of the `<Table>_Localised` table for one base table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShadowTableDef {
    /// Base table the shadow rows belong to.
    pub base_table: String,
    /// Shadow table name.
    pub table: String,
    /// Columns: `ID`, `RecordID`, `Locale`, then the localized fields.
    pub columns: Vec<ShadowColumn>,
    /// Indexes; always a unique `(RecordID, Locale)` index.
    pub indexes: Vec<ShadowIndex>,
}

impl ShadowTableDef {
    /// Build the definition for `base_table` holding `localized` fields.
    ///
    /// Fields named like a [reserved column](RESERVED_COLUMNS) are skipped.
    pub fn new(base_table: impl Into<String>, localized: &FieldSet) -> Self {
        let base_table = base_table.into();

        let mut columns = vec![
            ShadowColumn::new(ID_COLUMN, ColumnKind::PrimaryKey),
            ShadowColumn::new(RECORD_ID_COLUMN, ColumnKind::Integer),
            ShadowColumn::new(LOCALE_COLUMN, ColumnKind::BoundedString(LOCALE_CODE_MAX_LEN)),
        ];
        columns.extend(
            localized
                .iter()
                .filter(|f| !is_reserved_column(&f.name))
                .map(|f| {
                    ShadowColumn::new(f.name.clone(), ColumnKind::Declared(f.field_type.clone()))
                }),
        );

        let indexes = vec![ShadowIndex {
            name: format!("{RECORD_ID_COLUMN}_{LOCALE_COLUMN}"),
            columns: vec![RECORD_ID_COLUMN.to_string(), LOCALE_COLUMN.to_string()],
            unique: true,
        }];

        Self {
            table: shadow_table_name(&base_table),
            base_table,
            columns,
            indexes,
        }
    }

    /// Get a column by name.
    pub fn column(&self, name: &str) -> Option<&ShadowColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns holding localized field values.
    pub fn localized_columns(&self) -> impl Iterator<Item = &ShadowColumn> {
        self.columns
            .iter()
            .filter(|c| matches!(c.kind, ColumnKind::Declared(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shadow_table_name() {
        assert_eq!(shadow_table_name("Page"), "Page_Localised");
    }

    #[test]
    fn test_definition_layout() {
        let fields = FieldSet::new()
            .with("Title", "Varchar(255)")
            .with("Content", "HTMLText");
        let def = ShadowTableDef::new("SiteTree", &fields);

        assert_eq!(def.table, "SiteTree_Localised");
        let names: Vec<&str> = def.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "RecordID", "Locale", "Title", "Content"]);

        assert_eq!(
            def.column("Locale").unwrap().kind,
            ColumnKind::BoundedString(LOCALE_CODE_MAX_LEN)
        );
        assert_eq!(
            def.column("Title").unwrap().kind,
            ColumnKind::Declared(FieldType::new("Varchar(255)"))
        );
        assert_eq!(def.localized_columns().count(), 2);

        assert_eq!(def.indexes.len(), 1);
        assert!(def.indexes[0].unique);
        assert_eq!(def.indexes[0].columns, vec!["RecordID", "Locale"]);
    }

    #[test]
    fn test_reserved_names_not_duplicated() {
        let fields = FieldSet::new()
            .with("ID", "Int")
            .with("Locale", "Varchar(10)")
            .with("Title", "Varchar(255)");
        let def = ShadowTableDef::new("Page", &fields);

        let names: Vec<&str> = def.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["ID", "RecordID", "Locale", "Title"]);
        assert_eq!(def.column("ID").unwrap().kind, ColumnKind::PrimaryKey);
    }
}
