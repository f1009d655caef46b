//! Error types.

use thiserror::Error;

/// ormlocale errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration or locale registration error.
    #[error(transparent)]
    Core(#[from] ormlocale_core::Error),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Storage(#[from] sled::Error),

    /// Row or definition (de)serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A shadow row for this record and locale already exists.
    #[error("duplicate shadow row in {table} for record {record_id}, locale {locale}")]
    UniqueViolation {
        /// Shadow table name.
        table: String,
        /// Base record ID.
        record_id: u64,
        /// Locale code.
        locale: String,
    },

    /// The shadow table has not been required by a migration.
    #[error("shadow table {0} does not exist")]
    UnknownTable(String),

    /// The row carries a value for a column the shadow table does not have.
    #[error("shadow table {table} has no localized column {column}")]
    UnknownColumn {
        /// Shadow table name.
        table: String,
        /// Offending column.
        column: String,
    },
}
