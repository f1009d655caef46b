//! Record class metadata.
//!
//! The catalog describes record classes, their ancestry, their tables and the
//! database fields each class declares. Hosts expose their own metadata
//! through [`SchemaSource`]; [`ClassCatalog`] is the in-memory implementation.

mod catalog;
mod class;
mod field;
mod source;
mod types;

pub use catalog::ClassCatalog;
pub use class::ClassDef;
pub use field::{FieldDef, FieldSet};
pub use source::SchemaSource;
pub use types::{base_type, FieldType};
