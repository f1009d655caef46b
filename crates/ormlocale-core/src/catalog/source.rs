//! Schema introspection interface consumed from the host ORM.

use super::field::FieldSet;

/// Class and table metadata provided by the host ORM.
///
/// Implementations must be cheap to query; the localization schema calls
/// these methods at migration time and on every query rewrite that misses
/// the field-set cache.
pub trait SchemaSource {
    /// Database fields of `class`.
    ///
    /// With `include_inherited` false only the fields the class declares
    /// itself are returned; with it true, the fields of every ancestor are
    /// included as well.
    fn database_fields_of(&self, class: &str, include_inherited: bool) -> FieldSet;

    /// Name of the physical table backing `class`, if it has one.
    fn table_name_of(&self, class: &str) -> Option<String>;

    /// Check whether `class` owns a physical table.
    fn class_has_table(&self, class: &str) -> bool {
        self.table_name_of(class).is_some()
    }

    /// The class and all of its ancestors, root first, `class` last.
    fn ancestry_of(&self, class: &str) -> Vec<String>;

    /// Every class the host knows about.
    fn class_names(&self) -> Vec<String>;
}
