//! Field-selection layer over the localization joins.

use super::select::column_ref;
use crate::catalog::FieldDef;

/// Expression reading `field` through a fallback chain of shadow aliases.
///
/// The first alias, in chain order, holding a value wins; the base table
/// column is the last resort. NULL never counts as a value, and for text
/// types neither does the empty string.
pub fn fallback_expression(base_table: &str, field: &FieldDef, aliases: &[String]) -> String {
    let base = column_ref(base_table, &field.name);
    if aliases.is_empty() {
        return base;
    }

    let text = field.field_type.is_text();
    let mut sql = String::from("CASE");
    for alias in aliases {
        let column = column_ref(alias, &field.name);
        if text {
            sql.push_str(&format!(
                " WHEN {column} IS NOT NULL AND {column} != '' THEN {column}"
            ));
        } else {
            sql.push_str(&format!(" WHEN {column} IS NOT NULL THEN {column}"));
        }
    }
    sql.push_str(&format!(" ELSE {base} END"));
    sql
}
