//! Query rewriting for localized reads.
//!
//! [`QueryLocalizer`] adds one left join per localized table and fallback
//! locale to a query, and rewrites the selected localized fields to read
//! through those joins.

mod fallback;
mod localizer;
mod select;

pub use fallback::fallback_expression;
pub use localizer::{
    localised_alias, QueryContributor, QueryLocalizer, RewriteOutcome, SkipReason,
    LOCALE_QUERY_PARAM, LOCALISED_JOIN_PRIORITY,
};
pub use select::{
    column_ref, quote_identifier, Join, JoinKind, QueryBuilder, SelectColumn, SelectQuery,
    DEFAULT_JOIN_PRIORITY,
};
