//! A minimal SELECT builder with prioritized joins and bound parameters.

use std::collections::HashMap;

use tracing::{debug, trace};

/// Priority given to joins added without an explicit priority.
pub const DEFAULT_JOIN_PRIORITY: i32 = 20;

/// Quote an identifier, doubling embedded quotes.
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Quote a `table.column` reference.
pub fn column_ref(table: &str, column: &str) -> String {
    format!("{}.{}", quote_identifier(table), quote_identifier(column))
}

/// Join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
}

impl JoinKind {
    fn keyword(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
        }
    }
}

/// A join clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    pub kind: JoinKind,
    /// Joined table.
    pub table: String,
    /// Alias the table is joined under; unique within a query.
    pub alias: String,
    /// Join condition with `?` placeholders.
    pub on: String,
    /// Joins are emitted in ascending priority, ties in insertion order.
    pub priority: i32,
    /// Values bound to the placeholders of `on`, in order.
    pub params: Vec<String>,
}

/// A selected column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectColumn {
    /// A plain `"table"."field"` reference.
    Field { table: String, field: String },
    /// An arbitrary expression selected under an alias.
    Expression { sql: String, alias: String },
}

impl SelectColumn {
    fn render(&self) -> String {
        match self {
            SelectColumn::Field { table, field } => column_ref(table, field),
            SelectColumn::Expression { sql, alias } => {
                format!("{sql} AS {}", quote_identifier(alias))
            }
        }
    }
}

/// Query-building primitives the localizer needs from the host.
pub trait QueryBuilder {
    /// Class of the records this query returns.
    fn record_class(&self) -> &str;

    /// A query-level parameter, e.g. an explicit `Locale` override.
    fn parameter(&self, name: &str) -> Option<&str>;

    /// Add a left join. `params` bind the `?` placeholders of `on`.
    ///
    /// Returns whether `alias` now names this join: true when it was added or
    /// an identical join is already present, false when another join holds
    /// the alias.
    fn add_left_join(
        &mut self,
        table: &str,
        on: &str,
        alias: &str,
        priority: i32,
        params: Vec<String>,
    ) -> bool;

    /// Replace the selection of `table.field` with `expression`, keeping the
    /// field name as the result column. Returns false if the field is not
    /// selected.
    fn replace_field(&mut self, _table: &str, _field: &str, _expression: String) -> bool {
        false
    }
}

/// A SELECT over one record class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectQuery {
    class: String,
    from: String,
    columns: Vec<SelectColumn>,
    joins: Vec<Join>,
    conditions: Vec<(String, Vec<String>)>,
    parameters: HashMap<String, String>,
}

impl SelectQuery {
    /// Select records of `class` from its base table `from`.
    pub fn new(class: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            from: from.into(),
            columns: Vec::new(),
            joins: Vec::new(),
            conditions: Vec::new(),
            parameters: HashMap::new(),
        }
    }

    /// Select `table.field`.
    pub fn with_field(mut self, table: impl Into<String>, field: impl Into<String>) -> Self {
        self.columns.push(SelectColumn::Field {
            table: table.into(),
            field: field.into(),
        });
        self
    }

    /// Add an inner join at the default priority.
    pub fn with_inner_join(
        mut self,
        table: impl Into<String>,
        alias: impl Into<String>,
        on: impl Into<String>,
    ) -> Self {
        self.push_join(Join {
            kind: JoinKind::Inner,
            table: table.into(),
            alias: alias.into(),
            on: on.into(),
            priority: DEFAULT_JOIN_PRIORITY,
            params: Vec::new(),
        });
        self
    }

    /// Add a WHERE condition; conditions are AND-ed.
    pub fn with_condition<I, S>(mut self, sql: impl Into<String>, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conditions
            .push((sql.into(), params.into_iter().map(Into::into).collect()));
        self
    }

    /// Set a query-level parameter.
    pub fn with_parameter(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), value.into());
        self
    }

    /// Base table.
    pub fn from_table(&self) -> &str {
        &self.from
    }

    pub fn columns(&self) -> &[SelectColumn] {
        &self.columns
    }

    /// Joins in insertion order.
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    /// Get a join by alias.
    pub fn join(&self, alias: &str) -> Option<&Join> {
        self.joins.iter().find(|j| j.alias == alias)
    }

    /// Joins in emission order: ascending priority, ties in insertion order.
    pub fn ordered_joins(&self) -> Vec<&Join> {
        let mut ordered: Vec<&Join> = self.joins.iter().collect();
        ordered.sort_by_key(|j| j.priority);
        ordered
    }

    /// Render the SQL text and its bound parameters in placeholder order.
    pub fn to_sql(&self) -> (String, Vec<String>) {
        let mut params = Vec::new();

        let columns = if self.columns.is_empty() {
            format!("{}.*", quote_identifier(&self.from))
        } else {
            self.columns
                .iter()
                .map(SelectColumn::render)
                .collect::<Vec<_>>()
                .join(", ")
        };

        let mut sql = format!("SELECT {columns} FROM {}", quote_identifier(&self.from));

        for join in self.ordered_joins() {
            sql.push_str(&format!(
                " {} {} AS {} ON {}",
                join.kind.keyword(),
                quote_identifier(&join.table),
                quote_identifier(&join.alias),
                join.on
            ));
            params.extend(join.params.iter().cloned());
        }

        if !self.conditions.is_empty() {
            let clauses: Vec<String> = self
                .conditions
                .iter()
                .map(|(clause, _)| format!("({clause})"))
                .collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
            for (_, values) in &self.conditions {
                params.extend(values.iter().cloned());
            }
        }

        (sql, params)
    }

    fn push_join(&mut self, join: Join) -> bool {
        // Joins are additive: an alias that is already joined stays as it is.
        if let Some(existing) = self.join(&join.alias) {
            let same = existing.kind == join.kind
                && existing.table == join.table
                && existing.on == join.on
                && existing.params == join.params;
            if same {
                trace!(alias = %join.alias, "Join already present");
            } else {
                debug!(
                    alias = %join.alias,
                    table = %existing.table,
                    "Join alias taken by another join"
                );
            }
            return same;
        }
        self.joins.push(join);
        true
    }
}

impl QueryBuilder for SelectQuery {
    fn record_class(&self) -> &str {
        &self.class
    }

    fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    fn add_left_join(
        &mut self,
        table: &str,
        on: &str,
        alias: &str,
        priority: i32,
        params: Vec<String>,
    ) -> bool {
        self.push_join(Join {
            kind: JoinKind::Left,
            table: table.to_string(),
            alias: alias.to_string(),
            on: on.to_string(),
            priority,
            params,
        })
    }

    fn replace_field(&mut self, table: &str, field: &str, expression: String) -> bool {
        let position = self.columns.iter().position(|c| {
            matches!(c, SelectColumn::Field { table: t, field: f } if t == table && f == field)
        });

        match position {
            Some(idx) => {
                self.columns[idx] = SelectColumn::Expression {
                    sql: expression,
                    alias: field.to_string(),
                };
                true
            }
            None => false,
        }
    }
}
