//! SQL rendering for PostgreSQL
//!
//! Turns the structured statements from `entity_core` into parameterized
//! SQL with `$n` placeholders. Identifiers were validated when the entity
//! metadata was built, so they interpolate directly; every value travels
//! as a bind parameter, except literal NULLs which render inline to stay
//! typeless.

use entity_core::{
    DeleteStatement, FilterTerm, InsertStatement, SelectStatement, UpdateStatement,
};
use serde_json::Value;

/// A rendered statement: SQL text plus bind values in placeholder order.
pub(crate) type RenderedSql = (String, Vec<Value>);

pub(crate) fn render_select(statement: &SelectStatement) -> RenderedSql {
    let columns: Vec<String> = statement
        .columns
        .iter()
        .map(|column| column.to_string())
        .collect();
    let mut sql = format!("SELECT {} FROM {}", columns.join(", "), statement.table);
    push_joins(&mut sql, statement);

    let mut params = Vec::new();
    push_where(&mut sql, &mut params, &statement.filters);
    push_order(&mut sql, statement);

    if let Some(limit) = statement.limit {
        sql.push_str(&format!(" LIMIT {limit}"));
    }

    (sql, params)
}

/// Same filters and joins as the select, projected to a match count.
pub(crate) fn render_count(statement: &SelectStatement) -> RenderedSql {
    let mut sql = format!("SELECT COUNT(*) FROM {}", statement.table);
    push_joins(&mut sql, statement);

    let mut params = Vec::new();
    push_where(&mut sql, &mut params, &statement.filters);

    (sql, params)
}

/// The select windowed to one page. `page` is 1-based and pre-clamped.
/// The window owns the row cap, so any limit already on the statement
/// is discarded rather than rendered twice.
pub(crate) fn render_page(statement: &SelectStatement, page: i64, page_size: i64) -> RenderedSql {
    let mut windowed = statement.clone();
    windowed.limit = None;
    let (mut sql, params) = render_select(&windowed);
    let offset = (page - 1) * page_size;
    sql.push_str(&format!(" LIMIT {page_size} OFFSET {offset}"));
    (sql, params)
}

pub(crate) fn render_insert(statement: &InsertStatement) -> RenderedSql {
    if statement.columns.is_empty() {
        let mut sql = format!("INSERT INTO {} DEFAULT VALUES", statement.table);
        if let Some(identity) = statement.returning {
            sql.push_str(&format!(" RETURNING {identity}"));
        }
        return (sql, Vec::new());
    }

    let mut sql = format!(
        "INSERT INTO {} ({}) VALUES ",
        statement.table,
        statement.columns.join(", ")
    );
    let mut params = Vec::new();

    let mut tuples = Vec::with_capacity(statement.rows.len());
    for row in &statement.rows {
        let mut placeholders = Vec::with_capacity(row.len());
        for value in row {
            placeholders.push(bind_or_null(&mut params, value));
        }
        tuples.push(format!("({})", placeholders.join(", ")));
    }
    sql.push_str(&tuples.join(", "));

    if let Some(identity) = statement.returning {
        sql.push_str(&format!(" RETURNING {identity}"));
    }

    (sql, params)
}

pub(crate) fn render_update(statement: &UpdateStatement) -> RenderedSql {
    let mut params = Vec::new();
    let mut assignments = Vec::with_capacity(statement.assignments.len());
    for (column, value) in &statement.assignments {
        let rhs = bind_or_null(&mut params, value);
        assignments.push(format!("{column} = {rhs}"));
    }

    let mut sql = format!(
        "UPDATE {} SET {}",
        statement.table,
        assignments.join(", ")
    );
    push_where(&mut sql, &mut params, &statement.filters);

    (sql, params)
}

pub(crate) fn render_delete(statement: &DeleteStatement) -> RenderedSql {
    let mut sql = format!("DELETE FROM {}", statement.table);
    let mut params = Vec::new();
    push_where(&mut sql, &mut params, &statement.filters);
    (sql, params)
}

fn push_joins(sql: &mut String, statement: &SelectStatement) {
    for join in &statement.joins {
        sql.push_str(&format!(
            " INNER JOIN {} ON {} = {}",
            join.table, join.left, join.right
        ));
    }
}

fn push_order(sql: &mut String, statement: &SelectStatement) {
    if statement.order.is_empty() {
        return;
    }
    let terms: Vec<String> = statement
        .order
        .iter()
        .map(|term| format!("{} {}", term.column, term.direction.to_sql()))
        .collect();
    sql.push_str(&format!(" ORDER BY {}", terms.join(", ")));
}

fn push_where(sql: &mut String, params: &mut Vec<Value>, filters: &[FilterTerm]) {
    if filters.is_empty() {
        return;
    }
    let mut predicates = Vec::with_capacity(filters.len());
    for term in filters {
        predicates.push(render_predicate(params, term));
    }
    sql.push_str(&format!(" WHERE {}", predicates.join(" AND ")));
}

fn render_predicate(params: &mut Vec<Value>, term: &FilterTerm) -> String {
    use entity_core::CompareOp;

    if term.value.is_null() {
        // Equality against null means IS NULL; an ordered comparison
        // against null can never match.
        return match term.operator {
            CompareOp::Eq => format!("{} IS NULL", term.column),
            _ => "1=0".to_string(),
        };
    }

    let placeholder = push_param(params, term.value.clone());
    format!("{} {} {}", term.column, term.operator.to_sql(), placeholder)
}

fn bind_or_null(params: &mut Vec<Value>, value: &Value) -> String {
    if value.is_null() {
        "NULL".to_string()
    } else {
        push_param(params, value.clone())
    }
}

fn push_param(params: &mut Vec<Value>, value: Value) -> String {
    params.push(value);
    format!("${}", params.len())
}
