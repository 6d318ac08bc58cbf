//! PostgreSQL statement executor
//!
//! Implements the `StatementExecutor` seam over a sqlx connection pool:
//! renders the structured statements to SQL, binds parameters, runs them,
//! and converts result rows back into column-keyed value maps.

use std::time::Duration;

use async_trait::async_trait;
use entity_core::{
    EntityError, InsertStatement, MutationStatement, Row, RowPage, SelectStatement,
    StatementExecutor,
};
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::{Column, PgPool, Postgres, Row as SqlxRow, TypeInfo};
use tracing::error;

use crate::sql;

pub struct PgStatementExecutor {
    pool: PgPool,
}

impl PgStatementExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_rows(
        &self,
        rendered: (String, Vec<Value>),
        timeout: Option<Duration>,
    ) -> Result<Vec<PgRow>, EntityError> {
        let (text, params) = rendered;
        let query = bind_params(sqlx::query(&text), &params);
        with_timeout(timeout, query.fetch_all(&self.pool))
            .await?
            .map_err(|error| database_error("query", &text, error))
    }
}

#[async_trait]
impl StatementExecutor for PgStatementExecutor {
    async fn execute_query(&self, statement: &SelectStatement) -> Result<Vec<Row>, EntityError> {
        let rows = self
            .fetch_rows(sql::render_select(statement), statement.timeout)
            .await?;
        rows.iter().map(row_to_record).collect()
    }

    async fn execute_scalar_insert(
        &self,
        statement: &InsertStatement,
    ) -> Result<Value, EntityError> {
        let (text, params) = sql::render_insert(statement);
        let query = bind_params(sqlx::query(&text), &params);
        let row = with_timeout(statement.timeout, query.fetch_one(&self.pool))
            .await?
            .map_err(|error| database_error("scalar insert", &text, error))?;
        let record = row_to_record(&row)?;
        record
            .into_values()
            .next()
            .ok_or_else(|| EntityError::Database("insert returned no identity".to_string()))
    }

    async fn execute_mutation(&self, statement: &MutationStatement) -> Result<u64, EntityError> {
        let (text, params, timeout) = match statement {
            MutationStatement::Insert(insert) => {
                let (text, params) = sql::render_insert(insert);
                (text, params, insert.timeout)
            }
            MutationStatement::Update(update) => {
                let (text, params) = sql::render_update(update);
                (text, params, update.timeout)
            }
            MutationStatement::Delete(delete) => {
                let (text, params) = sql::render_delete(delete);
                (text, params, delete.timeout)
            }
        };
        let query = bind_params(sqlx::query(&text), &params);
        let result = with_timeout(timeout, query.execute(&self.pool))
            .await?
            .map_err(|error| database_error("mutation", &text, error))?;
        Ok(result.rows_affected())
    }

    async fn paginate(
        &self,
        statement: &SelectStatement,
        page: i64,
        page_size: i64,
    ) -> Result<RowPage, EntityError> {
        let (count_text, count_params) = sql::render_count(statement);
        let count_query = bind_params(sqlx::query(&count_text), &count_params);
        let count_row = with_timeout(statement.timeout, count_query.fetch_one(&self.pool))
            .await?
            .map_err(|error| database_error("count", &count_text, error))?;
        let total_count: i64 = count_row
            .try_get(0)
            .map_err(|error| database_error("count", &count_text, error))?;

        let rows = self
            .fetch_rows(sql::render_page(statement, page, page_size), statement.timeout)
            .await?;
        let rows = rows
            .iter()
            .map(row_to_record)
            .collect::<Result<Vec<Row>, EntityError>>()?;

        Ok(RowPage { rows, total_count })
    }
}

async fn with_timeout<F, T>(timeout: Option<Duration>, future: F) -> Result<T, EntityError>
where
    F: std::future::Future<Output = T>,
{
    match timeout {
        Some(deadline) => tokio::time::timeout(deadline, future)
            .await
            .map_err(|_| EntityError::Database("statement timed out".to_string())),
        None => Ok(future.await),
    }
}

fn database_error(operation: &str, sql: &str, error: sqlx::Error) -> EntityError {
    error!(operation, sql, %error, "statement failed");
    EntityError::Database(error.to_string())
}

fn bind_params<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    params: &'q [Value],
) -> Query<'q, Postgres, PgArguments> {
    for value in params {
        query = match value {
            // Nulls render inline, so this arm is unreachable in practice
            Value::Null => query.bind(Option::<String>::None),
            Value::Bool(flag) => query.bind(*flag),
            Value::Number(number) => {
                if let Some(integer) = number.as_i64() {
                    query.bind(integer)
                } else {
                    query.bind(number.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(text) => query.bind(text.as_str()),
            // Arrays and objects travel as jsonb
            other => query.bind(other.clone()),
        };
    }
    query
}

/// Convert one sqlx row into a column-keyed value map. Postgres reports
/// bare column names even for qualified projections, which is exactly the
/// key shape materialization expects.
fn row_to_record(row: &PgRow) -> Result<Row, EntityError> {
    let mut record = Row::with_capacity(row.columns().len());
    for column in row.columns() {
        let index = column.ordinal();
        let value = decode_column(row, index, column.type_info().name())
            .map_err(|error| {
                EntityError::Database(format!(
                    "column '{}' did not decode: {error}",
                    column.name()
                ))
            })?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Result<Value, sqlx::Error> {
    let value = match type_name {
        "BOOL" => row.try_get::<Option<bool>, _>(index)?.map(Value::from),
        "INT2" => row
            .try_get::<Option<i16>, _>(index)?
            .map(|v| Value::from(v as i64)),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)?
            .map(|v| Value::from(v as i64)),
        "INT8" => row.try_get::<Option<i64>, _>(index)?.map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)?
            .map(|v| Value::from(v as f64)),
        "FLOAT8" => row.try_get::<Option<f64>, _>(index)?.map(Value::from),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => {
            row.try_get::<Option<String>, _>(index)?.map(Value::from)
        }
        "UUID" => row
            .try_get::<Option<uuid::Uuid>, _>(index)?
            .map(|v| Value::from(v.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)?
            .map(|v| Value::from(v.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)?
            .map(|v| Value::from(v.to_string())),
        "DATE" => row
            .try_get::<Option<chrono::NaiveDate>, _>(index)?
            .map(|v| Value::from(v.to_string())),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index)?,
        _ => row.try_get::<Option<String>, _>(index)?.map(Value::from),
    };
    Ok(value.unwrap_or(Value::Null))
}
