//! End-to-end tests: derived entities driving the query builder against
//! an in-memory executor that honors filters, mutations and pagination.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use rowhaus::async_trait::async_trait;
use rowhaus::entity_core::{
    CompareOp, EntityError, EntityQuery, FilterTerm, FilterValue, InsertStatement,
    MutationStatement, Row, RowPage, SelectStatement, StatementExecutor,
};
use rowhaus::entity_derive::Entity;
use serde_json::{json, Value};

#[derive(Debug, Default, PartialEq, Entity)]
#[table(name = "users")]
pub struct User {
    #[field(name = "id")]
    #[auto_increment]
    pub id: i64,

    #[field(name = "user_name")]
    pub name: String,

    #[field]
    pub active: bool,

    // no marker: invisible to queries
    pub nickname: String,
}

/// Table of rows behind the executor seam, with naive predicate
/// evaluation. Joins are not supported; tests here stay single-table.
#[derive(Default)]
struct MemoryExecutor {
    rows: Mutex<Vec<Row>>,
    next_id: AtomicI64,
}

impl MemoryExecutor {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            next_id: AtomicI64::new(1),
        })
    }

    fn seed(&self, rows: Vec<Row>) {
        *self.rows.lock().unwrap() = rows;
    }

    fn assign_id(&self, row: &mut Row) -> i64 {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        row.insert("id".to_string(), json!(id));
        id
    }

    fn matching(&self, filters: &[FilterTerm]) -> Vec<Row> {
        self.rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| filters.iter().all(|term| matches(row, term)))
            .cloned()
            .collect()
    }
}

fn matches(row: &Row, term: &FilterTerm) -> bool {
    let actual = row.get(term.column.column).cloned().unwrap_or(Value::Null);
    if term.operator == CompareOp::Eq {
        return actual == term.value;
    }
    let (Some(lhs), Some(rhs)) = (actual.as_f64(), term.value.as_f64()) else {
        return false;
    };
    match term.operator {
        CompareOp::Gt => lhs > rhs,
        CompareOp::Gte => lhs >= rhs,
        CompareOp::Lt => lhs < rhs,
        CompareOp::Lte => lhs <= rhs,
        CompareOp::Eq => unreachable!(),
    }
}

fn insert_rows(statement: &InsertStatement) -> Vec<Row> {
    statement
        .rows
        .iter()
        .map(|values| {
            statement
                .columns
                .iter()
                .zip(values)
                .map(|(column, value)| (column.to_string(), value.clone()))
                .collect()
        })
        .collect()
}

#[async_trait]
impl StatementExecutor for MemoryExecutor {
    async fn execute_query(&self, statement: &SelectStatement) -> Result<Vec<Row>, EntityError> {
        let mut rows = self.matching(&statement.filters);
        if let Some(limit) = statement.limit {
            rows.truncate(limit as usize);
        }
        Ok(rows)
    }

    async fn execute_scalar_insert(
        &self,
        statement: &InsertStatement,
    ) -> Result<Value, EntityError> {
        let mut row = insert_rows(statement)
            .into_iter()
            .next()
            .ok_or_else(|| EntityError::Database("empty insert".to_string()))?;
        let id = self.assign_id(&mut row);
        self.rows.lock().unwrap().push(row);
        Ok(json!(id))
    }

    async fn execute_mutation(&self, statement: &MutationStatement) -> Result<u64, EntityError> {
        match statement {
            MutationStatement::Insert(insert) => {
                let mut affected = 0;
                for mut row in insert_rows(insert) {
                    self.assign_id(&mut row);
                    self.rows.lock().unwrap().push(row);
                    affected += 1;
                }
                Ok(affected)
            }
            MutationStatement::Update(update) => {
                let mut rows = self.rows.lock().unwrap();
                let mut affected = 0;
                for row in rows
                    .iter_mut()
                    .filter(|row| update.filters.iter().all(|term| matches(row, term)))
                {
                    for (column, value) in &update.assignments {
                        row.insert(column.to_string(), value.clone());
                    }
                    affected += 1;
                }
                Ok(affected)
            }
            MutationStatement::Delete(delete) => {
                let mut rows = self.rows.lock().unwrap();
                let before = rows.len();
                rows.retain(|row| !delete.filters.iter().all(|term| matches(row, term)));
                Ok((before - rows.len()) as u64)
            }
        }
    }

    async fn paginate(
        &self,
        statement: &SelectStatement,
        page: i64,
        page_size: i64,
    ) -> Result<RowPage, EntityError> {
        let rows = self.matching(&statement.filters);
        let total_count = rows.len() as i64;
        let start = ((page - 1) * page_size) as usize;
        let rows = rows
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .collect();
        Ok(RowPage { rows, total_count })
    }
}

fn user(name: &str, active: bool) -> User {
    User {
        id: 0,
        name: name.to_string(),
        active,
        nickname: String::new(),
    }
}

#[tokio::test]
async fn insert_then_query_round_trips() {
    let executor = MemoryExecutor::new();
    let mut query = EntityQuery::<User, _>::new(executor.clone()).unwrap();

    let anna_id: i64 = query.insert_returning_id(&user("anna", true)).await.unwrap();
    let bert_id: i64 = query.insert_returning_id(&user("bert", false)).await.unwrap();
    assert_eq!(anna_id, 1);
    assert_eq!(bert_id, 2);

    query
        .filter(vec![("active", FilterValue::scalar(true))])
        .unwrap();
    let active = query.get().await.unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0].name, "anna");
    assert_eq!(active[0].id, 1);
    // Unmapped properties never round-trip
    assert_eq!(active[0].nickname, "");
}

#[tokio::test]
async fn integer_flags_coerce_to_booleans() {
    let executor = MemoryExecutor::new();
    executor.seed(vec![
        [
            ("id".to_string(), json!(1)),
            ("user_name".to_string(), json!("kim")),
            ("active".to_string(), json!(1)),
        ]
        .into_iter()
        .collect(),
        [
            ("id".to_string(), json!(2)),
            ("user_name".to_string(), json!("lee")),
            ("active".to_string(), json!(0)),
        ]
        .into_iter()
        .collect(),
    ]);

    let mut query = EntityQuery::<User, _>::new(executor).unwrap();
    let users = query.get().await.unwrap();
    assert!(users[0].active);
    assert!(!users[1].active);
}

#[tokio::test]
async fn comparison_filters_narrow_the_result() {
    let executor = MemoryExecutor::new();
    let mut query = EntityQuery::<User, _>::new(executor).unwrap();
    let names = ["a", "b", "c", "d", "e"];
    let batch: Vec<User> = names.iter().map(|name| user(name, true)).collect();
    assert_eq!(query.insert_many(&batch).await.unwrap(), 5);

    query.filter(vec![("id", FilterValue::gte(3))]).unwrap();
    query.filter(vec![("id", FilterValue::lt(5))]).unwrap();
    let middle = query.get().await.unwrap();
    assert_eq!(
        middle.iter().map(|u| u.id).collect::<Vec<_>>(),
        vec![3, 4]
    );
}

#[tokio::test]
async fn pagination_windows_and_counts() {
    let executor = MemoryExecutor::new();
    let mut query = EntityQuery::<User, _>::new(executor).unwrap();
    let batch: Vec<User> = (0..25).map(|i| user(&format!("user{i}"), true)).collect();
    query.insert_many(&batch).await.unwrap();

    let page = query.paginate(2, 10).await.unwrap();
    assert_eq!(page.total_count, 25);
    assert_eq!(page.items.len(), 10);
    assert_eq!(page.items.first().map(|u| u.id), Some(11));
    assert_eq!(page.items.last().map(|u| u.id), Some(20));
    assert_eq!(page.page_count(), 3);
}

#[tokio::test]
async fn update_and_delete_respect_filters() {
    let executor = MemoryExecutor::new();
    let mut query = EntityQuery::<User, _>::new(executor).unwrap();
    query.insert(&user("anna", true)).await.unwrap();
    query.insert(&user("bert", true)).await.unwrap();

    query.filter(vec![("id", FilterValue::scalar(1))]).unwrap();
    let affected = query
        .update(vec![("active", json!(false))])
        .await
        .unwrap();
    assert_eq!(affected, 1);

    query
        .filter(vec![("active", FilterValue::scalar(false))])
        .unwrap();
    let inactive = query.first_or_default().await.unwrap();
    assert_eq!(inactive.map(|u| u.name), Some("anna".to_string()));

    query.filter(vec![("id", FilterValue::scalar(2))]).unwrap();
    assert_eq!(query.delete().await.unwrap(), 1);

    query
        .filter(vec![("name", FilterValue::scalar("bert"))])
        .unwrap();
    assert!(!query.exists().await.unwrap());
}
