//! End-to-end builder flows against the recording executor.

use std::time::Duration;

use serde_json::json;

use crate::errors::EntityError;
use crate::resolver::FilterValue;

use super::tests::{user_row, MockExecutor, Recorded, User};
use super::EntityQuery;

#[tokio::test]
async fn rows_materialize_with_boolean_coercion() {
    let executor = MockExecutor::with_rows(vec![
        user_row(1, "anna", json!(1)),
        user_row(2, "bert", json!(0)),
        user_row(3, "carol", serde_json::Value::Null),
    ]);
    let mut query = EntityQuery::<User, _>::new(executor).unwrap();
    let users = query.get().await.unwrap();

    assert_eq!(users.len(), 3);
    assert!(users[0].active);
    assert!(!users[1].active);
    assert!(!users[2].active);
    assert_eq!(users[1].name, "bert");
    // Unmapped properties come back defaulted
    assert_eq!(users[0].scratch, "");
}

#[tokio::test]
async fn unmapped_filter_fails_then_the_corrected_query_runs() {
    let executor = MockExecutor::with_rows(vec![user_row(1, "anna", json!(true))]);
    let mut query = EntityQuery::<User, _>::new(executor.clone()).unwrap();

    let error = query
        .filter(vec![("Scratch", FilterValue::scalar("x"))])
        .err()
        .unwrap();
    assert!(matches!(error, EntityError::NotAField { .. }));

    query
        .filter(vec![("Name", FilterValue::scalar("anna"))])
        .unwrap();
    let users = query.get().await.unwrap();
    assert_eq!(users.len(), 1);

    // Only the corrected statement reached the executor
    let recorded = executor.recorded();
    assert_eq!(recorded.len(), 1);
    match &recorded[0] {
        Recorded::Select(statement) => {
            assert_eq!(statement.filters.len(), 1);
            assert_eq!(statement.filters[0].column.to_string(), "users.user_name");
        }
        other => panic!("expected a select, got {other:?}"),
    }
}

#[tokio::test]
async fn materialization_failure_keeps_builder_state() {
    // Rows missing the user_name column fail materialization
    let broken: crate::Row = [
        ("id".to_string(), json!(1)),
        ("active".to_string(), json!(true)),
    ]
    .into_iter()
    .collect();
    let executor = MockExecutor::with_rows(vec![broken]);
    let mut query = EntityQuery::<User, _>::new(executor.clone()).unwrap();
    query
        .filter(vec![("Active", FilterValue::scalar(true))])
        .unwrap();

    let error = query.get().await.unwrap_err();
    assert!(matches!(error, EntityError::MissingColumn { .. }));

    // Same builder, same filter: only success resets
    *executor.rows.lock().unwrap() = vec![user_row(1, "anna", json!(true))];
    let users = query.get().await.unwrap();
    assert_eq!(users.len(), 1);

    let recorded = executor.recorded();
    assert_eq!(recorded.len(), 2);
    for recorded in &recorded {
        match recorded {
            Recorded::Select(statement) => assert_eq!(statement.filters.len(), 1),
            other => panic!("expected selects only, got {other:?}"),
        }
    }

    query.get().await.unwrap();
    match executor.recorded().last() {
        Some(Recorded::Select(statement)) => assert!(statement.filters.is_empty()),
        other => panic!("expected a select, got {other:?}"),
    }
}

#[tokio::test]
async fn command_timeout_rides_on_every_statement() {
    let executor = MockExecutor::with_rows(vec![]);
    let mut query = EntityQuery::<User, _>::new(executor.clone())
        .unwrap()
        .with_command_timeout(Duration::from_secs(5));

    query.get().await.unwrap();
    query.delete().await.unwrap();

    for recorded in executor.recorded() {
        let timeout = match recorded {
            Recorded::Select(statement) => statement.timeout,
            Recorded::Mutation(crate::statement::MutationStatement::Delete(statement)) => {
                statement.timeout
            }
            other => panic!("unexpected statement {other:?}"),
        };
        assert_eq!(timeout, Some(Duration::from_secs(5)));
    }
}

#[tokio::test]
async fn paginate_materializes_the_returned_page() {
    let executor = MockExecutor::with_rows(vec![
        user_row(11, "kim", json!(true)),
        user_row(12, "lee", json!(false)),
    ]);
    *executor.total_count.lock().unwrap() = 25;
    let mut query = EntityQuery::<User, _>::new(executor).unwrap();
    let page = query.paginate(2, 10).await.unwrap();

    assert_eq!(page.items.len(), 2);
    assert_eq!(page.items[0].id, 11);
    assert_eq!(page.total_count, 25);
    assert_eq!(page.page_count(), 3);
}

#[tokio::test]
async fn delete_without_filters_targets_the_whole_table() {
    let executor = MockExecutor::with_rows(vec![]);
    let mut query = EntityQuery::<User, _>::new(executor.clone()).unwrap();
    query.delete().await.unwrap();

    match &executor.recorded()[0] {
        Recorded::Mutation(crate::statement::MutationStatement::Delete(statement)) => {
            assert_eq!(statement.table, "users");
            assert!(statement.filters.is_empty());
        }
        other => panic!("expected a delete, got {other:?}"),
    }
}
