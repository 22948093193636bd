#[allow(dead_code)]
#[path = "support/command_fixtures.rs"]
mod command_fixtures;

use command_fixtures::version;
use saveql_core::{DmlDialect, Error, GenerateError};
use saveql_dialect_sqlite::SqliteDmlDialect;

#[test]
fn sequence_next_value_is_rejected_without_emitting_sql() {
    let dialect = SqliteDmlDialect::new(&version(3, 45, 1));

    let mut sql = String::new();
    let error = dialect
        .append_next_sequence_value(&mut sql, "order_ids", None)
        .expect_err("sequence generation must be rejected");

    match error {
        Error::Generate(GenerateError::UnsupportedOperation {
            operation,
            dialect,
            reason,
        }) => {
            assert!(operation.contains("order_ids"));
            assert_eq!(dialect, "sqlite");
            assert!(reason.contains("no server-side sequence objects"));
        }
        other => panic!("expected unsupported operation error, got {other:?}"),
    }
    assert!(sql.is_empty(), "no SQL may be produced for a rejected operation");
}

#[test]
fn sequence_rejection_is_independent_of_capability() {
    let dialect = SqliteDmlDialect::new(&version(3, 34, 1));

    let mut sql = String::new();
    let error = dialect
        .append_next_sequence_value(&mut sql, "order_ids", Some("main"))
        .expect_err("sequence generation must be rejected");

    assert!(error.to_string().contains("main.order_ids"));
    assert!(sql.is_empty());
}
