use std::collections::BTreeMap;

use saveql_core::{
    BatchPosition, ColumnFlags, ColumnModification, DmlDialect, EntityOperation,
    ModificationCommand, TableIdentity,
};
use serde::Deserialize;

/// One declarative generator test: a command shape going in, the expected
/// buffer, result-set mappings, and transaction requirement coming out. An
/// `error` expectation replaces the output expectations for rejected shapes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TestCase {
    pub operation: String,
    pub table: String,
    pub schema: Option<String>,
    pub returning_clause: Option<bool>,
    pub columns: Vec<ColumnSpec>,
    pub ordinal: Option<usize>,
    pub is_final: Option<bool>,
    pub sql: Option<String>,
    pub mappings: Option<Vec<String>>,
    pub requires_transaction: Option<bool>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnSpec {
    pub name: String,
    pub key: bool,
    pub condition: bool,
    pub read: bool,
    pub write: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestResult {
    Passed,
    Failed(String),
}

pub fn load_test_cases_from_str(
    yaml: &str,
) -> std::result::Result<BTreeMap<String, TestCase>, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

pub fn run_generator_test(dialect: &dyn DmlDialect, test: &TestCase) -> TestResult {
    match run_test_flow(dialect, test) {
        Ok(()) => TestResult::Passed,
        Err(message) => TestResult::Failed(message),
    }
}

fn run_test_flow(dialect: &dyn DmlDialect, test: &TestCase) -> std::result::Result<(), String> {
    let command = match build_command(test) {
        Ok(command) => command,
        Err(actual_error) => return evaluate_expected_error(test, &actual_error),
    };

    let position = BatchPosition::new(
        test.ordinal.unwrap_or(0),
        test.is_final.unwrap_or(true),
    );

    let mut sql = String::new();
    let emission = match dialect.append_operation(&mut sql, &command, position) {
        Ok(emission) => emission,
        Err(error) => return evaluate_expected_error(test, &error.to_string()),
    };
    if let Some(expected_error) = &test.error {
        return Err(format!(
            "expected error: {expected_error}, but generation succeeded"
        ));
    }

    let mut regenerated = String::new();
    let regenerated_emission = dialect
        .append_operation(&mut regenerated, &command, position)
        .map_err(|error| error.to_string())?;
    if regenerated != sql || regenerated_emission != emission {
        return Err("generator output must be deterministic for equal commands".to_string());
    }

    if let Some(expected_sql) = &test.sql
        && expected_sql.trim() != sql.trim()
    {
        return Err(format!(
            "SQL mismatch; expected:\n{expected_sql}\nactual:\n{sql}"
        ));
    }

    if let Some(expected_mappings) = &test.mappings {
        let actual = emission
            .result_set_mappings
            .iter()
            .map(|mapping| format!("{mapping:?}"))
            .collect::<Vec<_>>();
        if &actual != expected_mappings {
            return Err(format!(
                "mapping mismatch; expected {expected_mappings:?}, actual {actual:?}"
            ));
        }
    }

    if let Some(expected) = test.requires_transaction
        && emission.requires_transaction != expected
    {
        return Err(format!(
            "requires_transaction mismatch; expected {expected}, actual {}",
            emission.requires_transaction
        ));
    }

    Ok(())
}

fn evaluate_expected_error(test: &TestCase, actual_error: &str) -> std::result::Result<(), String> {
    match test.error.as_deref() {
        Some(expected_error) if expected_error == actual_error => Ok(()),
        Some(expected_error) => Err(format!(
            "expected error: {expected_error}, but got: {actual_error}"
        )),
        None => Err(format!("unexpected error: {actual_error}")),
    }
}

fn build_command(test: &TestCase) -> std::result::Result<ModificationCommand, String> {
    let operation = parse_operation(&test.operation)?;
    let table = match &test.schema {
        Some(schema) => TableIdentity::schema_qualified(schema.clone(), test.table.clone()),
        None => TableIdentity::named(test.table.clone()),
    };

    let mut columns = Vec::with_capacity(test.columns.len());
    for spec in &test.columns {
        let column = ColumnModification::new(
            spec.name.clone(),
            ColumnFlags {
                key: spec.key,
                condition: spec.condition,
                read: spec.read,
                write: spec.write,
            },
        )
        .map_err(|error| error.to_string())?;
        columns.push(column);
    }

    ModificationCommand::new(
        table,
        operation,
        columns,
        test.returning_clause.unwrap_or(true),
    )
    .map_err(|error| error.to_string())
}

fn parse_operation(raw: &str) -> std::result::Result<EntityOperation, String> {
    match raw {
        "insert" => Ok(EntityOperation::Insert),
        "update" => Ok(EntityOperation::Update),
        "delete" => Ok(EntityOperation::Delete),
        other => Err(format!("unknown operation `{other}`")),
    }
}
