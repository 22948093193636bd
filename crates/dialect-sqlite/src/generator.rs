use std::fmt::Write as _;

use saveql_core::{
    BatchPosition, ColumnModification, DmlEmission, ModificationCommand, ResultSetMapping,
    delimit_identifier, delimit_table, parameter_placeholder, terminate_statement,
};

const ROWS_AFFECTED_SENTINEL: &str = "1";
const ROWID_IDENTIFIER: &str = "\"rowid\"";
const LAST_INSERT_ROWID_FUNCTION: &str = "last_insert_rowid()";
const CHANGES_FUNCTION: &str = "changes()";
const EXPECTED_ROWS_AFFECTED: u64 = 1;

pub(crate) fn append_insert_operation(
    returning_clause_available: bool,
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    if returning_clause_available && command.use_returning_clause() {
        append_insert_returning(sql, command, position)
    } else {
        append_insert_and_select(sql, command, position)
    }
}

pub(crate) fn append_update_operation(
    returning_clause_available: bool,
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    if returning_clause_available && command.use_returning_clause() {
        append_update_returning(sql, command, position)
    } else {
        append_update_and_select(sql, command, position)
    }
}

pub(crate) fn append_delete_operation(
    returning_clause_available: bool,
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    if returning_clause_available && command.use_returning_clause() {
        append_delete_returning(sql, command, position)
    } else {
        append_delete_and_select(sql, command, position)
    }
}

fn append_insert_returning(
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    append_insert_command(sql, command);
    let reads: Vec<&ColumnModification> = command.read_columns().collect();
    append_returning_clause(sql, &reads);
    terminate_statement(sql);

    single_statement(returning_mapping(&reads, position))
}

fn append_insert_and_select(
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    append_insert_command(sql, command);
    terminate_statement(sql);

    let reads: Vec<&ColumnModification> = command.read_columns().collect();
    let select_mapping = if reads.is_empty() {
        append_select_affected_count(sql)
    } else {
        append_select_affected(sql, command, &reads, &insert_key_anchors(command), position)
    };

    fallback_pair(select_mapping)
}

fn append_update_returning(
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    append_update_command(sql, command);
    let reads: Vec<&ColumnModification> = command.read_columns().collect();
    append_returning_clause(sql, &reads);
    terminate_statement(sql);

    single_statement(returning_mapping(&reads, position))
}

fn append_update_and_select(
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    append_update_command(sql, command);
    terminate_statement(sql);

    let reads: Vec<&ColumnModification> = command.read_columns().collect();
    let select_mapping = if reads.is_empty() {
        append_select_affected_count(sql)
    } else {
        append_select_affected(sql, command, &reads, &update_key_anchors(command), position)
    };

    fallback_pair(select_mapping)
}

fn append_delete_returning(
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    append_delete_command(sql, command);
    append_returning_clause(sql, &[]);
    terminate_statement(sql);

    single_statement(returning_mapping(&[], position))
}

fn append_delete_and_select(
    sql: &mut String,
    command: &ModificationCommand,
    position: BatchPosition,
) -> DmlEmission {
    append_delete_command(sql, command);
    terminate_statement(sql);

    let select_mapping = append_select_affected_count(sql);
    fallback_pair(select_mapping)
}

fn append_insert_command(sql: &mut String, command: &ModificationCommand) {
    let table = delimit_table(command.table());
    let writes: Vec<&ColumnModification> = command.write_columns().collect();

    if writes.is_empty() {
        write!(sql, "INSERT INTO {table} DEFAULT VALUES")
            .expect("writing to String should not fail");
        return;
    }

    let columns = writes
        .iter()
        .map(|column| delimit_identifier(column.name()))
        .collect::<Vec<_>>()
        .join(", ");
    let values = (0..writes.len())
        .map(parameter_placeholder)
        .collect::<Vec<_>>()
        .join(", ");
    write!(sql, "INSERT INTO {table} ({columns}) VALUES ({values})")
        .expect("writing to String should not fail");
}

fn append_update_command(sql: &mut String, command: &ModificationCommand) {
    let table = delimit_table(command.table());
    let assignments = command
        .write_columns()
        .enumerate()
        .map(|(index, column)| {
            format!(
                "{} = {}",
                delimit_identifier(column.name()),
                parameter_placeholder(index)
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    write!(sql, "UPDATE {table} SET {assignments} WHERE ")
        .expect("writing to String should not fail");
    append_condition_clause(sql, command);
}

fn append_delete_command(sql: &mut String, command: &ModificationCommand) {
    let table = delimit_table(command.table());
    write!(sql, "DELETE FROM {table} WHERE ").expect("writing to String should not fail");
    append_condition_clause(sql, command);
}

/// One conjunct per condition column, comparing against the column's
/// condition parameter (the value the caller read before modifying).
fn append_condition_clause(sql: &mut String, command: &ModificationCommand) {
    let base = command.write_columns().count();
    let conditions = command
        .condition_columns()
        .enumerate()
        .map(|(index, column)| where_condition(column, base + index))
        .collect::<Vec<_>>()
        .join(" AND ");
    sql.push_str(&conditions);
}

fn append_returning_clause(sql: &mut String, reads: &[&ColumnModification]) {
    if reads.is_empty() {
        // Sentinel so the caller can still verify exactly one row changed.
        write!(sql, " RETURNING {ROWS_AFFECTED_SENTINEL}")
            .expect("writing to String should not fail");
        return;
    }

    let columns = reads
        .iter()
        .map(|column| delimit_identifier(column.name()))
        .collect::<Vec<_>>()
        .join(", ");
    write!(sql, " RETURNING {columns}").expect("writing to String should not fail");
}

/// Follow-up SELECT of the fallback strategy: fetches the read columns of
/// the row just written, gated so it only returns data when the write
/// actually affected the expected number of rows.
fn append_select_affected(
    sql: &mut String,
    command: &ModificationCommand,
    reads: &[&ColumnModification],
    key_anchors: &[(&ColumnModification, Option<usize>)],
    position: BatchPosition,
) -> ResultSetMapping {
    let table = delimit_table(command.table());
    let columns = reads
        .iter()
        .map(|column| delimit_identifier(column.name()))
        .collect::<Vec<_>>()
        .join(", ");

    write!(sql, "SELECT {columns} FROM {table} WHERE ")
        .expect("writing to String should not fail");
    append_rows_affected_where_condition(sql, EXPECTED_ROWS_AFFECTED);

    for (key, parameter_index) in key_anchors {
        sql.push_str(" AND ");
        match parameter_index {
            Some(index) => sql.push_str(&where_condition(key, *index)),
            None => append_identity_where_condition(sql),
        }
    }
    terminate_statement(sql);

    row_data_mapping(position)
}

/// Key anchors for the insert fallback: a server-generated key is located
/// via the engine's last-insert-row identifier (its value is unknown to the
/// caller at this point), a client-supplied key via its write parameter.
fn insert_key_anchors(command: &ModificationCommand) -> Vec<(&ColumnModification, Option<usize>)> {
    let writes: Vec<&ColumnModification> = command.write_columns().collect();
    command
        .key_columns()
        .map(|key| {
            if key.is_read() {
                (key, None)
            } else {
                (key, writes.iter().position(|write| write.name() == key.name()))
            }
        })
        .collect()
}

/// Key anchors for the update fallback: keys reuse the condition parameter
/// they already carry in the UPDATE's WHERE clause.
fn update_key_anchors(command: &ModificationCommand) -> Vec<(&ColumnModification, Option<usize>)> {
    let base = command.write_columns().count();
    command
        .condition_columns()
        .enumerate()
        .filter(|(_, column)| column.is_key())
        .map(|(index, key)| {
            if key.is_read() {
                (key, None)
            } else {
                (key, Some(base + index))
            }
        })
        .collect()
}

/// Appends the session-level affected-row counter as its own statement.
/// Its result set is always the batch's last and carries only the count.
fn append_select_affected_count(sql: &mut String) -> ResultSetMapping {
    write!(sql, "SELECT {CHANGES_FUNCTION}").expect("writing to String should not fail");
    terminate_statement(sql);

    ResultSetMapping::LAST_IN_RESULT_SET | ResultSetMapping::ROWS_AFFECTED_ONLY
}

fn append_rows_affected_where_condition(sql: &mut String, expected_rows: u64) {
    write!(sql, "{CHANGES_FUNCTION} = {expected_rows}").expect("writing to String should not fail");
}

fn append_identity_where_condition(sql: &mut String) {
    write!(sql, "{ROWID_IDENTIFIER} = {LAST_INSERT_ROWID_FUNCTION}")
        .expect("writing to String should not fail");
}

fn where_condition(column: &ColumnModification, parameter_index: usize) -> String {
    format!(
        "{} = {}",
        delimit_identifier(column.name()),
        parameter_placeholder(parameter_index)
    )
}

fn returning_mapping(reads: &[&ColumnModification], position: BatchPosition) -> ResultSetMapping {
    if reads.is_empty() {
        row_data_mapping(position) | ResultSetMapping::ROWS_AFFECTED_ONLY
    } else {
        row_data_mapping(position)
    }
}

fn row_data_mapping(position: BatchPosition) -> ResultSetMapping {
    if position.is_final {
        ResultSetMapping::LAST_IN_RESULT_SET
    } else {
        ResultSetMapping::NOT_LAST_IN_RESULT_SET
    }
}

fn single_statement(mapping: ResultSetMapping) -> DmlEmission {
    DmlEmission {
        result_set_mappings: vec![mapping],
        requires_transaction: false,
    }
}

/// The INSERT/UPDATE/DELETE itself produces no result set; the follow-up
/// SELECT does. The pair must execute atomically because the session
/// counters it reads are clobbered by any interleaved statement.
fn fallback_pair(select_mapping: ResultSetMapping) -> DmlEmission {
    DmlEmission {
        result_set_mappings: vec![ResultSetMapping::NO_RESULT_SET, select_mapping],
        requires_transaction: true,
    }
}
