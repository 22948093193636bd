//! Identifier delimiting and statement formatting shared by dialect
//! generators. All identifiers are delimited unconditionally; embedded
//! quotes are doubled.

use crate::TableIdentity;

pub const STATEMENT_TERMINATOR: char = ';';

#[must_use]
pub fn delimit_identifier(identifier: &str) -> String {
    format!("\"{}\"", identifier.replace('"', "\"\""))
}

#[must_use]
pub fn delimit_table(table: &TableIdentity) -> String {
    match &table.schema {
        Some(schema) => format!(
            "{}.{}",
            delimit_identifier(schema),
            delimit_identifier(&table.name)
        ),
        None => delimit_identifier(&table.name),
    }
}

/// Placeholder for the `index`-th parameter of a command. Write columns are
/// numbered first in declaration order, condition columns after them.
#[must_use]
pub fn parameter_placeholder(index: usize) -> String {
    format!("@p{index}")
}

/// Ends the current statement and starts a new line, so a buffer holds one
/// statement per line in emission order.
pub fn terminate_statement(sql: &mut String) {
    sql.push(STATEMENT_TERMINATOR);
    sql.push('\n');
}
