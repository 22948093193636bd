use std::error::Error as StdError;

use thiserror::Error;

use crate::command::EntityOperation;

/// Validation failures raised at the boundary where [`crate::ModificationCommand`]
/// and [`crate::ColumnModification`] are constructed. Column roles are checked
/// once here and never re-validated per emission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("column modification has an empty name")]
    EmptyColumnName,
    #[error("column modification `{column}` must set at least one of key/condition/read/write")]
    InertColumn { column: String },
    #[error("{operation} on `{table}` requires at least one column modification")]
    MissingColumns {
        table: String,
        operation: EntityOperation,
    },
    #[error("{operation} on `{table}` requires at least one write column")]
    MissingWriteColumns {
        table: String,
        operation: EntityOperation,
    },
    #[error("{operation} on `{table}` requires at least one condition column")]
    MissingConditionColumns {
        table: String,
        operation: EntityOperation,
    },
    #[error("insert on `{table}` must not flag column `{column}` as a condition")]
    ConditionOnInsert { table: String, column: String },
    #[error("delete on `{table}` must not read or write column `{column}`")]
    ColumnValueOnDelete { table: String, column: String },
    #[error("key column `{column}` on `{table}` must be either written or read back")]
    UnboundKeyColumn { table: String, column: String },
    #[error(
        "insert on `{table}` reads generated columns but declares no key column to locate the row"
    )]
    MissingKeyForReadback { table: String },
    #[error("{operation} on `{table}` must flag key column `{column}` as a condition")]
    KeyNotCondition {
        table: String,
        operation: EntityOperation,
        column: String,
    },
}

/// A requested operation has no representation in the target dialect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("`{operation}` has no {dialect} representation: {reason}")]
    UnsupportedOperation {
        operation: String,
        dialect: String,
        reason: String,
    },
}

/// Construction-time failures of the capability probe. A generator cannot be
/// built without a parsed server version, so these are fatal to the caller.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to open {dialect} database `{database}`: {source}")]
    ConnectionFailed {
        dialect: String,
        database: String,
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("failed to query {dialect} server version: {source}")]
    VersionQueryFailed {
        dialect: String,
        source: Box<dyn StdError + Send + Sync>,
    },
    #[error("failed to parse {dialect} server version string `{raw}`")]
    VersionUnparsable { dialect: String, raw: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Command(#[from] CommandError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Probe(#[from] ProbeError),
}

pub type Result<T> = std::result::Result<T, Error>;
