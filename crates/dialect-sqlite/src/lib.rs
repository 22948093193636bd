mod adapter;
mod generator;

pub use adapter::{SqliteAdapter, connect};

use saveql_core::{
    BatchPosition, DatabaseAdapter, DmlDialect, DmlEmission, GenerateError, ModificationCommand,
    Result, Version,
};

const DIALECT_NAME: &str = "sqlite";

// RETURNING was introduced in SQLite 3.35.0. Targets of other engines must
// substitute that engine's own feature-availability rule here.
const RETURNING_MINIMUM_MAJOR_VERSION: u16 = 3;
const RETURNING_MINIMUM_MINOR_VERSION: u16 = 35;

/// DML generator for SQLite. Whether the engine can return affected-row
/// data inline is decided once, from the server version captured at
/// construction, and never re-checked per statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqliteDmlDialect {
    returning_clause_available: bool,
}

impl SqliteDmlDialect {
    #[must_use]
    pub fn new(server_version: &Version) -> Self {
        Self {
            returning_clause_available: supports_returning_clause(server_version),
        }
    }

    pub fn from_adapter(adapter: &dyn DatabaseAdapter) -> Result<Self> {
        Ok(Self::new(&adapter.server_version()?))
    }

    #[must_use]
    pub const fn returning_clause_available(&self) -> bool {
        self.returning_clause_available
    }
}

impl DmlDialect for SqliteDmlDialect {
    fn name(&self) -> &'static str {
        DIALECT_NAME
    }

    fn append_insert_operation(
        &self,
        sql: &mut String,
        command: &ModificationCommand,
        position: BatchPosition,
    ) -> Result<DmlEmission> {
        Ok(generator::append_insert_operation(
            self.returning_clause_available,
            sql,
            command,
            position,
        ))
    }

    fn append_update_operation(
        &self,
        sql: &mut String,
        command: &ModificationCommand,
        position: BatchPosition,
    ) -> Result<DmlEmission> {
        Ok(generator::append_update_operation(
            self.returning_clause_available,
            sql,
            command,
            position,
        ))
    }

    fn append_delete_operation(
        &self,
        sql: &mut String,
        command: &ModificationCommand,
        position: BatchPosition,
    ) -> Result<DmlEmission> {
        Ok(generator::append_delete_operation(
            self.returning_clause_available,
            sql,
            command,
            position,
        ))
    }

    fn append_next_sequence_value(
        &self,
        _sql: &mut String,
        sequence: &str,
        schema: Option<&str>,
    ) -> Result<()> {
        let operation = match schema {
            Some(schema) => format!("next value for sequence `{schema}.{sequence}`"),
            None => format!("next value for sequence `{sequence}`"),
        };

        Err(GenerateError::UnsupportedOperation {
            operation,
            dialect: DIALECT_NAME.to_string(),
            reason: "sqlite has no server-side sequence objects".to_string(),
        }
        .into())
    }
}

fn supports_returning_clause(version: &Version) -> bool {
    version.major > RETURNING_MINIMUM_MAJOR_VERSION
        || (version.major == RETURNING_MINIMUM_MAJOR_VERSION
            && version.minor >= RETURNING_MINIMUM_MINOR_VERSION)
}
