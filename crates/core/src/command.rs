use std::fmt;

use crate::{CommandError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableIdentity {
    pub name: String,
    pub schema: Option<String>,
}

impl TableIdentity {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
        }
    }

    pub fn schema_qualified(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: Some(schema.into()),
        }
    }
}

impl fmt::Display for TableIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.schema {
            Some(schema) => write!(f, "{schema}.{}", self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityOperation {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for EntityOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "insert",
            Self::Update => "update",
            Self::Delete => "delete",
        })
    }
}

/// Role flags of one column within a modification command.
///
/// Valid combinations are intentionally wider than one role per column:
/// a server-generated primary key is `key` + `read`, and an optimistic
/// concurrency token is `condition` without `write`. A column with no flag
/// at all has no role in the statement and is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ColumnFlags {
    /// Participates in identifying the row.
    pub key: bool,
    /// Must appear in the WHERE clause (keys and concurrency tokens).
    pub condition: bool,
    /// Value must be retrieved after the operation (generated/computed).
    pub read: bool,
    /// Value is supplied in the statement.
    pub write: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnModification {
    name: String,
    flags: ColumnFlags,
}

impl ColumnModification {
    pub fn new(name: impl Into<String>, flags: ColumnFlags) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(CommandError::EmptyColumnName.into());
        }
        if flags == ColumnFlags::default() {
            return Err(CommandError::InertColumn { column: name }.into());
        }

        Ok(Self { name, flags })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn is_key(&self) -> bool {
        self.flags.key
    }

    #[must_use]
    pub const fn is_condition(&self) -> bool {
        self.flags.condition
    }

    #[must_use]
    pub const fn is_read(&self) -> bool {
        self.flags.read
    }

    #[must_use]
    pub const fn is_write(&self) -> bool {
        self.flags.write
    }
}

/// One row-level operation, read-only to the generator. Column roles are
/// validated here, once, so the emitters can trust the shape they receive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModificationCommand {
    table: TableIdentity,
    operation: EntityOperation,
    columns: Vec<ColumnModification>,
    use_returning_clause: bool,
}

impl ModificationCommand {
    /// Builds a command, enforcing the per-operation role rules:
    ///
    /// - insert/update: at least one column modification;
    /// - insert: no condition columns, every key column read or written, and
    ///   a key column present whenever generated columns are read back;
    /// - update: at least one write and one condition column, key columns
    ///   flagged as conditions;
    /// - delete: at least one condition column, no reads or writes, key
    ///   columns flagged as conditions.
    pub fn new(
        table: TableIdentity,
        operation: EntityOperation,
        columns: Vec<ColumnModification>,
        use_returning_clause: bool,
    ) -> Result<Self> {
        let command = Self {
            table,
            operation,
            columns,
            use_returning_clause,
        };
        command.validate()?;
        Ok(command)
    }

    fn validate(&self) -> Result<()> {
        match self.operation {
            EntityOperation::Insert => self.validate_insert(),
            EntityOperation::Update => self.validate_update(),
            EntityOperation::Delete => self.validate_delete(),
        }
    }

    fn validate_insert(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(self.missing_columns_error());
        }

        for column in &self.columns {
            if column.is_condition() {
                return Err(CommandError::ConditionOnInsert {
                    table: self.table.to_string(),
                    column: column.name().to_string(),
                }
                .into());
            }
            if column.is_key() && !column.is_read() && !column.is_write() {
                return Err(CommandError::UnboundKeyColumn {
                    table: self.table.to_string(),
                    column: column.name().to_string(),
                }
                .into());
            }
        }

        if self.read_columns().next().is_some() && self.key_columns().next().is_none() {
            return Err(CommandError::MissingKeyForReadback {
                table: self.table.to_string(),
            }
            .into());
        }

        Ok(())
    }

    fn validate_update(&self) -> Result<()> {
        if self.columns.is_empty() {
            return Err(self.missing_columns_error());
        }
        if self.write_columns().next().is_none() {
            return Err(CommandError::MissingWriteColumns {
                table: self.table.to_string(),
                operation: self.operation,
            }
            .into());
        }

        self.validate_conditions()
    }

    fn validate_delete(&self) -> Result<()> {
        for column in &self.columns {
            if column.is_read() || column.is_write() {
                return Err(CommandError::ColumnValueOnDelete {
                    table: self.table.to_string(),
                    column: column.name().to_string(),
                }
                .into());
            }
        }

        self.validate_conditions()
    }

    fn validate_conditions(&self) -> Result<()> {
        if self.condition_columns().next().is_none() {
            return Err(CommandError::MissingConditionColumns {
                table: self.table.to_string(),
                operation: self.operation,
            }
            .into());
        }

        for column in &self.columns {
            if column.is_key() && !column.is_condition() {
                return Err(CommandError::KeyNotCondition {
                    table: self.table.to_string(),
                    operation: self.operation,
                    column: column.name().to_string(),
                }
                .into());
            }
        }

        Ok(())
    }

    fn missing_columns_error(&self) -> crate::Error {
        CommandError::MissingColumns {
            table: self.table.to_string(),
            operation: self.operation,
        }
        .into()
    }

    #[must_use]
    pub fn table(&self) -> &TableIdentity {
        &self.table
    }

    #[must_use]
    pub const fn operation(&self) -> EntityOperation {
        self.operation
    }

    #[must_use]
    pub fn column_modifications(&self) -> &[ColumnModification] {
        &self.columns
    }

    /// Whether this table can use the inline-return clause at all. Virtual
    /// tables cannot, even when the engine version supports it.
    #[must_use]
    pub const fn use_returning_clause(&self) -> bool {
        self.use_returning_clause
    }

    pub fn key_columns(&self) -> impl Iterator<Item = &ColumnModification> {
        self.columns.iter().filter(|column| column.is_key())
    }

    pub fn condition_columns(&self) -> impl Iterator<Item = &ColumnModification> {
        self.columns.iter().filter(|column| column.is_condition())
    }

    pub fn read_columns(&self) -> impl Iterator<Item = &ColumnModification> {
        self.columns.iter().filter(|column| column.is_read())
    }

    pub fn write_columns(&self) -> impl Iterator<Item = &ColumnModification> {
        self.columns.iter().filter(|column| column.is_write())
    }
}
