use crate::{EntityOperation, ModificationCommand, Result, ResultSetMapping};

/// Position of one command within a batch sharing a single round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchPosition {
    pub ordinal: usize,
    /// Whether later commands follow in the same batch. Decides the
    /// last/not-last flag of every row-data result set this command emits.
    pub is_final: bool,
}

impl BatchPosition {
    #[must_use]
    pub const fn new(ordinal: usize, is_final: bool) -> Self {
        Self { ordinal, is_final }
    }

    #[must_use]
    pub const fn single() -> Self {
        Self::new(0, true)
    }
}

/// Outcome of appending one command: one result-set mapping per emitted
/// statement, in emission order, plus whether the emitted statements must
/// execute atomically (the two-statement fallback pairs).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DmlEmission {
    pub result_set_mappings: Vec<ResultSetMapping>,
    pub requires_transaction: bool,
}

/// A dialect's DML statement generator. Implementations are pure text
/// producers: the capability flag is fixed at construction, the buffer is
/// caller-owned, and no I/O happens during generation.
pub trait DmlDialect: Send + Sync {
    fn name(&self) -> &'static str;

    fn append_insert_operation(
        &self,
        sql: &mut String,
        command: &ModificationCommand,
        position: BatchPosition,
    ) -> Result<DmlEmission>;

    fn append_update_operation(
        &self,
        sql: &mut String,
        command: &ModificationCommand,
        position: BatchPosition,
    ) -> Result<DmlEmission>;

    fn append_delete_operation(
        &self,
        sql: &mut String,
        command: &ModificationCommand,
        position: BatchPosition,
    ) -> Result<DmlEmission>;

    /// SQL producing the next value of a server-side sequence. Dialects
    /// without sequence objects reject this outright instead of emitting
    /// invalid SQL.
    fn append_next_sequence_value(
        &self,
        sql: &mut String,
        sequence: &str,
        schema: Option<&str>,
    ) -> Result<()>;

    fn append_operation(
        &self,
        sql: &mut String,
        command: &ModificationCommand,
        position: BatchPosition,
    ) -> Result<DmlEmission> {
        match command.operation() {
            EntityOperation::Insert => self.append_insert_operation(sql, command, position),
            EntityOperation::Update => self.append_update_operation(sql, command, position),
            EntityOperation::Delete => self.append_delete_operation(sql, command, position),
        }
    }
}

/// Appends every command of a batch, deriving each command's position from
/// its index, and collects the emissions in order.
pub fn append_batch(
    dialect: &dyn DmlDialect,
    sql: &mut String,
    commands: &[ModificationCommand],
) -> Result<Vec<DmlEmission>> {
    let mut emissions = Vec::with_capacity(commands.len());
    let final_ordinal = commands.len().saturating_sub(1);

    for (ordinal, command) in commands.iter().enumerate() {
        let position = BatchPosition::new(ordinal, ordinal == final_ordinal);
        emissions.push(dialect.append_operation(sql, command, position)?);
    }

    Ok(emissions)
}
