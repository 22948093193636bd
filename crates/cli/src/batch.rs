use saveql_core::{
    ColumnFlags, ColumnModification, EntityOperation, ModificationCommand, TableIdentity,
};
use serde::Deserialize;

use crate::error_presentation::CliResult;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct BatchFile {
    pub commands: Vec<CommandSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct CommandSpec {
    pub operation: OperationSpec,
    pub table: String,
    pub schema: Option<String>,
    pub returning_clause: Option<bool>,
    #[serde(default)]
    pub columns: Vec<ColumnSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum OperationSpec {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub(crate) struct ColumnSpec {
    pub name: String,
    #[serde(default)]
    pub key: bool,
    #[serde(default)]
    pub condition: bool,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub write: bool,
}

pub(crate) fn parse_batch(yaml: &str) -> std::result::Result<BatchFile, serde_yaml::Error> {
    serde_yaml::from_str(yaml)
}

pub(crate) fn build_commands(batch: &BatchFile) -> CliResult<Vec<ModificationCommand>> {
    let mut commands = Vec::with_capacity(batch.commands.len());

    for spec in &batch.commands {
        let table = match &spec.schema {
            Some(schema) => TableIdentity::schema_qualified(schema.clone(), spec.table.clone()),
            None => TableIdentity::named(spec.table.clone()),
        };

        let mut columns = Vec::with_capacity(spec.columns.len());
        for column in &spec.columns {
            columns.push(ColumnModification::new(
                column.name.clone(),
                ColumnFlags {
                    key: column.key,
                    condition: column.condition,
                    read: column.read,
                    write: column.write,
                },
            )?);
        }

        commands.push(ModificationCommand::new(
            table,
            entity_operation(spec.operation),
            columns,
            spec.returning_clause.unwrap_or(true),
        )?);
    }

    Ok(commands)
}

const fn entity_operation(spec: OperationSpec) -> EntityOperation {
    match spec {
        OperationSpec::Insert => EntityOperation::Insert,
        OperationSpec::Update => EntityOperation::Update,
        OperationSpec::Delete => EntityOperation::Delete,
    }
}
