mod adapter;
mod command;
mod config;
mod dialect;
mod error;
mod render;
mod result_set;

pub use adapter::DatabaseAdapter;
pub use command::{
    ColumnFlags, ColumnModification, EntityOperation, ModificationCommand, TableIdentity,
};
pub use config::{ConnectionConfig, Version};
pub use dialect::{BatchPosition, DmlDialect, DmlEmission, append_batch};
pub use error::{CommandError, Error, GenerateError, ProbeError, Result};
pub use render::{
    STATEMENT_TERMINATOR, delimit_identifier, delimit_table, parameter_placeholder,
    terminate_statement,
};
pub use result_set::ResultSetMapping;
