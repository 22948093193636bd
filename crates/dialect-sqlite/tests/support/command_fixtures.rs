use saveql_core::{
    ColumnFlags, ColumnModification, EntityOperation, ModificationCommand, TableIdentity, Version,
};

pub const fn version(major: u16, minor: u16, patch: u16) -> Version {
    Version {
        major,
        minor,
        patch,
    }
}

pub fn column(name: &str, flags: ColumnFlags) -> ColumnModification {
    ColumnModification::new(name, flags).expect("fixture column must validate")
}

/// Server-generated primary key: identified and read back, never written.
pub fn generated_key(name: &str) -> ColumnModification {
    column(
        name,
        ColumnFlags {
            key: true,
            read: true,
            ..ColumnFlags::default()
        },
    )
}

/// Client-supplied key as it appears on update/delete commands.
pub fn key_condition(name: &str) -> ColumnModification {
    column(
        name,
        ColumnFlags {
            key: true,
            condition: true,
            ..ColumnFlags::default()
        },
    )
}

/// Client-supplied key as it appears on insert commands.
pub fn written_key(name: &str) -> ColumnModification {
    column(
        name,
        ColumnFlags {
            key: true,
            write: true,
            ..ColumnFlags::default()
        },
    )
}

pub fn write(name: &str) -> ColumnModification {
    column(
        name,
        ColumnFlags {
            write: true,
            ..ColumnFlags::default()
        },
    )
}

pub fn read(name: &str) -> ColumnModification {
    column(
        name,
        ColumnFlags {
            read: true,
            ..ColumnFlags::default()
        },
    )
}

/// Optimistic concurrency token: compared in WHERE, not altered.
pub fn token(name: &str) -> ColumnModification {
    column(
        name,
        ColumnFlags {
            condition: true,
            ..ColumnFlags::default()
        },
    )
}

pub fn command(
    table: &str,
    operation: EntityOperation,
    columns: Vec<ColumnModification>,
) -> ModificationCommand {
    ModificationCommand::new(TableIdentity::named(table), operation, columns, true)
        .expect("fixture command must validate")
}

pub fn command_without_returning(
    table: &str,
    operation: EntityOperation,
    columns: Vec<ColumnModification>,
) -> ModificationCommand {
    ModificationCommand::new(TableIdentity::named(table), operation, columns, false)
        .expect("fixture command must validate")
}
