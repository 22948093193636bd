mod batch;
mod error_presentation;

use std::{collections::BTreeMap, fs, path::PathBuf};

use clap::Parser;
use saveql_core::{ConnectionConfig, DatabaseAdapter, DmlEmission, Version, append_batch};
use saveql_dialect_sqlite::{SqliteDmlDialect, connect};

use crate::error_presentation::{CliError, CliResult, render_runtime_error};

const SERVER_VERSION_OVERRIDE_KEY: &str = "sqlite.server_version";

/// Dry-run generator: reads a YAML batch description, probes a SQLite
/// database for its capability level, and prints the save statements with
/// one result-set mapping line per command.
#[derive(Debug, Parser)]
#[command(name = "saveql", version, about = "Generate SQLite save statements from a batch description")]
struct Cli {
    /// YAML batch description file.
    batch: PathBuf,

    /// SQLite database probed for its server version.
    #[arg(long, default_value = ":memory:")]
    database: String,

    /// Override the probed server version (e.g. `3.34.1`).
    #[arg(long)]
    server_version: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(report) => print!("{report}"),
        Err(error) => {
            eprintln!("{}", render_runtime_error(error));
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> CliResult<String> {
    let raw_batch = fs::read_to_string(&cli.batch).map_err(|source| CliError::ReadFile {
        path: cli.batch.clone(),
        source,
    })?;
    let batch = batch::parse_batch(&raw_batch).map_err(CliError::InvalidBatch)?;
    let commands = batch::build_commands(&batch)?;

    let adapter = connect(&connection_config(cli))?;
    let server_version = adapter.server_version()?;
    let dialect = SqliteDmlDialect::from_adapter(&adapter)?;

    let mut sql = String::new();
    let emissions = append_batch(&dialect, &mut sql, &commands)?;

    Ok(render_report(&server_version, &dialect, &sql, &emissions))
}

fn connection_config(cli: &Cli) -> ConnectionConfig {
    let mut extra = BTreeMap::new();
    if let Some(raw_version) = &cli.server_version {
        extra.insert(SERVER_VERSION_OVERRIDE_KEY.to_string(), raw_version.clone());
    }

    ConnectionConfig {
        database: cli.database.clone(),
        extra,
    }
}

fn render_report(
    server_version: &Version,
    dialect: &SqliteDmlDialect,
    sql: &str,
    emissions: &[DmlEmission],
) -> String {
    let availability = if dialect.returning_clause_available() {
        "available"
    } else {
        "unavailable"
    };

    let mut report = format!("-- sqlite {server_version} (returning clause {availability})\n");
    report.push_str(sql);

    for (ordinal, emission) in emissions.iter().enumerate() {
        let mappings = emission
            .result_set_mappings
            .iter()
            .map(|mapping| format!("{mapping:?}"))
            .collect::<Vec<_>>()
            .join(", ");
        let transaction_note = if emission.requires_transaction {
            " (requires transaction)"
        } else {
            ""
        };
        report.push_str(&format!(
            "-- command[{ordinal}] result sets: [{mappings}]{transaction_note}\n"
        ));
    }

    report
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::{Cli, run};
    use crate::error_presentation::CliError;

    const BATCH_YAML: &str = r#"
commands:
  - operation: insert
    table: People
    columns:
      - { name: Id, key: true, read: true }
      - { name: Name, write: true }
  - operation: delete
    table: People
    columns:
      - { name: Id, key: true, condition: true }
"#;

    fn cli_for(batch_yaml: &str, server_version: Option<&str>) -> (Cli, tempfile::NamedTempFile) {
        let mut file = tempfile::NamedTempFile::new().expect("temp batch file must be created");
        file.write_all(batch_yaml.as_bytes())
            .expect("temp batch file must be writable");

        let cli = Cli {
            batch: file.path().to_path_buf(),
            database: ":memory:".to_string(),
            server_version: server_version.map(str::to_string),
        };
        (cli, file)
    }

    #[test]
    fn report_uses_fallback_statements_below_the_threshold() {
        let (cli, _file) = cli_for(BATCH_YAML, Some("3.34.1"));

        let report = run(&cli).expect("dry run must succeed");
        assert!(report.starts_with("-- sqlite 3.34.1 (returning clause unavailable)\n"));
        assert!(report.contains("last_insert_rowid()"));
        assert!(!report.contains("RETURNING"));
        assert!(report.contains("-- command[0] result sets: [NoResultSet, NotLastInResultSet] (requires transaction)"));
        assert!(report.contains("-- command[1] result sets: [NoResultSet, LastInResultSet | RowsAffectedOnly] (requires transaction)"));
    }

    #[test]
    fn report_uses_returning_statements_on_capable_engines() {
        let (cli, _file) = cli_for(BATCH_YAML, Some("3.45.1"));

        let report = run(&cli).expect("dry run must succeed");
        assert!(report.contains("returning clause available"));
        assert!(report.contains("RETURNING \"Id\""));
        assert!(report.contains("-- command[0] result sets: [NotLastInResultSet]"));
        assert!(report.contains("-- command[1] result sets: [LastInResultSet | RowsAffectedOnly]"));
    }

    #[test]
    fn malformed_batch_files_are_reported_as_parse_errors() {
        let (cli, _file) = cli_for("commands:\n  - operation: upsert\n    table: People\n", None);

        let error = run(&cli).expect_err("unknown operation must fail");
        assert!(matches!(error, CliError::InvalidBatch(_)));
    }

    #[test]
    fn invalid_command_shapes_are_reported_as_command_errors() {
        let yaml = "commands:\n  - operation: update\n    table: People\n    columns:\n      - { name: Name, write: true }\n";
        let (cli, _file) = cli_for(yaml, None);

        let error = run(&cli).expect_err("update without conditions must fail");
        assert!(matches!(
            error,
            CliError::Core(saveql_core::Error::Command(_))
        ));
    }
}
