#[allow(dead_code)]
#[path = "support/command_fixtures.rs"]
mod command_fixtures;

use std::collections::BTreeMap;

use command_fixtures::{command, generated_key, version, write};
use saveql_core::{
    BatchPosition, ConnectionConfig, DatabaseAdapter, DmlDialect, EntityOperation, Error,
    ProbeError,
};
use saveql_dialect_sqlite::{SqliteDmlDialect, connect};

const SERVER_VERSION_OVERRIDE_KEY: &str = "sqlite.server_version";

fn in_memory_config(version_override: Option<&str>) -> ConnectionConfig {
    let mut extra = BTreeMap::new();
    if let Some(raw_version) = version_override {
        extra.insert(SERVER_VERSION_OVERRIDE_KEY.to_string(), raw_version.to_string());
    }

    ConnectionConfig {
        database: ":memory:".to_string(),
        extra,
    }
}

#[test]
fn returning_clause_availability_follows_the_3_35_threshold() {
    for (below, raw) in [
        (true, version(2, 99, 0)),
        (true, version(3, 0, 0)),
        (true, version(3, 34, 1)),
        (false, version(3, 35, 0)),
        (false, version(3, 36, 0)),
        (false, version(4, 0, 0)),
    ] {
        let dialect = SqliteDmlDialect::new(&raw);
        assert_eq!(
            dialect.returning_clause_available(),
            !below,
            "version {raw} misclassified"
        );
    }
}

#[test]
fn engines_below_the_threshold_never_select_the_inline_path() {
    // Even a command shape that benefits most from RETURNING falls back.
    let command = command(
        "People",
        EntityOperation::Insert,
        vec![generated_key("Id"), write("Name")],
    );

    for raw in [version(2, 99, 0), version(3, 0, 0), version(3, 34, 1)] {
        let dialect = SqliteDmlDialect::new(&raw);
        let mut sql = String::new();
        dialect
            .append_insert_operation(&mut sql, &command, BatchPosition::single())
            .expect("insert generation must succeed");
        assert!(
            !sql.contains("RETURNING"),
            "version {raw} must not emit a returning clause: {sql}"
        );
    }
}

#[test]
fn probe_reads_live_version_and_parses_it() {
    let adapter = connect(&in_memory_config(None)).expect("in-memory connect must succeed");
    let probed = adapter
        .server_version()
        .expect("probed version must be available");

    // Bundled SQLite is far past the returning threshold.
    assert!(probed.major >= 3);
    let dialect = SqliteDmlDialect::from_adapter(&adapter)
        .expect("generator construction from adapter must succeed");
    assert!(dialect.returning_clause_available());
}

#[test]
fn version_override_short_circuits_the_live_query() {
    let adapter = connect(&in_memory_config(Some("3.34.1")))
        .expect("in-memory connect with override must succeed");
    let probed = adapter
        .server_version()
        .expect("probed version must be available");

    assert_eq!(probed, version(3, 34, 1));
    let dialect = SqliteDmlDialect::from_adapter(&adapter)
        .expect("generator construction from adapter must succeed");
    assert!(!dialect.returning_clause_available());
}

#[test]
fn version_strings_with_trailing_noise_parse_by_numeric_prefix() {
    let adapter = connect(&in_memory_config(Some("3.45.1 2024-01-30")))
        .expect("suffixed version string must parse");
    assert_eq!(
        adapter.server_version().expect("probed version"),
        version(3, 45, 1)
    );

    let adapter = connect(&in_memory_config(Some("3.35")))
        .expect("two-segment version string must parse");
    assert_eq!(
        adapter.server_version().expect("probed version"),
        version(3, 35, 0)
    );
}

#[test]
fn unparsable_version_is_a_fatal_construction_error() {
    for raw in ["", "garbage", "v3.35.0", ".35"] {
        let error = connect(&in_memory_config(Some(raw)))
            .expect_err("unparsable version must fail construction");
        match error {
            Error::Probe(ProbeError::VersionUnparsable { raw: reported, .. }) => {
                assert_eq!(reported, raw);
            }
            other => panic!("expected version parse failure for `{raw}`, got {other:?}"),
        }
    }
}
