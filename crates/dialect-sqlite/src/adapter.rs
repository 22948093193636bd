use rusqlite::Connection;
use saveql_core::{ConnectionConfig, DatabaseAdapter, ProbeError, Result, Version};

const DIALECT_NAME: &str = "sqlite";
const SHOW_SERVER_VERSION_QUERY: &str = "SELECT sqlite_version()";
const SERVER_VERSION_OVERRIDE_KEY: &str = "sqlite.server_version";

/// Connection handle used for capability probing. The server version is
/// read and parsed once here; an unparsable version is fatal because no
/// generation strategy can be chosen without it.
#[derive(Debug)]
pub struct SqliteAdapter {
    connection: Connection,
    server_version: Version,
}

pub fn connect(config: &ConnectionConfig) -> Result<SqliteAdapter> {
    let connection = Connection::open(config.database.as_str()).map_err(|source| {
        ProbeError::ConnectionFailed {
            dialect: DIALECT_NAME.to_string(),
            database: config.database.clone(),
            source: Box::new(source),
        }
    })?;

    let raw_version = match config.extra.get(SERVER_VERSION_OVERRIDE_KEY) {
        Some(raw_version) => raw_version.clone(),
        None => query_server_version(&connection)?,
    };
    let server_version = parse_server_version(&raw_version).ok_or_else(|| {
        ProbeError::VersionUnparsable {
            dialect: DIALECT_NAME.to_string(),
            raw: raw_version,
        }
    })?;

    Ok(SqliteAdapter {
        connection,
        server_version,
    })
}

impl SqliteAdapter {
    /// The underlying connection, for callers that go on to execute the
    /// generated statements.
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

impl DatabaseAdapter for SqliteAdapter {
    fn server_version(&self) -> Result<Version> {
        Ok(self.server_version.clone())
    }
}

fn query_server_version(connection: &Connection) -> Result<String> {
    connection
        .query_row(SHOW_SERVER_VERSION_QUERY, [], |row| row.get(0))
        .map_err(|source| {
            ProbeError::VersionQueryFailed {
                dialect: DIALECT_NAME.to_string(),
                source: Box::new(source),
            }
            .into()
        })
}

/// Accepts `major[.minor[.patch]]` with trailing non-digit noise per
/// segment, taking only the leading token of strings such as
/// `3.45.1 2024-01-30`.
pub(crate) fn parse_server_version(raw: &str) -> Option<Version> {
    let mut segments = raw.split_whitespace().next()?.split('.');
    let major = parse_version_segment(segments.next()?)?;
    let minor = segments.next().and_then(parse_version_segment).unwrap_or(0);
    let patch = segments.next().and_then(parse_version_segment).unwrap_or(0);

    Some(Version {
        major,
        minor,
        patch,
    })
}

fn parse_version_segment(raw: &str) -> Option<u16> {
    let digits = raw
        .chars()
        .take_while(|ch| ch.is_ascii_digit())
        .collect::<String>();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u16>().ok()
}
