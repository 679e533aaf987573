//! SQLite connection provider and schema bootstrap.
//!
//! # Responsibility
//! - Hand out one ready-to-use connection per store operation.
//! - Apply schema migrations before any connection is returned.
//!
//! # Invariants
//! - No pooling: every acquired connection is owned and dropped by its caller.
//! - Returned connections have `foreign_keys=ON` and the latest schema.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod provider;

pub use provider::ConnectionProvider;

pub type DbResult<T> = Result<T, ConnectionError>;

/// Storage could not be reached or prepared for use.
#[derive(Debug)]
pub enum ConnectionError {
    /// The database could not be opened (missing directory, bad URI, I/O).
    Open {
        target: String,
        source: rusqlite::Error,
    },
    /// Connection opened but pragma setup or migration failed.
    Bootstrap(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for ConnectionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open { target, source } => {
                write!(f, "cannot open database `{target}`: {source}")
            }
            Self::Bootstrap(err) => write!(f, "cannot prepare database connection: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for ConnectionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Open { source, .. } => Some(source),
            Self::Bootstrap(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for ConnectionError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Bootstrap(value)
    }
}
