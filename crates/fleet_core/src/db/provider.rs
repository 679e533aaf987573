//! Per-operation connection factory.
//!
//! # Responsibility
//! - Open file or in-memory SQLite connections on demand.
//! - Configure pragmas and run migrations before handing a connection out.
//!
//! # Invariants
//! - In-memory databases live as long as the provider (or any clone) does.
//! - Acquired connections are never cached or reused by the provider.

use super::migrations::apply_migrations;
use super::{ConnectionError, DbResult};
use crate::config::DatabaseTarget;
use log::{debug, error, info};
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use uuid::Uuid;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
enum Location {
    File(PathBuf),
    /// Named `memdb` database, addressed by URI. Uses regular file locking,
    /// so concurrent writers wait on the busy timeout.
    Memory(String),
}

impl Location {
    fn mode(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::Memory(_) => "memory",
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Memory(uri) => uri.clone(),
        }
    }
}

/// Produces a fresh, migrated connection for each store operation.
///
/// Cloning is cheap; clones address the same database.
#[derive(Clone)]
pub struct ConnectionProvider {
    location: Location,
    // A `memdb` database vanishes when its last connection closes.
    _anchor: Option<Arc<Mutex<Connection>>>,
}

impl ConnectionProvider {
    /// Builds a provider for the configured target and verifies it is usable.
    ///
    /// For [`DatabaseTarget::Memory`] a private database is created and kept
    /// alive by an anchor connection owned by the provider.
    pub fn open(target: &DatabaseTarget) -> DbResult<Self> {
        match target {
            DatabaseTarget::File(path) => Self::file(path.clone()),
            DatabaseTarget::Memory => Self::in_memory(),
        }
    }

    /// Provider over a database file, created on first use.
    pub fn file(path: impl Into<PathBuf>) -> DbResult<Self> {
        let provider = Self {
            location: Location::File(path.into()),
            _anchor: None,
        };
        // Fail fast on unreachable files and apply migrations once up front.
        drop(provider.acquire()?);
        info!(
            "event=db_provider_open module=db status=ok mode=file target={}",
            provider.location.describe()
        );
        Ok(provider)
    }

    /// Provider over a private in-memory database.
    pub fn in_memory() -> DbResult<Self> {
        let location = Location::Memory(format!(
            "file:/fleet-{}?vfs=memdb",
            Uuid::new_v4().simple()
        ));
        let anchor = connect(&location)?;
        info!("event=db_provider_open module=db status=ok mode=memory");
        Ok(Self {
            location,
            _anchor: Some(Arc::new(Mutex::new(anchor))),
        })
    }

    /// Opens one connection for the duration of a single store operation.
    ///
    /// # Errors
    /// - [`ConnectionError::Open`] when the database cannot be opened.
    /// - [`ConnectionError::Bootstrap`] or
    ///   [`ConnectionError::UnsupportedSchemaVersion`] when setup fails.
    pub fn acquire(&self) -> DbResult<Connection> {
        connect(&self.location)
    }
}

fn connect(location: &Location) -> DbResult<Connection> {
    let started_at = Instant::now();
    let mode = location.mode();

    let opened = match location {
        Location::File(path) => Connection::open(path),
        Location::Memory(uri) => Connection::open_with_flags(
            uri,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        ),
    };
    let mut conn = match opened {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=db_acquire module=db status=error mode={mode} duration_ms={} error_code=db_open_failed error={err}",
                started_at.elapsed().as_millis()
            );
            return Err(ConnectionError::Open {
                target: location.describe(),
                source: err,
            });
        }
    };

    if let Err(err) = bootstrap_connection(&mut conn) {
        error!(
            "event=db_acquire module=db status=error mode={mode} duration_ms={} error_code=db_bootstrap_failed error={err}",
            started_at.elapsed().as_millis()
        );
        return Err(err);
    }

    debug!(
        "event=db_acquire module=db status=ok mode={mode} duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}

fn bootstrap_connection(conn: &mut Connection) -> DbResult<()> {
    conn.execute_batch("PRAGMA foreign_keys = ON;")?;
    conn.busy_timeout(BUSY_TIMEOUT)?;
    apply_migrations(conn)
}

#[cfg(test)]
mod tests {
    use super::ConnectionProvider;

    fn count_rows(conn: &rusqlite::Connection) -> i64 {
        conn.query_row("SELECT COUNT(*) FROM manufacturers;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn in_memory_connections_share_one_database() {
        let provider = ConnectionProvider::in_memory().unwrap();

        let writer = provider.acquire().unwrap();
        writer
            .execute(
                "INSERT INTO manufacturers (name, country) VALUES ('Toyota', 'Japan');",
                [],
            )
            .unwrap();
        drop(writer);

        let reader = provider.acquire().unwrap();
        assert_eq!(count_rows(&reader), 1);
    }

    #[test]
    fn separate_in_memory_providers_are_isolated() {
        let first = ConnectionProvider::in_memory().unwrap();
        let second = ConnectionProvider::in_memory().unwrap();

        first
            .acquire()
            .unwrap()
            .execute(
                "INSERT INTO manufacturers (name, country) VALUES ('Skoda', 'Czechia');",
                [],
            )
            .unwrap();

        assert_eq!(count_rows(&second.acquire().unwrap()), 0);
    }

    #[test]
    fn acquired_connections_enforce_foreign_keys() {
        let provider = ConnectionProvider::in_memory().unwrap();
        let conn = provider.acquire().unwrap();
        let enabled: i64 = conn
            .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
