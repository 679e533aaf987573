//! Schema registry applied on connection bootstrap.
//!
//! # Invariants
//! - `version` values are strictly increasing.
//! - The applied version is mirrored to `PRAGMA user_version`.

use crate::db::{ConnectionError, DbResult};
use rusqlite::{Connection, TransactionBehavior};

#[derive(Debug, Clone, Copy)]
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: include_str!("0001_fleet.sql"),
}];

/// Returns the newest schema version this binary knows how to apply.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |migration| migration.version)
}

/// Brings the connected database up to [`latest_version`].
///
/// Pending migrations run inside one immediate transaction, so two processes
/// bootstrapping the same file serialize instead of applying twice.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    if schema_version(conn)? == latest_version() {
        return Ok(());
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let current = schema_version(&tx)?;
    let latest = latest_version();
    if current > latest {
        return Err(ConnectionError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }

    for migration in MIGRATIONS.iter().filter(|m| m.version > current) {
        tx.execute_batch(migration.sql)?;
        tx.execute_batch(&format!("PRAGMA user_version = {};", migration.version))?;
    }
    tx.commit()?;

    Ok(())
}

fn schema_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
