//! Process-wide configuration, built once at startup.
//!
//! # Invariants
//! - Configuration is immutable after construction; wiring reads it once.

use crate::logging::default_log_level;
use serde::Deserialize;
use std::path::PathBuf;

/// Where the relational store lives.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseTarget {
    /// SQLite database file; created and migrated on first open.
    File(PathBuf),
    /// Private in-memory database, discarded when the process ends.
    #[default]
    Memory,
}

/// Application configuration consumed by [`crate::context::FleetContext`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FleetConfig {
    pub database: DatabaseTarget,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Rolling log file directory. `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            database: DatabaseTarget::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl FleetConfig {
    /// Configuration for a database file with default logging.
    pub fn with_database_file(path: impl Into<PathBuf>) -> Self {
        Self {
            database: DatabaseTarget::File(path.into()),
            ..Self::default()
        }
    }
}
