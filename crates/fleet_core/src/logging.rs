//! Logging bootstrap for the fleet backend.
//!
//! # Responsibility
//! - Start the `flexi_logger` backend at most once per process.
//! - Route `log` events either to rotating files or to stderr.
//!
//! # Invariants
//! - Repeating initialization with the same settings is a no-op.
//! - A second initialization with different settings is rejected.
//! - Events are `event=<name> module=<module> status=<status>` key/value lines
//!   and never carry driver passwords.

use flexi_logger::{
    Cleanup, Criterion, FileSpec, FlexiLoggerError, Logger, LoggerHandle, Naming, WriteMode,
};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "fleet";
const MAX_LOG_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;
const MAX_LOG_FILES: usize = 5;

static ACTIVE_LOGGER: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    level: &'static str,
    log_dir: Option<PathBuf>,
    _handle: LoggerHandle,
}

#[derive(Debug)]
pub enum LoggingError {
    UnsupportedLevel(String),
    RelativeLogDir(PathBuf),
    CreateLogDir {
        path: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
    /// Logging is already running with different settings.
    AlreadyInitialized {
        level: &'static str,
        log_dir: Option<PathBuf>,
    },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedLevel(level) => write!(
                f,
                "unsupported log level `{level}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => {
                write!(f, "log directory must be absolute, got `{}`", path.display())
            }
            Self::CreateLogDir { path, source } => {
                write!(f, "cannot create log directory `{}`: {source}", path.display())
            }
            Self::Backend(err) => write!(f, "cannot start logger: {err}"),
            Self::AlreadyInitialized { level, log_dir } => write!(
                f,
                "logging already initialized (level `{level}`, target `{}`)",
                describe_target(log_dir.as_deref())
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateLogDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts process logging at `level`, writing to `log_dir` or stderr.
///
/// # Errors
/// - `level` is not one of `trace|debug|info|warn|error`.
/// - `log_dir` is relative or cannot be created.
/// - Logging is already active with a different level or target.
pub fn init_logging(level: &str, log_dir: Option<&Path>) -> Result<(), LoggingError> {
    let level = normalize_level(level)?;
    if let Some(dir) = log_dir {
        if !dir.is_absolute() {
            return Err(LoggingError::RelativeLogDir(dir.to_path_buf()));
        }
    }

    let active = ACTIVE_LOGGER.get_or_try_init(|| start_logger(level, log_dir))?;
    if active.level != level || active.log_dir.as_deref() != log_dir {
        return Err(LoggingError::AlreadyInitialized {
            level: active.level,
            log_dir: active.log_dir.clone(),
        });
    }

    Ok(())
}

/// Returns `(level, log_dir)` of the running logger, if any.
pub fn logging_status() -> Option<(&'static str, Option<PathBuf>)> {
    ACTIVE_LOGGER
        .get()
        .map(|active| (active.level, active.log_dir.clone()))
}

/// `debug` for debug builds, `info` for release builds.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start_logger(level: &'static str, log_dir: Option<&Path>) -> Result<ActiveLogger, LoggingError> {
    let logger = Logger::try_with_str(level).map_err(LoggingError::Backend)?;
    let handle = match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateLogDir {
                path: dir.to_path_buf(),
                source,
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir)
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(MAX_LOG_FILE_SIZE_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(MAX_LOG_FILES),
                )
                .write_mode(WriteMode::BufferAndFlush)
                .append()
                .format_for_files(flexi_logger::detailed_format)
                .start()
        }
        None => logger
            .log_to_stderr()
            .format_for_stderr(flexi_logger::default_format)
            .start(),
    }
    .map_err(LoggingError::Backend)?;

    info!(
        "event=logging_init module=core status=ok level={level} target={} version={}",
        describe_target(log_dir),
        env!("CARGO_PKG_VERSION")
    );

    Ok(ActiveLogger {
        level,
        log_dir: log_dir.map(Path::to_path_buf),
        _handle: handle,
    })
}

fn normalize_level(level: &str) -> Result<&'static str, LoggingError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        _ => Err(LoggingError::UnsupportedLevel(level.to_string())),
    }
}

fn describe_target(log_dir: Option<&Path>) -> String {
    log_dir.map_or_else(|| "stderr".to_string(), |dir| dir.display().to_string())
}
