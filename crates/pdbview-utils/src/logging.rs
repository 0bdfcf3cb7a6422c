//! # Logging Utilities
//!
//! Subscriber setup for binaries and tests that use `pdbview-core`.
//!
//! The core crate only emits `tracing` events; nothing is printed until one
//! of the functions here installs a subscriber.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdbview_utils::init_logging;
//!
//! // Keep the guard alive for as long as logs should reach the file
//! let _guard = init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!("Loaded type stream");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Filter directives (e.g., `RUST_LOG=debug`, `RUST_LOG=pdbview_core::resolver=trace`)
//! - `PDBVIEW_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
//! - `PDBVIEW_LOG_FILE`: Optional log file, rotated daily (if not set, logs only to stderr)

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use tracing::Level;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat
{
    /// Human-readable lines (default)
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
}

impl FromStr for LogFormat
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "text" | "dev" => Ok(LogFormat::Pretty),
            "json" | "prod" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {s}. Use 'pretty' or 'json'")),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    Error,
    Warn,
    Info,
    /// Forward-reference repairs and the user-defined-types count
    Debug,
    /// Every type cache miss
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(format!(
                "Unknown log level: {s}. Use 'error', 'warn', 'info', 'debug', or 'trace'"
            )),
        }
    }
}

/// Keeps the background file writer running.
///
/// Dropping it flushes and stops file logging. Console output is unaffected.
#[must_use = "file logging stops when the guard is dropped"]
#[derive(Debug)]
pub struct LoggingGuard
{
    _file_writer: Option<WorkerGuard>,
}

/// Initialize logging from the environment
///
/// `RUST_LOG` directives are used as-is (default `info`);
/// `PDBVIEW_LOG_FORMAT` and `PDBVIEW_LOG_FILE` pick the format and the
/// optional log file.
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed or the log
/// file cannot be created.
pub fn init_logging() -> Result<LoggingGuard, LoggingError>
{
    let format = env::var("PDBVIEW_LOG_FORMAT")
        .ok()
        .and_then(|s| LogFormat::from_str(&s).ok())
        .unwrap_or_default();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::INFO.to_string()));

    install(format, filter, log_file_from_env())
}

/// Initialize logging with an explicit level, ignoring `RUST_LOG`
///
/// ```rust,no_run
/// use pdbview_utils::{LogFormat, LogLevel, init_logging_with_level};
///
/// let _guard = init_logging_with_level(LogLevel::Debug, LogFormat::Json)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Same as [`init_logging`].
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<LoggingGuard, LoggingError>
{
    install(format, EnvFilter::new(Level::from(level).to_string()), log_file_from_env())
}

/// Route events into the test harness output.
///
/// Safe to call from every test; only the first call installs anything.
/// Defaults to `debug` unless `RUST_LOG` says otherwise.
pub fn init_test_logging()
{
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(Level::DEBUG.to_string()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(true)
        .try_init();
}

fn log_file_from_env() -> Option<PathBuf>
{
    env::var_os("PDBVIEW_LOG_FILE").map(PathBuf::from)
}

fn install(format: LogFormat, filter: EnvFilter, log_file: Option<PathBuf>) -> Result<LoggingGuard, LoggingError>
{
    let mut layers = vec![output_layer(format, io::stderr, true)];
    let mut file_writer = None;

    if let Some(path) = log_file {
        let (writer, guard) = tracing_appender::non_blocking(file_appender(&path)?);
        // No ANSI in files
        layers.push(output_layer(format, writer, false));
        file_writer = Some(guard);
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|err| LoggingError::InitializationFailed(err.to_string()))?;

    Ok(LoggingGuard {
        _file_writer: file_writer,
    })
}

fn file_appender(path: &Path) -> Result<RollingFileAppender, LoggingError>
{
    let file_name = path
        .file_name()
        .ok_or_else(|| LoggingError::InvalidFilePath(path.to_path_buf()))?;
    let directory = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    Ok(RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name.to_string_lossy())
        .build(directory)?)
}

fn output_layer<W>(format: LogFormat, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_timer(ChronoUtc::rfc_3339());

    match format {
        LogFormat::Pretty => layer.with_ansi(ansi).boxed(),
        LogFormat::Json => layer.json().with_current_span(true).with_span_list(true).boxed(),
    }
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// `PDBVIEW_LOG_FILE` does not name a file
    #[error("Invalid log file path: {}", .0.display())]
    InvalidFilePath(PathBuf),

    /// The rolling log file could not be opened
    #[error("File logging error: {0}")]
    FileAppender(#[from] InitError),

    /// A global subscriber is already installed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("JSON").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("text").unwrap(), LogFormat::Pretty);
        assert!(LogFormat::from_str("xml").is_err());
        assert_eq!(LogFormat::default(), LogFormat::Pretty);
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("TRACE").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("verbose").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_file_appender_rejects_directory_only_path()
    {
        assert!(matches!(
            file_appender(Path::new("/")),
            Err(LoggingError::InvalidFilePath(_))
        ));
    }

    #[test]
    fn test_init_test_logging_is_idempotent()
    {
        init_test_logging();
        init_test_logging();
        tracing::debug!("still fine");
    }
}
