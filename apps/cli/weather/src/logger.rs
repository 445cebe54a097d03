//! Logging for the weather CLI.
//!
//! Log records go to stderr (colored) and optionally to a plain-text file.
//! Stdout is reserved for the weather document. Stderr stays silent at
//! [`LevelFilter::Off`] so failures show up only as `Error: ...` lines; the
//! log file always records warnings and errors.

use crate::error::AppError;

use common::ErrorLocation;

use std::io::stderr;
use std::panic::Location;
use std::path::Path;
use std::sync::Once;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use fern::Dispatch;
use fern::colors::Color::{Blue, Green, Magenta, Red, Yellow};
use fern::colors::ColoredLevelConfig;
use humantime::format_rfc3339;
use log::{LevelFilter, info, warn};

/// Thread-safe initialization guard.
static INIT_LOGGER_ONCE: Once = Once::new();

/// Tracks if logger initialization was already attempted.
static LOGGER_ALREADY_CALLED: AtomicBool = AtomicBool::new(false);

/// Log file name.
pub const LOG_FILE_NAME: &str = "weather.log";

/// Least verbose level written to the log file.
pub const LOG_FILE_MIN_LEVEL: LevelFilter = LevelFilter::Warn;

const LOGGER_INITIALIZED_MESSAGE_PREFIX: &str = "Logger initialized with level: ";

const LOGGER_ALREADY_INITIALIZED_MESSAGE: &str = "Logger already initialized";

/// Initialize the logger: stderr always, plus `<log_dir>/weather.log` when given.
///
/// Safe to call more than once; later calls log a warning and return Ok.
///
/// # Errors
///
/// Returns an error if:
/// - Log file cannot be created
/// - Logger dispatch configuration fails
pub fn initialize(level: LevelFilter, log_dir: Option<&Path>) -> Result<(), AppError> {
    if LOGGER_ALREADY_CALLED.swap(true, Ordering::SeqCst) {
        warn!("{LOGGER_ALREADY_INITIALIZED_MESSAGE}");
        return Ok(());
    }

    let mut result = Ok(());

    INIT_LOGGER_ONCE.call_once(|| {
        result = initialize_internal(level, log_dir);
        if result.is_ok() {
            info!("{LOGGER_INITIALIZED_MESSAGE_PREFIX}{level:?}");
        }
    });

    result
}

fn initialize_internal(level: LevelFilter, log_dir: Option<&Path>) -> Result<(), AppError> {
    let location = ErrorLocation::from(Location::caller());
    build_dispatch(level, log_dir)?
        .apply()
        .map_err(|e| AppError::Logger {
            message: format!("Failed to initialize logger: {e}"),
            location,
        })
}

/// Assemble the dispatch chain without installing it.
///
/// `level` applies to stderr. Opens (and creates) the log file when `log_dir`
/// is given; the file gets `level` or [`LOG_FILE_MIN_LEVEL`], whichever is
/// more verbose.
pub fn build_dispatch(level: LevelFilter, log_dir: Option<&Path>) -> Result<Dispatch, AppError> {
    let color_configuration = ColoredLevelConfig::new()
        .debug(Blue)
        .info(Green)
        .warn(Yellow)
        .error(Red)
        .trace(Magenta);

    let stderr_dispatch = Dispatch::new()
        .format(move |out, message, record| {
            out.finish(format_args!(
                "[{date} - {level}] {message} [{file}:{line}]",
                date = format_rfc3339(SystemTime::now()),
                level = color_configuration.color(record.level()),
                message = message,
                file = record.file().unwrap_or("unknown"),
                line = record.line().unwrap_or(0),
            ))
        })
        .level(level)
        .chain(stderr());

    let mut base_dispatch = Dispatch::new().level(level).chain(stderr_dispatch);

    if let Some(log_dir) = log_dir {
        let location = ErrorLocation::from(Location::caller());
        let log_file_path = log_dir.join(LOG_FILE_NAME);
        let log_file = fern::log_file(&log_file_path).map_err(|e| AppError::Logger {
            message: format!("Failed to create log file {}: {e}", log_file_path.display()),
            location,
        })?;

        let file_level = level.max(LOG_FILE_MIN_LEVEL);
        let file_dispatch = Dispatch::new()
            .level(file_level)
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{date} - {level}] {message} [{file}:{line}]",
                    date = format_rfc3339(SystemTime::now()),
                    level = record.level(),
                    message = message,
                    file = record.file().unwrap_or("unknown"),
                    line = record.line().unwrap_or(0)
                ))
            })
            .chain(log_file);

        base_dispatch = base_dispatch.level(file_level).chain(file_dispatch);
    }

    Ok(base_dispatch)
}
